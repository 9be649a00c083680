//! Database models for instruments.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use dragonshield_core::instruments::{Instrument, NewInstrument};

/// Database model for instruments
#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::instruments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct InstrumentDB {
    pub id: i32,
    pub name: String,
    pub currency: String,
    pub isin: Option<String>,
    pub ticker_symbol: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for inserting an instrument; the id is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::instruments)]
pub struct NewInstrumentDB {
    pub name: String,
    pub currency: String,
    pub isin: Option<String>,
    pub ticker_symbol: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<InstrumentDB> for Instrument {
    fn from(db: InstrumentDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            currency: db.currency,
            isin: db.isin,
            ticker_symbol: db.ticker_symbol,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewInstrument> for NewInstrumentDB {
    fn from(domain: NewInstrument) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            name: domain.name,
            currency: domain.currency,
            isin: domain.isin,
            ticker_symbol: domain.ticker_symbol,
            is_active: domain.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}
