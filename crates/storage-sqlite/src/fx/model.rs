//! Database models for exchange rates.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{parse_decimal, StorageError};
use dragonshield_core::constants::DECIMAL_PRECISION;
use dragonshield_core::fx::{ExchangeRate, NewExchangeRate, RateSource};

/// Database model for exchange rates. `rate_to_base` is stored as TEXT.
#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::exchange_rates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateDB {
    pub id: i32,
    pub currency_code: String,
    pub rate_date: NaiveDateTime,
    pub rate_to_base: String,
    pub source: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::exchange_rates)]
pub struct NewExchangeRateDB {
    pub currency_code: String,
    pub rate_date: NaiveDateTime,
    pub rate_to_base: String,
    pub source: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ExchangeRateDB> for ExchangeRate {
    type Error = StorageError;

    fn try_from(db: ExchangeRateDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            rate_to_base: parse_decimal("rate_to_base", &db.rate_to_base)?,
            currency_code: db.currency_code,
            rate_date: Utc.from_utc_datetime(&db.rate_date),
            source: RateSource::from(db.source.as_str()),
        })
    }
}

impl From<NewExchangeRate> for NewExchangeRateDB {
    fn from(domain: NewExchangeRate) -> Self {
        Self {
            currency_code: domain.currency_code,
            rate_date: domain.rate_date.naive_utc(),
            rate_to_base: domain.rate_to_base.round_dp(DECIMAL_PRECISION).to_string(),
            source: domain.source.as_str().to_string(),
            created_at: Utc::now().naive_utc(),
        }
    }
}
