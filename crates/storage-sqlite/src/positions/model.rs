//! Database models for position reports.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{parse_decimal, StorageError};
use dragonshield_core::constants::DECIMAL_PRECISION;
use dragonshield_core::positions::{NewPositionReport, PositionReport};

/// Database model for position reports. Quantities and prices are TEXT.
#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::position_reports)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PositionReportDB {
    pub id: i32,
    pub instrument_id: i32,
    pub quantity: String,
    pub current_price: Option<String>,
    pub report_date: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::position_reports)]
pub struct NewPositionReportDB {
    pub instrument_id: i32,
    pub quantity: String,
    pub current_price: Option<String>,
    pub report_date: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

impl TryFrom<PositionReportDB> for PositionReport {
    type Error = StorageError;

    fn try_from(db: PositionReportDB) -> Result<Self, Self::Error> {
        let current_price = db
            .current_price
            .as_deref()
            .map(|raw| parse_decimal("current_price", raw))
            .transpose()?;

        Ok(Self {
            id: db.id,
            instrument_id: db.instrument_id,
            quantity: parse_decimal("quantity", &db.quantity)?,
            current_price,
            report_date: Utc.from_utc_datetime(&db.report_date),
        })
    }
}

impl From<NewPositionReport> for NewPositionReportDB {
    fn from(domain: NewPositionReport) -> Self {
        Self {
            instrument_id: domain.instrument_id,
            quantity: domain.quantity.round_dp(DECIMAL_PRECISION).to_string(),
            current_price: domain
                .current_price
                .map(|p| p.round_dp(DECIMAL_PRECISION).to_string()),
            report_date: domain.report_date.naive_utc(),
            created_at: Utc::now().naive_utc(),
        }
    }
}
