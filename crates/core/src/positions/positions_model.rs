//! Position report domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// A holding record for one instrument at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    pub id: i32,
    pub instrument_id: i32,
    pub quantity: Decimal,
    /// Price in the instrument's trading currency. A report without a
    /// price is valued at zero.
    pub current_price: Option<Decimal>,
    pub report_date: DateTime<Utc>,
}

impl PositionReport {
    /// `quantity * current_price` in the instrument's trading currency.
    ///
    /// Returns `None` when the product does not fit in a `Decimal`.
    pub fn native_value(&self) -> Option<Decimal> {
        match self.current_price {
            Some(price) => self.quantity.checked_mul(price),
            None => Some(Decimal::ZERO),
        }
    }
}

/// Input model for recording a position report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPositionReport {
    pub instrument_id: i32,
    pub quantity: Decimal,
    pub current_price: Option<Decimal>,
    pub report_date: DateTime<Utc>,
}

impl NewPositionReport {
    pub fn validate(&self) -> Result<()> {
        if let Some(price) = self.current_price {
            if price < Decimal::ZERO {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Current price cannot be negative".to_string(),
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn report(quantity: Decimal, price: Option<Decimal>) -> PositionReport {
        PositionReport {
            id: 1,
            instrument_id: 1,
            quantity,
            current_price: price,
            report_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_native_value() {
        assert_eq!(report(dec!(10), Some(dec!(5))).native_value(), Some(dec!(50)));
        assert_eq!(report(dec!(10), None).native_value(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_native_value_overflow_is_none() {
        let huge = report(dec!(100000000000000000000), Some(dec!(10000000000)));
        assert_eq!(huge.native_value(), None);
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let new_report = NewPositionReport {
            instrument_id: 1,
            quantity: dec!(3),
            current_price: Some(dec!(-1)),
            report_date: Utc::now(),
        };
        assert!(new_report.validate().is_err());
    }
}
