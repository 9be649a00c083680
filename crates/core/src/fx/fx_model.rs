use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currency::{is_valid_currency_code, normalize_currency_code};
use crate::constants::DECIMAL_PRECISION;
use crate::errors::{Error, Result, ValidationError};

/// Where an exchange rate came from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateSource {
    #[default]
    Manual,
    Api,
    Import,
}

impl RateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateSource::Manual => "manual",
            RateSource::Api => "api",
            RateSource::Import => "import",
        }
    }
}

impl From<&str> for RateSource {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "api" => RateSource::Api,
            "import" => RateSource::Import,
            _ => RateSource::Manual,
        }
    }
}

/// A historical rate expressing one unit of `currency_code` in the base currency.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub id: i32,
    pub currency_code: String,
    pub rate_date: DateTime<Utc>,
    #[serde(serialize_with = "serialize_decimal_6")]
    pub rate_to_base: Decimal,
    pub source: RateSource,
}

fn serialize_decimal_6<S>(decimal: &Decimal, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let rounded = decimal.round_dp(DECIMAL_PRECISION);
    serializer.serialize_str(&rounded.to_string())
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewExchangeRate {
    pub currency_code: String,
    pub rate_date: DateTime<Utc>,
    pub rate_to_base: Decimal,
    #[serde(default)]
    pub source: RateSource,
}

impl NewExchangeRate {
    pub fn validate(&self) -> Result<()> {
        if !is_valid_currency_code(&self.currency_code) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Invalid currency code '{}'",
                self.currency_code
            ))));
        }
        // Rates are stored at DECIMAL_PRECISION places; check what will be stored.
        if self.rate_to_base.round_dp(DECIMAL_PRECISION) <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Exchange rate must be greater than zero at {} decimal places, got {}",
                DECIMAL_PRECISION, self.rate_to_base
            ))));
        }
        Ok(())
    }

    /// Returns a copy with the currency code normalized for storage.
    pub fn normalized(mut self) -> Self {
        self.currency_code = normalize_currency_code(&self.currency_code);
        self
    }
}
