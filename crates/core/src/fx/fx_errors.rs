use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// Failures of a single currency conversion.
///
/// A missing rate is an expected outcome during valuation: the caller turns
/// it into a per-row exclusion rather than aborting the whole computation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FxError {
    #[error("Exchange rate not found for {currency} as of {}", describe_as_of(.as_of))]
    RateNotFound {
        currency: String,
        as_of: Option<DateTime<Utc>>,
    },

    #[error("Invalid exchange rate {rate} for {currency}")]
    InvalidRate { currency: String, rate: Decimal },

    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    #[error("Currency conversion error: {0}")]
    ConversionError(String),
}

impl FxError {
    pub fn rate_not_found(currency: &str, as_of: Option<DateTime<Utc>>) -> Self {
        FxError::RateNotFound {
            currency: currency.to_string(),
            as_of,
        }
    }

    /// True when the failure means "no usable rate" rather than bad input.
    pub fn is_missing_rate(&self) -> bool {
        matches!(
            self,
            FxError::RateNotFound { .. } | FxError::InvalidRate { .. }
        )
    }
}

fn describe_as_of(as_of: &Option<DateTime<Utc>>) -> String {
    match as_of {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "latest".to_string(),
    }
}
