use crate::fx::currency::normalize_currency_code;
use crate::fx::fx_errors::FxError;
use crate::fx::fx_model::ExchangeRate;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// In-memory rate table for converting amounts through a base currency.
///
/// Each currency keeps its own time series of rate-to-base values. Lookups
/// pick the latest rate at or before the requested time, or the latest rate
/// overall when no time is given. Two rates sharing a timestamp are ordered
/// by row id, so the higher id wins.
pub struct CurrencyConverter {
    base_currency: String,

    /// Key: currency code
    /// Value: BTreeMap<(rate date, row id), rate to base>
    rates: HashMap<String, BTreeMap<(DateTime<Utc>, i32), Decimal>>,
}

impl CurrencyConverter {
    /// Creates a new `CurrencyConverter` for `base_currency` from a Vec of ExchangeRate.
    pub fn new(base_currency: &str, exchange_rates: Vec<ExchangeRate>) -> Self {
        let mut converter = CurrencyConverter {
            base_currency: normalize_currency_code(base_currency),
            rates: HashMap::new(),
        };
        converter.add_historical_rates(exchange_rates);
        converter
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    /// Adds historical rates. Rates for the base currency itself and
    /// non-positive rates are ignored.
    pub fn add_historical_rates(&mut self, rates: Vec<ExchangeRate>) {
        for rate in rates {
            let currency = normalize_currency_code(&rate.currency_code);
            if currency == self.base_currency {
                continue;
            }
            if rate.rate_to_base <= Decimal::ZERO {
                log::warn!(
                    "Skipping non-positive exchange rate {} for {} on {}",
                    rate.rate_to_base,
                    currency,
                    rate.rate_date
                );
                continue;
            }

            self.rates
                .entry(currency)
                .or_default()
                .insert((rate.rate_date, rate.id), rate.rate_to_base);
        }
    }

    pub fn has_rates_for(&self, currency: &str) -> bool {
        let currency = normalize_currency_code(currency);
        currency == self.base_currency || self.rates.contains_key(&currency)
    }

    /// Rate expressing one unit of `currency` in the base currency.
    ///
    /// With `as_of` set, only rates dated at or before it are considered.
    pub fn rate_to_base(
        &self,
        currency: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Decimal, FxError> {
        let currency = normalize_currency_code(currency);
        if currency == self.base_currency {
            return Ok(Decimal::ONE);
        }

        let history = self
            .rates
            .get(&currency)
            .ok_or_else(|| FxError::rate_not_found(&currency, as_of))?;

        let found = match as_of {
            Some(ts) => history.range(..=(ts, i32::MAX)).next_back(),
            None => history.iter().next_back(),
        };

        found
            .map(|(_, rate)| *rate)
            .ok_or_else(|| FxError::rate_not_found(&currency, as_of))
    }

    /// Converts `amount` from one currency to another as of the given time.
    ///
    /// Identical currencies short-circuit without any lookup. Otherwise the
    /// amount goes through the base currency: multiply by the source rate,
    /// divide by the target rate.
    pub fn convert_amount(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Decimal, FxError> {
        let from = normalize_currency_code(from_currency);
        let to = normalize_currency_code(to_currency);
        if from == to {
            return Ok(amount);
        }

        let in_base = if from == self.base_currency {
            amount
        } else {
            let from_rate = self.rate_to_base(&from, as_of)?;
            amount.checked_mul(from_rate).ok_or_else(|| {
                FxError::ConversionError(format!("Overflow converting {} {} to base", amount, from))
            })?
        };

        if to == self.base_currency {
            return Ok(in_base);
        }

        let to_rate = self.rate_to_base(&to, as_of)?;
        in_base.checked_div(to_rate).ok_or_else(|| FxError::InvalidRate {
            currency: to.clone(),
            rate: to_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::RateSource;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn make_rate(id: i32, code: &str, rate: Decimal, y: i32, m: u32, d: u32) -> ExchangeRate {
        ExchangeRate {
            id,
            currency_code: code.to_string(),
            rate_date: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            rate_to_base: rate,
            source: RateSource::Manual,
        }
    }

    fn at(y: i32, m: u32, d: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_identity_needs_no_rate() {
        let converter = CurrencyConverter::new("CHF", vec![]);
        let value = converter
            .convert_amount(dec!(123.45), "JPY", "JPY", None)
            .unwrap();
        assert_eq!(value, dec!(123.45));
    }

    #[test]
    fn test_direct_conversion_multiplies() {
        let converter = CurrencyConverter::new("CHF", vec![make_rate(1, "USD", dec!(0.9), 2024, 1, 1)]);
        let value = converter
            .convert_amount(dec!(50), "USD", "CHF", at(2024, 1, 2))
            .unwrap();
        assert_eq!(value, dec!(45));
    }

    #[test]
    fn test_reverse_conversion_divides() {
        let converter = CurrencyConverter::new("CHF", vec![make_rate(1, "USD", dec!(0.8), 2024, 1, 1)]);
        let value = converter
            .convert_amount(dec!(40), "CHF", "USD", at(2024, 1, 2))
            .unwrap();
        assert_eq!(value, dec!(50));
    }

    #[test]
    fn test_cross_conversion_goes_through_base() {
        let converter = CurrencyConverter::new(
            "CHF",
            vec![
                make_rate(1, "USD", dec!(0.9), 2024, 1, 1),
                make_rate(2, "EUR", dec!(0.95), 2024, 1, 1),
            ],
        );
        let value = converter
            .convert_amount(dec!(95), "EUR", "USD", None)
            .unwrap();
        // 95 EUR -> 90.25 CHF -> 100.2777... USD
        assert_eq!(value.round_dp(4), dec!(100.2778));
    }

    #[test]
    fn test_latest_rate_at_or_before_as_of() {
        let converter = CurrencyConverter::new(
            "CHF",
            vec![
                make_rate(1, "USD", dec!(0.90), 2024, 1, 1),
                make_rate(2, "USD", dec!(0.92), 2024, 2, 1),
                make_rate(3, "USD", dec!(0.95), 2024, 3, 1),
            ],
        );

        assert_eq!(converter.rate_to_base("USD", at(2024, 2, 15)).unwrap(), dec!(0.92));
        assert_eq!(converter.rate_to_base("USD", at(2024, 2, 1)).unwrap(), dec!(0.92));
        assert_eq!(converter.rate_to_base("USD", None).unwrap(), dec!(0.95));
    }

    #[test]
    fn test_no_rate_before_as_of_fails() {
        let converter = CurrencyConverter::new("CHF", vec![make_rate(1, "USD", dec!(0.9), 2024, 6, 1)]);
        let err = converter.rate_to_base("USD", at(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, FxError::RateNotFound { ref currency, .. } if currency == "USD"));
    }

    #[test]
    fn test_unknown_currency_fails() {
        let converter = CurrencyConverter::new("CHF", vec![]);
        let err = converter
            .convert_amount(dec!(10), "GBP", "CHF", None)
            .unwrap_err();
        assert!(err.is_missing_rate());
    }

    #[test]
    fn test_same_timestamp_prefers_highest_id() {
        let converter = CurrencyConverter::new(
            "CHF",
            vec![
                make_rate(7, "USD", dec!(0.91), 2024, 1, 1),
                make_rate(3, "USD", dec!(0.89), 2024, 1, 1),
            ],
        );
        assert_eq!(converter.rate_to_base("USD", at(2024, 1, 1)).unwrap(), dec!(0.91));
        assert_eq!(converter.rate_to_base("USD", None).unwrap(), dec!(0.91));
    }

    #[test]
    fn test_non_positive_rates_are_skipped() {
        let converter = CurrencyConverter::new(
            "CHF",
            vec![
                make_rate(1, "USD", dec!(0.9), 2024, 1, 1),
                make_rate(2, "USD", dec!(0), 2024, 2, 1),
            ],
        );
        assert_eq!(converter.rate_to_base("USD", None).unwrap(), dec!(0.9));
    }

    #[test]
    fn test_codes_are_case_insensitive() {
        let converter = CurrencyConverter::new("chf", vec![make_rate(1, "usd", dec!(0.9), 2024, 1, 1)]);
        assert!(converter.has_rates_for("USD"));
        assert!(converter.has_rates_for("Chf"));
        assert_eq!(
            converter.convert_amount(dec!(10), "Usd", "CHF", None).unwrap(),
            dec!(9)
        );
    }
}
