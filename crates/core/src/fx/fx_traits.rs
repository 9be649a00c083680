use super::currency_converter::CurrencyConverter;
use super::fx_model::ExchangeRate;
use crate::errors::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Read-only access to stored exchange rates.
pub trait FxRepositoryTrait: Send + Sync {
    /// All historical rates for the given currency codes, oldest first.
    fn get_exchange_rates(&self, currencies: &[String]) -> Result<Vec<ExchangeRate>>;

    /// The latest rate for `currency` dated at or before `as_of` (or the
    /// latest overall when `as_of` is `None`).
    fn get_latest_exchange_rate(
        &self,
        currency: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Option<ExchangeRate>>;
}

/// Trait defining the contract for FX service operations.
pub trait FxServiceTrait: Send + Sync {
    /// Builds a converter preloaded with every rate of the given currencies.
    fn load_converter(&self, currencies: &[String]) -> Result<CurrencyConverter>;

    fn get_rate_to_base(&self, currency: &str, as_of: Option<DateTime<Utc>>) -> Result<Decimal>;

    fn convert_currency_for_date(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Decimal>;
}
