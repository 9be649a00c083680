use super::currency::normalize_currency_code;
use super::currency_converter::CurrencyConverter;
use super::fx_errors::FxError;
use super::fx_traits::{FxRepositoryTrait, FxServiceTrait};
use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub struct FxService {
    base_currency: Arc<RwLock<String>>,
    repository: Arc<dyn FxRepositoryTrait>,
}

impl FxService {
    pub fn new(base_currency: Arc<RwLock<String>>, repository: Arc<dyn FxRepositoryTrait>) -> Self {
        Self {
            base_currency,
            repository,
        }
    }

    fn current_base_currency(&self) -> Result<String> {
        self.base_currency
            .read()
            .map(|base| normalize_currency_code(&base))
            .map_err(|e| Error::Unexpected(format!("Base currency lock poisoned: {}", e)))
    }
}

impl FxServiceTrait for FxService {
    fn load_converter(&self, currencies: &[String]) -> Result<CurrencyConverter> {
        let base_currency = self.current_base_currency()?;

        let wanted: Vec<String> = currencies
            .iter()
            .map(|c| normalize_currency_code(c))
            .filter(|c| *c != base_currency)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if wanted.is_empty() {
            return Ok(CurrencyConverter::new(&base_currency, Vec::new()));
        }

        let rates = self.repository.get_exchange_rates(&wanted)?;
        log::debug!(
            "Loaded {} exchange rates for {} currencies (base {})",
            rates.len(),
            wanted.len(),
            base_currency
        );

        Ok(CurrencyConverter::new(&base_currency, rates))
    }

    fn get_rate_to_base(&self, currency: &str, as_of: Option<DateTime<Utc>>) -> Result<Decimal> {
        let base_currency = self.current_base_currency()?;
        let currency = normalize_currency_code(currency);
        if currency == base_currency {
            return Ok(Decimal::ONE);
        }

        match self.repository.get_latest_exchange_rate(&currency, as_of)? {
            Some(rate) if rate.rate_to_base > Decimal::ZERO => Ok(rate.rate_to_base),
            Some(rate) => Err(FxError::InvalidRate {
                currency,
                rate: rate.rate_to_base,
            }
            .into()),
            None => Err(FxError::rate_not_found(&currency, as_of).into()),
        }
    }

    fn convert_currency_for_date(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Decimal> {
        if normalize_currency_code(from_currency) == normalize_currency_code(to_currency) {
            return Ok(amount);
        }

        let converter =
            self.load_converter(&[from_currency.to_string(), to_currency.to_string()])?;
        converter
            .convert_amount(amount, from_currency, to_currency, as_of)
            .map_err(Error::from)
    }
}
