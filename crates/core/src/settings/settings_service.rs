use super::SettingsRepositoryTrait;
use crate::constants::{
    DEFAULT_BASE_CURRENCY, DEFAULT_DEVIATION_TOLERANCE_PCT, SETTING_BASE_CURRENCY,
    SETTING_DEVIATION_TOLERANCE,
};
use crate::errors::{Error, Result, ValidationError};
use crate::fx::{is_valid_currency_code, normalize_currency_code};
use crate::settings::ValuationSettings;
use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn get_settings(&self) -> Result<ValuationSettings>;

    fn get_base_currency(&self) -> Result<String>;

    fn get_deviation_tolerance(&self) -> Result<Decimal>;

    async fn update_base_currency(&self, new_base_currency: &str) -> Result<()>;

    async fn update_deviation_tolerance(&self, tolerance_pct: Decimal) -> Result<()>;
}

pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
    base_currency: Arc<RwLock<String>>,
}

impl SettingsService {
    /// Loads the stored base currency into a shared handle that FX and
    /// valuation services read from.
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Result<Self> {
        let base_currency = read_base_currency(settings_repository.as_ref())?;
        Ok(Self {
            settings_repository,
            base_currency: Arc::new(RwLock::new(base_currency)),
        })
    }

    /// Shared base currency, kept in sync by `update_base_currency`.
    pub fn base_currency_handle(&self) -> Arc<RwLock<String>> {
        Arc::clone(&self.base_currency)
    }
}

fn read_base_currency(repository: &dyn SettingsRepositoryTrait) -> Result<String> {
    match repository.get_setting(SETTING_BASE_CURRENCY)? {
        Some(value) if is_valid_currency_code(&value) => Ok(normalize_currency_code(&value)),
        Some(value) => {
            warn!(
                "Ignoring invalid stored base currency '{}', using {}",
                value, DEFAULT_BASE_CURRENCY
            );
            Ok(DEFAULT_BASE_CURRENCY.to_string())
        }
        None => Ok(DEFAULT_BASE_CURRENCY.to_string()),
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_settings(&self) -> Result<ValuationSettings> {
        Ok(ValuationSettings {
            base_currency: self.get_base_currency()?,
            deviation_tolerance_pct: self.get_deviation_tolerance()?,
        })
    }

    fn get_base_currency(&self) -> Result<String> {
        self.base_currency
            .read()
            .map(|base| base.clone())
            .map_err(|e| Error::Unexpected(format!("Base currency lock poisoned: {}", e)))
    }

    fn get_deviation_tolerance(&self) -> Result<Decimal> {
        let stored = self
            .settings_repository
            .get_setting(SETTING_DEVIATION_TOLERANCE)?;
        let raw = stored.as_deref().unwrap_or(DEFAULT_DEVIATION_TOLERANCE_PCT);

        match Decimal::from_str(raw) {
            Ok(value) if value >= Decimal::ZERO => Ok(value),
            _ => Err(Error::InvalidConfigValue(format!(
                "{} = '{}'",
                SETTING_DEVIATION_TOLERANCE, raw
            ))),
        }
    }

    async fn update_base_currency(&self, new_base_currency: &str) -> Result<()> {
        if !is_valid_currency_code(new_base_currency) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Invalid base currency '{}'",
                new_base_currency
            ))));
        }
        let normalized = normalize_currency_code(new_base_currency);

        self.settings_repository
            .update_setting(SETTING_BASE_CURRENCY, &normalized)
            .await?;

        let mut base = self
            .base_currency
            .write()
            .map_err(|e| Error::Unexpected(format!("Base currency lock poisoned: {}", e)))?;
        debug!("Base currency changed from {} to {}", *base, normalized);
        *base = normalized;
        Ok(())
    }

    async fn update_deviation_tolerance(&self, tolerance_pct: Decimal) -> Result<()> {
        if tolerance_pct < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Tolerance cannot be negative, got {}",
                tolerance_pct
            ))));
        }
        self.settings_repository
            .update_setting(SETTING_DEVIATION_TOLERANCE, &tolerance_pct.normalize().to_string())
            .await
    }
}
