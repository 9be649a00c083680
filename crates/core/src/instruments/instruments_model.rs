//! Instrument domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::fx::{is_valid_currency_code, normalize_currency_code};
use crate::{errors::ValidationError, Error, Result};

/// Domain model representing a tradeable instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: i32,
    pub name: String,
    /// Trading currency; position prices are quoted in it.
    pub currency: String,
    pub isin: Option<String>,
    pub ticker_symbol: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInstrument {
    pub name: String,
    pub currency: String,
    pub isin: Option<String>,
    pub ticker_symbol: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl NewInstrument {
    /// Validates the new instrument data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Instrument name cannot be empty".to_string(),
            )));
        }
        if !is_valid_currency_code(&self.currency) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Invalid instrument currency '{}'",
                self.currency
            ))));
        }
        if let Some(isin) = &self.isin {
            if isin.trim().len() != 12 {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "ISIN '{}' must be 12 characters",
                    isin
                ))));
            }
        }
        Ok(())
    }

    /// Returns a copy with the currency code normalized for storage.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.currency = normalize_currency_code(&self.currency);
        self
    }
}
