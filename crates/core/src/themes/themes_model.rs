//! Portfolio theme domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// A named, user-defined grouping of instruments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTheme {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub archived_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PortfolioTheme {
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolioTheme {
    pub name: String,
    pub code: String,
}

impl NewPortfolioTheme {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Theme name cannot be empty".to_string(),
            )));
        }
        let code = self.code.trim();
        if code.is_empty()
            || code.len() > 20
            || !code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Theme code '{}' must be 1-20 letters, digits, '_' or '-'",
                self.code
            ))));
        }
        Ok(())
    }
}

/// Target allocation of one instrument within a theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeAsset {
    pub theme_id: i32,
    pub instrument_id: i32,
    /// Suggested baseline share of the theme, in percent.
    pub research_target_pct: Decimal,
    /// User override share of the theme, in percent.
    pub user_target_pct: Decimal,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for adding or replacing a theme target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewThemeAsset {
    pub theme_id: i32,
    pub instrument_id: i32,
    pub research_target_pct: Decimal,
    /// Falls back to the research target when absent.
    pub user_target_pct: Option<Decimal>,
    pub notes: Option<String>,
}

impl NewThemeAsset {
    pub fn validate(&self) -> Result<()> {
        check_pct("Research target", self.research_target_pct)?;
        if let Some(user) = self.user_target_pct {
            check_pct("User target", user)?;
        }
        Ok(())
    }

    pub fn effective_user_target_pct(&self) -> Decimal {
        self.user_target_pct.unwrap_or(self.research_target_pct)
    }
}

fn check_pct(label: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO || value > dec!(100) {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "{} must be between 0 and 100, got {}",
            label, value
        ))));
    }
    Ok(())
}
