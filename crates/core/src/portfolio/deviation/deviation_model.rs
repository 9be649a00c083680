use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::valuation::ValuationRow;
use crate::{errors::ValidationError, Error, Result};

/// Position of an actual share relative to its target band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviationState {
    Within,
    Overweight,
    Underweight,
}

/// Which target a deviation is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetBasis {
    Research,
    User,
}

impl TargetBasis {
    pub fn delta_of(&self, row: &ValuationRow) -> Option<Decimal> {
        match self {
            TargetBasis::Research => row.delta_research_pct,
            TargetBasis::User => row.delta_user_pct,
        }
    }
}

/// Display filter for valuation rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationFilter {
    /// Allowed deviation in percentage points.
    pub tolerance: Decimal,
    pub show_research: bool,
    pub show_user: bool,
    pub only_out_of_tolerance: bool,
}

impl DeviationFilter {
    /// Shows both delta columns and every row.
    pub fn new(tolerance: Decimal) -> Self {
        Self {
            tolerance,
            show_research: true,
            show_user: true,
            only_out_of_tolerance: false,
        }
    }

    pub fn out_of_tolerance_only(mut self) -> Self {
        self.only_out_of_tolerance = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.tolerance < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Tolerance cannot be negative, got {}",
                self.tolerance
            ))));
        }
        Ok(())
    }
}

/// Counts of rows per deviation state for one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationSummary {
    pub within: usize,
    pub overweight: usize,
    pub underweight: usize,
    /// Rows without a valuation (no position or missing FX).
    pub excluded: usize,
    /// Largest absolute deviation among valued rows.
    pub max_abs_delta: Decimal,
    pub max_abs_delta_instrument_id: Option<i32>,
}

impl DeviationSummary {
    pub fn out_of_tolerance(&self) -> usize {
        self.overweight + self.underweight
    }
}
