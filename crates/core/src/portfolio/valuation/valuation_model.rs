//! Theme valuation domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::PERCENT_SUM_TOLERANCE;
use crate::fx::FxError;

/// Outcome of valuing one target row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValuationStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FX missing — excluded")]
    FxMissing,
    #[serde(rename = "No position")]
    NoPosition,
}

impl ValuationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValuationStatus::Ok => "OK",
            ValuationStatus::FxMissing => "FX missing — excluded",
            ValuationStatus::NoPosition => "No position",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ValuationStatus::Ok)
    }
}

impl fmt::Display for ValuationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a target row contributes nothing to the theme total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    NoPosition,
    FxMissing(FxError),
}

impl ExclusionReason {
    pub fn status(&self) -> ValuationStatus {
        match self {
            ExclusionReason::NoPosition => ValuationStatus::NoPosition,
            ExclusionReason::FxMissing(_) => ValuationStatus::FxMissing,
        }
    }
}

/// One instrument of a theme: actual share versus research and user targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRow {
    pub instrument_id: i32,
    pub instrument_name: String,
    pub instrument_currency: String,
    pub research_target_pct: Decimal,
    pub user_target_pct: Decimal,
    /// Value in the base currency; `None` when the row is excluded.
    pub current_value_base: Option<Decimal>,
    /// Share of the theme total in percent; zero for excluded rows.
    pub actual_pct: Decimal,
    pub delta_research_pct: Option<Decimal>,
    pub delta_user_pct: Option<Decimal>,
    pub status: ValuationStatus,
    pub notes: Option<String>,
}

impl ValuationRow {
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}

/// Point-in-time valuation of a theme. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationSnapshot {
    pub theme_id: i32,
    pub base_currency: String,
    pub total_value_base: Decimal,
    pub excluded_fx_count: usize,
    pub rows: Vec<ValuationRow>,
}

impl ValuationSnapshot {
    pub fn ok_rows(&self) -> impl Iterator<Item = &ValuationRow> {
        self.rows.iter().filter(|row| row.is_ok())
    }

    pub fn no_position_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.status == ValuationStatus::NoPosition)
            .count()
    }

    /// Sum of `actual_pct` over the rows that were valued, `None` on overflow.
    pub fn actual_pct_sum(&self) -> Option<Decimal> {
        self.ok_rows()
            .try_fold(Decimal::ZERO, |sum, row| sum.checked_add(row.actual_pct))
    }

    /// True when the actual percentages add up to 100 (or are all zero for
    /// an empty total), within a rounding tolerance.
    pub fn is_balanced(&self) -> bool {
        let tolerance = Decimal::from_str(PERCENT_SUM_TOLERANCE).unwrap_or(Decimal::ZERO);
        if self.total_value_base.is_zero() {
            return self.rows.iter().all(|row| row.actual_pct.is_zero());
        }
        self.actual_pct_sum()
            .and_then(|sum| sum.checked_sub(Decimal::ONE_HUNDRED))
            .is_some_and(|diff| diff.abs() <= tolerance)
    }
}
