use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settings that drive valuation and deviation display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationSettings {
    pub base_currency: String,
    /// Default tolerance band in percentage points.
    pub deviation_tolerance_pct: Decimal,
}
