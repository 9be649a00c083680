/// Base currency used when no setting is stored
pub const DEFAULT_BASE_CURRENCY: &str = "CHF";

/// Default deviation tolerance in percentage points
pub const DEFAULT_DEVIATION_TOLERANCE_PCT: &str = "5";

/// Decimal precision for stored amounts and rates
pub const DECIMAL_PRECISION: u32 = 6;

/// Allowed drift when checking that actual percentages add up to 100
pub const PERCENT_SUM_TOLERANCE: &str = "0.01";

/// Settings keys
pub const SETTING_BASE_CURRENCY: &str = "base_currency";
pub const SETTING_DEVIATION_TOLERANCE: &str = "deviation_tolerance_pct";
