//! Position report repository trait.

use super::positions_model::PositionReport;
use crate::errors::Result;

/// Read-only access to position reports.
pub trait PositionRepositoryTrait: Send + Sync {
    /// The authoritative report per instrument: latest `report_date`, ties
    /// resolved by the highest report id. Instruments without any report
    /// are absent from the result.
    fn get_latest_reports(&self, instrument_ids: &[i32]) -> Result<Vec<PositionReport>>;

    /// Full report history for one instrument, newest first.
    fn list_reports(&self, instrument_id: i32) -> Result<Vec<PositionReport>>;
}
