//! Instrument repository trait.

use super::instruments_model::Instrument;
use crate::errors::Result;

/// Read-only access to instrument reference data.
pub trait InstrumentRepositoryTrait: Send + Sync {
    /// Retrieves an instrument by its ID.
    fn get_by_id(&self, instrument_id: i32) -> Result<Option<Instrument>>;

    /// Retrieves the instruments with the given IDs. Unknown IDs are skipped.
    fn list_by_ids(&self, instrument_ids: &[i32]) -> Result<Vec<Instrument>>;
}
