//! Instruments module - reference data for tradeable instruments.

mod instruments_model;
mod instruments_traits;

pub use instruments_model::{Instrument, NewInstrument};
pub use instruments_traits::InstrumentRepositoryTrait;
