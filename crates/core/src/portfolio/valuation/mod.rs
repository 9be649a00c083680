//! Theme valuation: values a theme's positions in the base currency and
//! compares each instrument's share against its targets.

mod valuation_calculator;
mod valuation_model;
mod valuation_service;

pub use valuation_calculator::{calculate_snapshot, value_position, PositionOutcome};
pub use valuation_model::*;
pub use valuation_service::{ValuationService, ValuationServiceTrait};
