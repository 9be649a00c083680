//! Portfolio analytics over themes: valuation snapshots and deviation checks.

pub mod deviation;
pub mod valuation;

pub use deviation::{DeviationFilter, DeviationState, DeviationSummary, TargetBasis};
pub use valuation::{
    ExclusionReason, ValuationRow, ValuationService, ValuationServiceTrait, ValuationSnapshot,
    ValuationStatus,
};
