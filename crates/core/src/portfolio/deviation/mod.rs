//! Deviation analytics: classifies how far each instrument's actual share
//! sits from its targets and filters rows for display.

mod deviation_calculator;
mod deviation_model;

pub use deviation_calculator::{filter_rows, is_out_of_tolerance, should_include, state, summarize};
pub use deviation_model::{DeviationFilter, DeviationState, DeviationSummary, TargetBasis};
