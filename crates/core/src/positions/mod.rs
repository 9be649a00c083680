//! Positions module - point-in-time holding reports.

mod positions_model;
mod positions_traits;

pub use positions_model::{NewPositionReport, PositionReport};
pub use positions_traits::PositionRepositoryTrait;
