//! SQLite storage implementation for position reports.

mod model;
mod repository;

pub use model::{NewPositionReportDB, PositionReportDB};
pub use repository::PositionRepository;

pub use dragonshield_core::positions::PositionRepositoryTrait;
