//! DragonShield Core - Domain entities, services, and traits.
//!
//! This crate contains the valuation and deviation logic of DragonShield.
//! It is database-agnostic and defines read-only repository traits that are
//! implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod fx;
pub mod instruments;
pub mod portfolio;
pub mod positions;
pub mod settings;
pub mod themes;

// Re-export the valuation surface
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
