//! SQLite storage implementation for exchange rates.

mod model;
mod repository;

pub use model::{ExchangeRateDB, NewExchangeRateDB};
pub use repository::FxRepository;

pub use dragonshield_core::fx::FxRepositoryTrait;
