//! SQLite storage implementation for DragonShield.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `dragonshield-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for instruments, themes, positions, rates and settings
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place where Diesel dependencies exist. The core crate
//! only sees read-only traits; writes go through the single writer actor.
//!
//! ```text
//!      core (valuation, deviation)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod fx;
pub mod instruments;
pub mod positions;
pub mod settings;
pub mod themes;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, prepare_database, run_migrations,
    spawn_writer, DbConnection, DbPool, WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

// Re-export repositories
pub use fx::FxRepository;
pub use instruments::InstrumentRepository;
pub use positions::PositionRepository;
pub use settings::SettingsRepository;
pub use themes::ThemeRepository;

// Re-export from dragonshield-core for convenience
pub use dragonshield_core::errors::{DatabaseError, Error, Result};
