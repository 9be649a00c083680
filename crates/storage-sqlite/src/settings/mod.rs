//! SQLite storage implementation for settings.

mod model;
mod repository;

pub use model::SettingDB;
pub use repository::SettingsRepository;

pub use dragonshield_core::settings::SettingsRepositoryTrait;
