//! SQLite storage implementation for portfolio themes and their targets.

mod model;
mod repository;

pub use model::{NewPortfolioThemeDB, PortfolioThemeDB, ThemeAssetDB};
pub use repository::ThemeRepository;

pub use dragonshield_core::themes::ThemeRepositoryTrait;
