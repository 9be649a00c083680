//! Portfolio themes module - thematic groupings and their target allocations.

mod themes_model;
mod themes_traits;

pub use themes_model::{NewPortfolioTheme, NewThemeAsset, PortfolioTheme, ThemeAsset};
pub use themes_traits::ThemeRepositoryTrait;
