//! Theme repository trait.

use super::themes_model::{PortfolioTheme, ThemeAsset};
use crate::errors::Result;

/// Read-only access to themes and their target universe.
pub trait ThemeRepositoryTrait: Send + Sync {
    fn get_theme(&self, theme_id: i32) -> Result<Option<PortfolioTheme>>;

    /// Lists themes ordered by name. Archived themes only when asked for.
    fn list_themes(&self, include_archived: bool) -> Result<Vec<PortfolioTheme>>;

    /// Target allocations of a theme, ordered by instrument id.
    fn list_theme_assets(&self, theme_id: i32) -> Result<Vec<ThemeAsset>>;
}
