//! Repository traits for settings.

use async_trait::async_trait;

use crate::errors::Result;

/// Repository trait for the key/value settings store.
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    /// Get a single setting value by key. Returns None if not stored.
    fn get_setting(&self, setting_key: &str) -> Result<Option<String>>;

    /// Insert or replace a single setting.
    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()>;
}
