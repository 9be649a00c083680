//! Database model for settings.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Database model for settings key-value pairs
#[derive(Queryable, Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::settings)]
#[serde(rename_all = "camelCase")]
pub struct SettingDB {
    pub setting_key: String,
    pub setting_value: String,
}
