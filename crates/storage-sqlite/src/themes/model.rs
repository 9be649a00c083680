//! Database models for portfolio themes.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{parse_decimal, StorageError};
use dragonshield_core::constants::DECIMAL_PRECISION;
use dragonshield_core::themes::{NewPortfolioTheme, NewThemeAsset, PortfolioTheme, ThemeAsset};

/// Database model for portfolio themes
#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolio_themes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PortfolioThemeDB {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub archived_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolio_themes)]
pub struct NewPortfolioThemeDB {
    pub name: String,
    pub code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for theme targets. Percentages are stored as TEXT.
#[derive(
    Queryable, Insertable, Selectable, AsChangeset, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::portfolio_theme_assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ThemeAssetDB {
    pub theme_id: i32,
    pub instrument_id: i32,
    pub research_target_pct: String,
    pub user_target_pct: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<PortfolioThemeDB> for PortfolioTheme {
    fn from(db: PortfolioThemeDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            code: db.code,
            archived_at: db.archived_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewPortfolioTheme> for NewPortfolioThemeDB {
    fn from(domain: NewPortfolioTheme) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            name: domain.name.trim().to_string(),
            code: domain.code.trim().to_uppercase(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<ThemeAssetDB> for ThemeAsset {
    type Error = StorageError;

    fn try_from(db: ThemeAssetDB) -> Result<Self, Self::Error> {
        Ok(Self {
            theme_id: db.theme_id,
            instrument_id: db.instrument_id,
            research_target_pct: parse_decimal("research_target_pct", &db.research_target_pct)?,
            user_target_pct: parse_decimal("user_target_pct", &db.user_target_pct)?,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<NewThemeAsset> for ThemeAssetDB {
    fn from(domain: NewThemeAsset) -> Self {
        let now = chrono::Utc::now().naive_utc();
        let user_target_pct = domain.effective_user_target_pct();
        Self {
            theme_id: domain.theme_id,
            instrument_id: domain.instrument_id,
            research_target_pct: domain
                .research_target_pct
                .round_dp(DECIMAL_PRECISION)
                .to_string(),
            user_target_pct: user_target_pct.round_dp(DECIMAL_PRECISION).to_string(),
            notes: domain.notes.filter(|n| !n.trim().is_empty()),
            created_at: now,
            updated_at: now,
        }
    }
}
