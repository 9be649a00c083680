use diesel::prelude::*;
use diesel::upsert::excluded;
use log::debug;
use std::sync::Arc;

use super::model::{NewPortfolioThemeDB, PortfolioThemeDB, ThemeAssetDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{portfolio_theme_assets, portfolio_themes};
use dragonshield_core::errors::DatabaseError;
use dragonshield_core::themes::{
    NewPortfolioTheme, NewThemeAsset, PortfolioTheme, ThemeAsset, ThemeRepositoryTrait,
};
use dragonshield_core::{Error, Result};

pub struct ThemeRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ThemeRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ThemeRepository { pool, writer }
    }

    pub async fn create_theme(&self, new_theme: NewPortfolioTheme) -> Result<PortfolioTheme> {
        new_theme.validate()?;
        let row = NewPortfolioThemeDB::from(new_theme);

        self.writer
            .exec(move |conn| {
                let created = diesel::insert_into(portfolio_themes::table)
                    .values(&row)
                    .returning(PortfolioThemeDB::as_returning())
                    .get_result::<PortfolioThemeDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(PortfolioTheme::from(created))
            })
            .await
    }

    /// Archived themes keep their targets but drop out of default listings.
    pub async fn archive_theme(&self, theme_id: i32) -> Result<PortfolioTheme> {
        self.writer
            .exec(move |conn| {
                let now = chrono::Utc::now().naive_utc();
                let archived = diesel::update(portfolio_themes::table.find(theme_id))
                    .set((
                        portfolio_themes::archived_at.eq(Some(now)),
                        portfolio_themes::updated_at.eq(now),
                    ))
                    .returning(PortfolioThemeDB::as_returning())
                    .get_result::<PortfolioThemeDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?;

                archived.map(PortfolioTheme::from).ok_or_else(|| {
                    Error::Database(DatabaseError::NotFound(format!("Theme {}", theme_id)))
                })
            })
            .await
    }

    /// Inserts a target or replaces the percentages and notes of an existing one.
    pub async fn upsert_theme_asset(&self, new_asset: NewThemeAsset) -> Result<ThemeAsset> {
        new_asset.validate()?;
        let row = ThemeAssetDB::from(new_asset);

        self.writer
            .exec(move |conn| {
                let saved = diesel::insert_into(portfolio_theme_assets::table)
                    .values(&row)
                    .on_conflict((
                        portfolio_theme_assets::theme_id,
                        portfolio_theme_assets::instrument_id,
                    ))
                    .do_update()
                    .set((
                        portfolio_theme_assets::research_target_pct
                            .eq(excluded(portfolio_theme_assets::research_target_pct)),
                        portfolio_theme_assets::user_target_pct
                            .eq(excluded(portfolio_theme_assets::user_target_pct)),
                        portfolio_theme_assets::notes.eq(excluded(portfolio_theme_assets::notes)),
                        portfolio_theme_assets::updated_at
                            .eq(excluded(portfolio_theme_assets::updated_at)),
                    ))
                    .returning(ThemeAssetDB::as_returning())
                    .get_result::<ThemeAssetDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(ThemeAsset::try_from(saved)?)
            })
            .await
    }

    pub async fn remove_theme_asset(&self, theme_id: i32, instrument_id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn| {
                let removed = diesel::delete(
                    portfolio_theme_assets::table
                        .filter(portfolio_theme_assets::theme_id.eq(theme_id))
                        .filter(portfolio_theme_assets::instrument_id.eq(instrument_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                debug!(
                    "Removed {} target(s) for instrument {} from theme {}",
                    removed, instrument_id, theme_id
                );
                Ok(removed)
            })
            .await
    }
}

impl ThemeRepositoryTrait for ThemeRepository {
    fn get_theme(&self, theme_id: i32) -> Result<Option<PortfolioTheme>> {
        let mut conn = get_connection(&self.pool)?;
        let row = portfolio_themes::table
            .find(theme_id)
            .select(PortfolioThemeDB::as_select())
            .first::<PortfolioThemeDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(PortfolioTheme::from))
    }

    fn list_themes(&self, include_archived: bool) -> Result<Vec<PortfolioTheme>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = portfolio_themes::table
            .select(PortfolioThemeDB::as_select())
            .order((portfolio_themes::name.asc(), portfolio_themes::id.asc()))
            .into_boxed();
        if !include_archived {
            query = query.filter(portfolio_themes::archived_at.is_null());
        }

        let rows = query
            .load::<PortfolioThemeDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(PortfolioTheme::from).collect())
    }

    fn list_theme_assets(&self, theme_id: i32) -> Result<Vec<ThemeAsset>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = portfolio_theme_assets::table
            .filter(portfolio_theme_assets::theme_id.eq(theme_id))
            .select(ThemeAssetDB::as_select())
            .order(portfolio_theme_assets::instrument_id.asc())
            .load::<ThemeAssetDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|row| ThemeAsset::try_from(row).map_err(Error::from))
            .collect()
    }
}
