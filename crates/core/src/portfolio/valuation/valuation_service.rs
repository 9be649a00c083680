use crate::errors::{DatabaseError, Error, Result};
use crate::fx::FxServiceTrait;
use crate::instruments::{Instrument, InstrumentRepositoryTrait};
use crate::portfolio::valuation::valuation_calculator::calculate_snapshot;
use crate::portfolio::valuation::valuation_model::ValuationSnapshot;
use crate::positions::{PositionReport, PositionRepositoryTrait};
use crate::themes::ThemeRepositoryTrait;
use log::{debug, error};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Instant;

pub trait ValuationServiceTrait: Send + Sync {
    /// Computes the current valuation of a theme against its targets.
    ///
    /// Args:
    ///     theme_id: The ID of the theme to value.
    ///
    /// Returns:
    ///     A `ValuationSnapshot` reflecting the stored data at call time, or an
    ///     error when the theme does not exist or a storage read fails.
    fn snapshot(&self, theme_id: i32) -> Result<ValuationSnapshot>;

    /// Computes snapshots for every theme, ordered by theme name.
    fn snapshot_all(&self, include_archived: bool) -> Result<Vec<ValuationSnapshot>>;
}

#[derive(Clone)]
pub struct ValuationService {
    theme_repository: Arc<dyn ThemeRepositoryTrait>,
    instrument_repository: Arc<dyn InstrumentRepositoryTrait>,
    position_repository: Arc<dyn PositionRepositoryTrait>,
    fx_service: Arc<dyn FxServiceTrait>,
}

impl ValuationService {
    pub fn new(
        theme_repository: Arc<dyn ThemeRepositoryTrait>,
        instrument_repository: Arc<dyn InstrumentRepositoryTrait>,
        position_repository: Arc<dyn PositionRepositoryTrait>,
        fx_service: Arc<dyn FxServiceTrait>,
    ) -> Self {
        Self {
            theme_repository,
            instrument_repository,
            position_repository,
            fx_service,
        }
    }

    fn load_latest_positions(&self, instrument_ids: &[i32]) -> Result<HashMap<i32, PositionReport>> {
        let reports = self.position_repository.get_latest_reports(instrument_ids)?;

        let mut latest: HashMap<i32, PositionReport> = HashMap::with_capacity(reports.len());
        for report in reports {
            match latest.get(&report.instrument_id) {
                Some(existing)
                    if (existing.report_date, existing.id) >= (report.report_date, report.id) => {}
                _ => {
                    latest.insert(report.instrument_id, report);
                }
            }
        }
        Ok(latest)
    }
}

impl ValuationServiceTrait for ValuationService {
    fn snapshot(&self, theme_id: i32) -> Result<ValuationSnapshot> {
        let start_time = Instant::now();

        let theme = self.theme_repository.get_theme(theme_id)?.ok_or_else(|| {
            Error::Database(DatabaseError::NotFound(format!("Theme {}", theme_id)))
        })?;

        let targets = self.theme_repository.list_theme_assets(theme.id)?;
        let instrument_ids: Vec<i32> = targets.iter().map(|t| t.instrument_id).collect();

        let instruments: HashMap<i32, Instrument> = self
            .instrument_repository
            .list_by_ids(&instrument_ids)?
            .into_iter()
            .map(|instrument| (instrument.id, instrument))
            .collect();

        let positions = self.load_latest_positions(&instrument_ids)?;

        let currencies: Vec<String> = positions
            .keys()
            .filter_map(|id| instruments.get(id))
            .map(|instrument| instrument.currency.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let converter = self.fx_service.load_converter(&currencies)?;

        let snapshot = calculate_snapshot(theme.id, &targets, &instruments, &positions, &converter)
            .map_err(|e| {
                error!("Valuation of theme {} ({}) failed: {}", theme.id, theme.code, e);
                e
            })?;

        debug!(
            "Snapshot for theme {} ({}) computed in {:?}",
            theme.id,
            theme.code,
            start_time.elapsed()
        );
        Ok(snapshot)
    }

    fn snapshot_all(&self, include_archived: bool) -> Result<Vec<ValuationSnapshot>> {
        self.theme_repository
            .list_themes(include_archived)?
            .iter()
            .map(|theme| self.snapshot(theme.id))
            .collect()
    }
}
