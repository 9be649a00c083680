use diesel::prelude::*;
use log::debug;
use std::collections::HashSet;
use std::sync::Arc;

use super::model::{NewPositionReportDB, PositionReportDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::position_reports;
use crate::utils::chunk_for_sqlite;
use dragonshield_core::positions::{NewPositionReport, PositionReport, PositionRepositoryTrait};
use dragonshield_core::{Error, Result};

pub struct PositionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PositionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        PositionRepository { pool, writer }
    }

    pub async fn save_report(&self, new_report: NewPositionReport) -> Result<PositionReport> {
        new_report.validate()?;
        let row = NewPositionReportDB::from(new_report);

        self.writer
            .exec(move |conn| {
                let saved = diesel::insert_into(position_reports::table)
                    .values(&row)
                    .returning(PositionReportDB::as_returning())
                    .get_result::<PositionReportDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(PositionReport::try_from(saved)?)
            })
            .await
    }

    pub async fn delete_report(&self, report_id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn| {
                let removed = diesel::delete(position_reports::table.find(report_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(removed)
            })
            .await
    }
}

fn to_domain(rows: Vec<PositionReportDB>) -> Result<Vec<PositionReport>> {
    rows.into_iter()
        .map(|row| PositionReport::try_from(row).map_err(Error::from))
        .collect()
}

impl PositionRepositoryTrait for PositionRepository {
    fn get_latest_reports(&self, instrument_ids: &[i32]) -> Result<Vec<PositionReport>> {
        let mut conn = get_connection(&self.pool)?;
        let mut latest = Vec::new();

        for chunk in chunk_for_sqlite(instrument_ids) {
            // Newest first within each instrument; ties on date go to the higher id.
            let rows = position_reports::table
                .filter(position_reports::instrument_id.eq_any(chunk))
                .select(PositionReportDB::as_select())
                .order((
                    position_reports::instrument_id.asc(),
                    position_reports::report_date.desc(),
                    position_reports::id.desc(),
                ))
                .load::<PositionReportDB>(&mut conn)
                .map_err(StorageError::from)?;

            let mut seen = HashSet::new();
            latest.extend(rows.into_iter().filter(|row| seen.insert(row.instrument_id)));
        }

        debug!(
            "Found latest reports for {} of {} instruments",
            latest.len(),
            instrument_ids.len()
        );
        to_domain(latest)
    }

    fn list_reports(&self, instrument_id: i32) -> Result<Vec<PositionReport>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = position_reports::table
            .filter(position_reports::instrument_id.eq(instrument_id))
            .select(PositionReportDB::as_select())
            .order((position_reports::report_date.desc(), position_reports::id.desc()))
            .load::<PositionReportDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_domain(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use crate::instruments::InstrumentRepository;
    use chrono::{DateTime, TimeZone, Utc};
    use dragonshield_core::errors::DatabaseError;
    use dragonshield_core::instruments::NewInstrument;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    async fn setup() -> (PositionRepository, InstrumentRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        (
            PositionRepository::new(Arc::clone(&pool), writer.clone()),
            InstrumentRepository::new(pool, writer),
            temp_dir,
        )
    }

    async fn instrument(repo: &InstrumentRepository, name: &str) -> i32 {
        repo.create(NewInstrument {
            name: name.to_string(),
            currency: "USD".to_string(),
            isin: None,
            ticker_symbol: None,
            is_active: true,
        })
        .await
        .unwrap()
        .id
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, 0, 0, 0).unwrap()
    }

    fn report(instrument_id: i32, quantity: Decimal, date: DateTime<Utc>) -> NewPositionReport {
        NewPositionReport {
            instrument_id,
            quantity,
            current_price: Some(dec!(5)),
            report_date: date,
        }
    }

    #[tokio::test]
    async fn test_latest_report_per_instrument() {
        let (positions, instruments, _dir) = setup().await;
        let apple = instrument(&instruments, "Apple").await;
        let msft = instrument(&instruments, "Microsoft").await;
        let idle = instrument(&instruments, "Idle").await;

        positions.save_report(report(apple, dec!(1), day(1))).await.unwrap();
        positions.save_report(report(apple, dec!(2), day(3))).await.unwrap();
        positions.save_report(report(apple, dec!(3), day(2))).await.unwrap();
        positions.save_report(report(msft, dec!(4), day(1))).await.unwrap();

        let latest = positions.get_latest_reports(&[apple, msft, idle]).unwrap();
        assert_eq!(latest.len(), 2);

        let apple_latest = latest.iter().find(|r| r.instrument_id == apple).unwrap();
        assert_eq!(apple_latest.quantity, dec!(2));
        assert_eq!(apple_latest.report_date, day(3));
        assert_eq!(apple_latest.native_value(), Some(dec!(10)));
    }

    #[tokio::test]
    async fn test_same_date_ties_go_to_latest_insert() {
        let (positions, instruments, _dir) = setup().await;
        let apple = instrument(&instruments, "Apple").await;

        let first = positions.save_report(report(apple, dec!(1), day(4))).await.unwrap();
        let second = positions.save_report(report(apple, dec!(7), day(4))).await.unwrap();
        assert!(second.id > first.id);

        let latest = positions.get_latest_reports(&[apple]).unwrap();
        assert_eq!(latest[0].id, second.id);
        assert_eq!(latest[0].quantity, dec!(7));

        let history = positions.list_reports(apple).unwrap();
        let ids: Vec<i32> = history.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_report_without_price_round_trips() {
        let (positions, instruments, _dir) = setup().await;
        let apple = instrument(&instruments, "Apple").await;

        let saved = positions
            .save_report(NewPositionReport {
                instrument_id: apple,
                quantity: dec!(12.5),
                current_price: None,
                report_date: day(9),
            })
            .await
            .unwrap();
        assert_eq!(saved.current_price, None);
        assert_eq!(saved.native_value(), Some(Decimal::ZERO));

        assert_eq!(positions.delete_report(saved.id).await.unwrap(), 1);
        assert!(positions.list_reports(apple).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_report_for_unknown_instrument_is_rejected() {
        let (positions, _, _dir) = setup().await;
        let result = positions.save_report(report(42, dec!(1), day(1))).await;
        assert!(matches!(
            result,
            Err(Error::Database(DatabaseError::ForeignKeyViolation(_)))
        ));
    }
}
