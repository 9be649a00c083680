use chrono::{DateTime, Utc};
use diesel::prelude::*;
use log::{debug, warn};
use std::sync::Arc;

use super::model::{ExchangeRateDB, NewExchangeRateDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::exchange_rates;
use crate::utils::chunk_for_sqlite;
use dragonshield_core::fx::{normalize_currency_code, ExchangeRate, FxRepositoryTrait, NewExchangeRate};
use dragonshield_core::{Error, Result};

#[derive(Clone)]
pub struct FxRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FxRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Stores a rate after validating it; rates that are not positive once rounded
    /// to storage precision never reach the table.
    pub async fn save_exchange_rate(&self, new_rate: NewExchangeRate) -> Result<ExchangeRate> {
        let new_rate = new_rate.normalized();
        new_rate.validate()?;
        let row = NewExchangeRateDB::from(new_rate);

        self.writer
            .exec(move |conn| {
                let saved = diesel::insert_into(exchange_rates::table)
                    .values(&row)
                    .returning(ExchangeRateDB::as_returning())
                    .get_result::<ExchangeRateDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(ExchangeRate::try_from(saved)?)
            })
            .await
    }

    /// Inserts a batch of rates in one transaction. Any invalid rate rejects the batch.
    pub async fn import_exchange_rates(&self, new_rates: Vec<NewExchangeRate>) -> Result<usize> {
        let rows = new_rates
            .into_iter()
            .map(|rate| {
                let rate = rate.normalized();
                rate.validate().map(|_| NewExchangeRateDB::from(rate))
            })
            .collect::<Result<Vec<_>>>()?;

        self.writer
            .exec(move |conn| {
                let inserted = diesel::insert_into(exchange_rates::table)
                    .values(&rows)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                debug!("Imported {} exchange rates", inserted);
                Ok(inserted)
            })
            .await
    }

    fn to_domain(rows: Vec<ExchangeRateDB>) -> Result<Vec<ExchangeRate>> {
        rows.into_iter()
            .map(|row| ExchangeRate::try_from(row).map_err(Error::from))
            .collect()
    }
}

impl FxRepositoryTrait for FxRepository {
    fn get_exchange_rates(&self, currencies: &[String]) -> Result<Vec<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;
        let codes: Vec<String> = currencies
            .iter()
            .map(|c| normalize_currency_code(c))
            .collect();

        let mut rows = Vec::new();
        for chunk in chunk_for_sqlite(&codes) {
            let loaded = exchange_rates::table
                .filter(exchange_rates::currency_code.eq_any(chunk))
                .select(ExchangeRateDB::as_select())
                .order((
                    exchange_rates::currency_code.asc(),
                    exchange_rates::rate_date.asc(),
                    exchange_rates::id.asc(),
                ))
                .load::<ExchangeRateDB>(&mut conn)
                .map_err(StorageError::from)?;
            rows.extend(loaded);
        }

        let rates = Self::to_domain(rows)?;
        for code in &codes {
            if !rates.iter().any(|r| &r.currency_code == code) {
                warn!("No exchange rates stored for {}", code);
            }
        }
        Ok(rates)
    }

    fn get_latest_exchange_rate(
        &self,
        currency: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Option<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;
        let code = normalize_currency_code(currency);

        let mut query = exchange_rates::table
            .filter(exchange_rates::currency_code.eq(code))
            .select(ExchangeRateDB::as_select())
            .order((exchange_rates::rate_date.desc(), exchange_rates::id.desc()))
            .into_boxed();
        if let Some(as_of) = as_of {
            query = query.filter(exchange_rates::rate_date.le(as_of.naive_utc()));
        }

        let row = query
            .first::<ExchangeRateDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(|r| ExchangeRate::try_from(r).map_err(Error::from))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use chrono::TimeZone;
    use dragonshield_core::fx::{CurrencyConverter, RateSource};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    async fn setup() -> (FxRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        (FxRepository::new(pool, writer), temp_dir)
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, d, 0, 0, 0).unwrap()
    }

    fn rate(code: &str, date: DateTime<Utc>, value: Decimal) -> NewExchangeRate {
        NewExchangeRate {
            currency_code: code.to_string(),
            rate_date: date,
            rate_to_base: value,
            source: RateSource::Import,
        }
    }

    #[tokio::test]
    async fn test_latest_rate_respects_as_of() {
        let (repo, _dir) = setup().await;
        repo.save_exchange_rate(rate("usd", day(1), dec!(0.88))).await.unwrap();
        repo.save_exchange_rate(rate("USD", day(10), dec!(0.91))).await.unwrap();

        let latest = repo.get_latest_exchange_rate("USD", None).unwrap().unwrap();
        assert_eq!(latest.rate_to_base, dec!(0.91));
        assert_eq!(latest.source, RateSource::Import);

        let earlier = repo
            .get_latest_exchange_rate("usd", Some(day(5)))
            .unwrap()
            .unwrap();
        assert_eq!(earlier.rate_to_base, dec!(0.88));

        assert!(repo
            .get_latest_exchange_rate("USD", Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_same_date_ties_go_to_highest_id() {
        let (repo, _dir) = setup().await;
        repo.save_exchange_rate(rate("EUR", day(3), dec!(0.95))).await.unwrap();
        let corrected = repo
            .save_exchange_rate(rate("EUR", day(3), dec!(0.96)))
            .await
            .unwrap();

        let latest = repo.get_latest_exchange_rate("EUR", Some(day(3))).unwrap().unwrap();
        assert_eq!(latest.id, corrected.id);

        let converter = CurrencyConverter::new("CHF", repo.get_exchange_rates(&["EUR".to_string()]).unwrap());
        assert_eq!(converter.rate_to_base("EUR", Some(day(3))).unwrap(), dec!(0.96));
    }

    #[tokio::test]
    async fn test_get_exchange_rates_filters_currencies() {
        let (repo, _dir) = setup().await;
        let imported = repo
            .import_exchange_rates(vec![
                rate("USD", day(2), dec!(0.9)),
                rate("USD", day(1), dec!(0.89)),
                rate("EUR", day(1), dec!(0.95)),
                rate("GBP", day(1), dec!(1.12)),
            ])
            .await
            .unwrap();
        assert_eq!(imported, 4);

        let rates = repo
            .get_exchange_rates(&["usd".to_string(), "EUR".to_string(), "JPY".to_string()])
            .unwrap();
        let summary: Vec<(String, Decimal)> = rates
            .into_iter()
            .map(|r| (r.currency_code, r.rate_to_base))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("EUR".to_string(), dec!(0.95)),
                ("USD".to_string(), dec!(0.89)),
                ("USD".to_string(), dec!(0.9)),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_rates_are_rejected() {
        let (repo, _dir) = setup().await;
        assert!(repo.save_exchange_rate(rate("USD", day(1), dec!(0))).await.is_err());
        assert!(repo
            .import_exchange_rates(vec![rate("USD", day(1), dec!(0.9)), rate("XX", day(1), dec!(1))])
            .await
            .is_err());
        assert!(repo.get_exchange_rates(&["USD".to_string()]).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rate_rounding_to_zero_is_rejected() {
        let (repo, _dir) = setup().await;
        assert!(repo
            .save_exchange_rate(rate("VND", day(1), dec!(0.0000004)))
            .await
            .is_err());
        assert!(repo.get_exchange_rates(&["VND".to_string()]).unwrap().is_empty());

        let saved = repo
            .save_exchange_rate(rate("VND", day(1), dec!(0.0000036)))
            .await
            .unwrap();
        assert_eq!(saved.rate_to_base, dec!(0.000004));
    }
}
