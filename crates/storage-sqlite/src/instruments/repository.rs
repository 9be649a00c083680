use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::{InstrumentDB, NewInstrumentDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::instruments;
use crate::utils::chunk_for_sqlite;
use dragonshield_core::instruments::{Instrument, InstrumentRepositoryTrait, NewInstrument};
use dragonshield_core::Result;

pub struct InstrumentRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl InstrumentRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        InstrumentRepository { pool, writer }
    }

    pub fn list_instruments(&self) -> Result<Vec<Instrument>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = instruments::table
            .select(InstrumentDB::as_select())
            .order(instruments::name.asc())
            .load::<InstrumentDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Instrument::from).collect())
    }

    pub async fn create(&self, new_instrument: NewInstrument) -> Result<Instrument> {
        new_instrument.validate()?;
        let row = NewInstrumentDB::from(new_instrument.normalized());

        self.writer
            .exec(move |conn| {
                let created = diesel::insert_into(instruments::table)
                    .values(&row)
                    .returning(InstrumentDB::as_returning())
                    .get_result::<InstrumentDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Instrument::from(created))
            })
            .await
    }

    pub async fn set_active(&self, instrument_id: i32, active: bool) -> Result<()> {
        self.writer
            .exec(move |conn| {
                let updated = diesel::update(instruments::table.find(instrument_id))
                    .set((
                        instruments::is_active.eq(active),
                        instruments::updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(StorageError::from(diesel::result::Error::NotFound).into());
                }
                Ok(())
            })
            .await
    }
}

impl InstrumentRepositoryTrait for InstrumentRepository {
    fn get_by_id(&self, instrument_id: i32) -> Result<Option<Instrument>> {
        let mut conn = get_connection(&self.pool)?;
        let row = instruments::table
            .find(instrument_id)
            .select(InstrumentDB::as_select())
            .first::<InstrumentDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Instrument::from))
    }

    fn list_by_ids(&self, instrument_ids: &[i32]) -> Result<Vec<Instrument>> {
        let mut conn = get_connection(&self.pool)?;
        let mut result = Vec::with_capacity(instrument_ids.len());

        for chunk in chunk_for_sqlite(instrument_ids) {
            let rows = instruments::table
                .filter(instruments::id.eq_any(chunk))
                .select(InstrumentDB::as_select())
                .load::<InstrumentDB>(&mut conn)
                .map_err(StorageError::from)?;
            result.extend(rows.into_iter().map(Instrument::from));
        }

        result.sort_by_key(|instrument| instrument.id);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use dragonshield_core::errors::{DatabaseError, Error};
    use tempfile::tempdir;

    async fn setup() -> (InstrumentRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        (InstrumentRepository::new(pool, writer), temp_dir)
    }

    fn new_instrument(name: &str, currency: &str, isin: Option<&str>) -> NewInstrument {
        NewInstrument {
            name: name.to_string(),
            currency: currency.to_string(),
            isin: isin.map(str::to_string),
            ticker_symbol: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let (repo, _dir) = setup().await;

        let created = repo
            .create(new_instrument(" Nestle ", "chf", Some("CH0038863350")))
            .await
            .unwrap();
        assert_eq!(created.name, "Nestle");
        assert_eq!(created.currency, "CHF");

        let loaded = repo.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(loaded, created);
        assert!(repo.get_by_id(created.id + 100).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_ids_ignores_unknown_ids() {
        let (repo, _dir) = setup().await;
        let a = repo.create(new_instrument("Apple", "USD", None)).await.unwrap();
        let b = repo.create(new_instrument("ASML", "EUR", None)).await.unwrap();

        let found = repo.list_by_ids(&[b.id, 999, a.id]).unwrap();
        let ids: Vec<i32> = found.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
        assert!(repo.list_by_ids(&[]).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_and_duplicate_isin() {
        let (repo, _dir) = setup().await;

        let invalid = repo.create(new_instrument("", "CHF", None)).await;
        assert!(matches!(invalid, Err(Error::Validation(_))));

        repo.create(new_instrument("Roche", "CHF", Some("CH0012032048")))
            .await
            .unwrap();
        let duplicate = repo
            .create(new_instrument("Roche GS", "CHF", Some("CH0012032048")))
            .await;
        assert!(matches!(
            duplicate,
            Err(Error::Database(DatabaseError::UniqueViolation(_)))
        ));
    }

    #[tokio::test]
    async fn test_set_active() {
        let (repo, _dir) = setup().await;
        let created = repo.create(new_instrument("UBS", "CHF", None)).await.unwrap();

        repo.set_active(created.id, false).await.unwrap();
        assert!(!repo.get_by_id(created.id).unwrap().unwrap().is_active);
        assert_eq!(repo.list_instruments().unwrap().len(), 1);

        let missing = repo.set_active(created.id + 1, false).await;
        assert!(matches!(missing, Err(Error::Database(DatabaseError::NotFound(_)))));
    }
}
