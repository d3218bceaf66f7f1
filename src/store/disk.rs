use anyhow::Result;
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

use super::{CurrencyRepository, StoreError};
use crate::currency::CurrencyRecord;

const PARTITION: &str = "currencies";

/// Persistent repository over a fjall partition. Keys are currency codes and
/// iterate in ascending byte order, which satisfies the sorted-list contract
/// without an explicit sort.
pub struct FjallRepository {
    keyspace: Keyspace,
    rows: PartitionHandle,
    // Mutations take this lock so check-then-write pairs are not interleaved;
    // a racing duplicate insert always observes the winner's row and loses
    // with a conflict.
    write_lock: Mutex<()>,
}

impl FjallRepository {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)?;
        let keyspace = Config::new(path).open()?;
        let rows = keyspace.open_partition(PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened currency store at {}", path.display());
        Ok(Self {
            keyspace,
            rows,
            write_lock: Mutex::new(()),
        })
    }

    fn commit(&self) -> Result<(), StoreError> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .map_err(|e| StoreError::Backend(e.into()))
    }
}

fn backend(err: fjall::Error) -> StoreError {
    StoreError::Backend(err.into())
}

#[async_trait]
impl CurrencyRepository for FjallRepository {
    async fn list(&self) -> Result<Vec<CurrencyRecord>, StoreError> {
        let mut records = Vec::new();
        for entry in self.rows.iter() {
            let (code, stored_name) = entry.map_err(backend)?;
            records.push(CurrencyRecord {
                code: String::from_utf8_lossy(&code).into_owned(),
                chinese_name: String::from_utf8_lossy(&stored_name).into_owned(),
            });
        }
        Ok(records)
    }

    async fn get(&self, code: &str) -> Result<Option<CurrencyRecord>, StoreError> {
        let stored_name = self.rows.get(code).map_err(backend)?;
        Ok(stored_name.map(|value| CurrencyRecord {
            code: code.to_string(),
            chinese_name: String::from_utf8_lossy(&value).into_owned(),
        }))
    }

    async fn insert(&self, record: CurrencyRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap();
        if self.rows.contains_key(&record.code).map_err(backend)? {
            return Err(StoreError::Conflict(record.code));
        }
        self.rows
            .insert(record.code.as_bytes(), record.chinese_name.as_bytes())
            .map_err(backend)?;
        self.commit()
    }

    async fn update(&self, code: &str, stored_name: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap();
        if !self.rows.contains_key(code).map_err(backend)? {
            return Err(StoreError::NotFound(code.to_string()));
        }
        self.rows
            .insert(code.as_bytes(), stored_name.as_bytes())
            .map_err(backend)?;
        self.commit()
    }

    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap();
        if !self.rows.contains_key(code).map_err(backend)? {
            return Err(StoreError::NotFound(code.to_string()));
        }
        self.rows.remove(code.as_bytes()).map_err(backend)?;
        self.commit()
    }
}
