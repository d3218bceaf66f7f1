use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{CurrencyRepository, StoreError};
use crate::currency::CurrencyRecord;

/// In-memory repository over a `BTreeMap`, which keeps rows ordered by code.
/// Backs tests and ephemeral runs; nothing survives the process.
pub struct MemoryRepository {
    rows: RwLock<BTreeMap<String, String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CurrencyRepository for MemoryRepository {
    async fn list(&self) -> Result<Vec<CurrencyRecord>, StoreError> {
        let rows = self.rows.read().unwrap();
        Ok(rows
            .iter()
            .map(|(code, stored_name)| CurrencyRecord {
                code: code.clone(),
                chinese_name: stored_name.clone(),
            })
            .collect())
    }

    async fn get(&self, code: &str) -> Result<Option<CurrencyRecord>, StoreError> {
        let rows = self.rows.read().unwrap();
        Ok(rows.get(code).map(|stored_name| CurrencyRecord {
            code: code.to_string(),
            chinese_name: stored_name.clone(),
        }))
    }

    async fn insert(&self, record: CurrencyRecord) -> Result<(), StoreError> {
        let mut rows = self.rows.write().unwrap();
        if rows.contains_key(&record.code) {
            return Err(StoreError::Conflict(record.code));
        }
        rows.insert(record.code, record.chinese_name);
        Ok(())
    }

    async fn update(&self, code: &str, stored_name: &str) -> Result<(), StoreError> {
        let mut rows = self.rows.write().unwrap();
        match rows.get_mut(code) {
            Some(row) => {
                *row = stored_name.to_string();
                Ok(())
            }
            None => Err(StoreError::NotFound(code.to_string())),
        }
    }

    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        let mut rows = self.rows.write().unwrap();
        match rows.remove(code) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(code.to_string())),
        }
    }
}
