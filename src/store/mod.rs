//! Storage collaborators for the currency reference table.
//!
//! Repositories deal in stored rows only: the `chinese_name` they hold is
//! whatever text the caller persisted (ciphertext in production). Encryption
//! lives one layer up, in [`crate::currency::CurrencyService`].

pub mod disk;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::currency::CurrencyRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("currency '{0}' was not found")]
    NotFound(String),
    #[error("currency '{0}' already exists")]
    Conflict(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// CRUD contract over the `Currency(code, chineseName)` table.
#[async_trait]
pub trait CurrencyRepository: Send + Sync {
    /// All rows, ordered by ascending code.
    async fn list(&self) -> Result<Vec<CurrencyRecord>, StoreError>;

    async fn get(&self, code: &str) -> Result<Option<CurrencyRecord>, StoreError>;

    /// Fails with [`StoreError::Conflict`] when the code is already present.
    async fn insert(&self, record: CurrencyRecord) -> Result<(), StoreError>;

    /// Overwrites the stored name. Fails with [`StoreError::NotFound`] when
    /// the code is absent.
    async fn update(&self, code: &str, stored_name: &str) -> Result<(), StoreError>;

    /// Fails with [`StoreError::NotFound`] when the code is absent.
    async fn delete(&self, code: &str) -> Result<(), StoreError>;
}
