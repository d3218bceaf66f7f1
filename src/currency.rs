//! Currency reference data with transparent field encryption.
//!
//! Display names are encrypted before they reach the repository and decrypted
//! on the way out, so callers only ever see plaintext. Rows whose stored
//! value cannot be decrypted (data written before encryption was introduced)
//! are handed back with the raw stored value instead of failing the read.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::crypto::CryptoBox;
use crate::store::{CurrencyRepository, StoreError};

/// One row of the reference table. In memory the name is always plaintext;
/// at rest it is ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRecord {
    pub code: String,
    pub chinese_name: String,
}

pub struct CurrencyService {
    repository: Arc<dyn CurrencyRepository>,
    crypto: CryptoBox,
}

impl CurrencyService {
    pub fn new(repository: Arc<dyn CurrencyRepository>, crypto: CryptoBox) -> Self {
        Self { repository, crypto }
    }

    /// All currencies, ordered by ascending code, names decrypted.
    pub async fn list(&self) -> Result<Vec<CurrencyRecord>, StoreError> {
        let mut records = self.repository.list().await?;
        for record in &mut records {
            record.chinese_name = self.reveal(&record.code, &record.chinese_name);
        }
        Ok(records)
    }

    pub async fn get(&self, code: &str) -> Result<Option<CurrencyRecord>, StoreError> {
        let record = self.repository.get(code).await?.map(|mut record| {
            record.chinese_name = self.reveal(&record.code, &record.chinese_name);
            record
        });
        Ok(record)
    }

    /// Persists the name encrypted and returns the plaintext view the caller
    /// submitted. Fails with [`StoreError::Conflict`] on a duplicate code.
    pub async fn create(&self, code: &str, chinese_name: &str) -> Result<CurrencyRecord, StoreError> {
        self.repository
            .insert(CurrencyRecord {
                code: code.to_string(),
                chinese_name: self.crypto.encrypt(chinese_name),
            })
            .await?;

        Ok(CurrencyRecord {
            code: code.to_string(),
            chinese_name: chinese_name.to_string(),
        })
    }

    /// Re-encrypts the new name over the existing row. Fails with
    /// [`StoreError::NotFound`] when the code is absent.
    pub async fn update(&self, code: &str, chinese_name: &str) -> Result<(), StoreError> {
        self.repository
            .update(code, &self.crypto.encrypt(chinese_name))
            .await
    }

    pub async fn delete(&self, code: &str) -> Result<(), StoreError> {
        self.repository.delete(code).await
    }

    fn reveal(&self, code: &str, stored_name: &str) -> String {
        match self.crypto.decrypt(stored_name) {
            Ok(plaintext) => plaintext,
            Err(err) => {
                // Legacy pre-encryption rows land here; keep the stored text.
                warn!(code, %err, "stored name did not decrypt, returning raw value");
                stored_name.to_string()
            }
        }
    }
}
