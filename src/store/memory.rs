//! In-memory client store
//!
//! Keeps flattened rows in insertion order behind one mutex. Rows go through
//! the same `StoredClient` conversion as the SQLite store, so records read
//! back are rebuilt exactly as they would be from disk.

use crate::core::traits::{PersistenceGateway, StoredClient};
use crate::types::{BankError, ClientRecord};
use std::sync::{Mutex, MutexGuard};

/// Volatile client store
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    rows: Mutex<Vec<StoredClient>>,
}

impl InMemoryGateway {
    /// Create an empty store
    pub fn new() -> Self {
        InMemoryGateway {
            rows: Mutex::new(Vec::new()),
        }
    }

    /// Create a store pre-populated with records
    pub fn with_records(records: &[ClientRecord]) -> Self {
        InMemoryGateway {
            rows: Mutex::new(records.iter().map(StoredClient::from_record).collect()),
        }
    }

    fn rows(&self) -> Result<MutexGuard<'_, Vec<StoredClient>>, BankError> {
        self.rows
            .lock()
            .map_err(|_| BankError::persistence("store lock poisoned"))
    }
}

impl PersistenceGateway for InMemoryGateway {
    fn save(&self, record: &ClientRecord) -> Result<(), BankError> {
        let mut rows = self.rows()?;
        if rows.iter().any(|row| row.passport == record.passport()) {
            return Err(BankError::duplicate_passport(record.passport()));
        }
        rows.push(StoredClient::from_record(record));
        Ok(())
    }

    fn update(&self, record: &ClientRecord) -> Result<(), BankError> {
        let mut rows = self.rows()?;
        let row = rows
            .iter_mut()
            .find(|row| row.passport == record.passport())
            .ok_or_else(|| BankError::client_not_found(record.passport()))?;
        *row = StoredClient::from_record(record);
        Ok(())
    }

    fn delete(&self, passport: &str) -> Result<(), BankError> {
        self.rows()?.retain(|row| row.passport != passport);
        Ok(())
    }

    fn exists(&self, passport: &str) -> Result<bool, BankError> {
        Ok(self.rows()?.iter().any(|row| row.passport == passport))
    }

    fn list_all(&self) -> Result<Vec<ClientRecord>, BankError> {
        self.rows()?
            .iter()
            .cloned()
            .map(StoredClient::into_record)
            .collect()
    }
}
