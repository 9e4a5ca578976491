//! Persistence contract
//!
//! This module defines the gateway trait the registry is synchronized with,
//! and the flat record shape stores keep on disk.

use crate::types::{BankError, Category, ClientRecord, Passport};
use rust_decimal::Decimal;
use tracing::warn;

/// Durable store of client records
///
/// Methods take `&self`: implementations own their connection and serialize
/// calls internally, so a `list_all` never observes a half-applied mutation.
pub trait PersistenceGateway {
    /// Insert a new record
    fn save(&self, record: &ClientRecord) -> Result<(), BankError>;

    /// Overwrite the record with the same passport
    fn update(&self, record: &ClientRecord) -> Result<(), BankError>;

    /// Delete the record with this passport, no-op if absent
    fn delete(&self, passport: &str) -> Result<(), BankError>;

    /// Whether a record with this passport is stored
    fn exists(&self, passport: &str) -> Result<bool, BankError>;

    /// All stored records in storage order
    fn list_all(&self) -> Result<Vec<ClientRecord>, BankError>;
}

/// Flat persistence shape of a client record
///
/// Amounts are kept as decimal text so they survive storage exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredClient {
    pub passport: Passport,
    pub name: String,
    /// Bonus-inclusive deposit
    pub deposit: String,
    /// Principal before bonus, absent in rows written without it
    pub principal: Option<String>,
    pub category_label: String,
    pub bonus_kind: String,
    pub bonus_value: String,
}

impl StoredClient {
    /// Flatten a record for storage
    pub fn from_record(record: &ClientRecord) -> Self {
        let strategy = record.strategy();
        StoredClient {
            passport: record.passport().to_string(),
            name: record.name().to_string(),
            deposit: record.deposit().to_string(),
            principal: Some(record.principal().to_string()),
            category_label: record.category().label().to_string(),
            bonus_kind: strategy.kind().to_string(),
            bonus_value: strategy.literal_value().to_string(),
        }
    }

    /// Rebuild the record
    ///
    /// The strategy is derived from the stored category label, never from the
    /// bonus columns; an unrecognized label loads as Regular. The stored
    /// deposit is taken as-is; when no principal was stored it is recovered by
    /// inverting the category bonus.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` for unreadable amounts.
    pub fn into_record(self) -> Result<ClientRecord, BankError> {
        let category = self.category();
        let deposit = parse_stored_amount(&self.passport, "deposit", &self.deposit)?;
        let principal = match &self.principal {
            Some(raw) => parse_stored_amount(&self.passport, "principal", raw)?,
            None => category
                .strategy()
                .principal_from_deposit(deposit)
                .unwrap_or(deposit),
        };

        Ok(ClientRecord::from_parts(
            category,
            self.name,
            self.passport,
            principal,
            deposit,
        ))
    }

    fn category(&self) -> Category {
        Category::from_label(&self.category_label)
            .ok()
            .or_else(|| Category::from_keyword(&self.category_label))
            .unwrap_or_else(|| {
                warn!(
                    passport = %self.passport,
                    label = %self.category_label,
                    "unknown stored category, loading as Regular"
                );
                Category::Regular
            })
    }
}

fn parse_stored_amount(passport: &str, column: &str, raw: &str) -> Result<Decimal, BankError> {
    raw.trim().parse::<Decimal>().map_err(|e| {
        BankError::persistence(format!(
            "client {}: unreadable {} '{}': {}",
            passport, column, raw, e
        ))
    })
}
