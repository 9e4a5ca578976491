//! Client registry module
//!
//! This module provides the `ClientRegistry` struct, the in-memory aggregate of
//! all client records.
//!
//! The ClientRegistry is responsible for:
//! - Keeping records in display order (insertion order until sorted)
//! - Enforcing passport uniqueness
//! - O(1) lookup by passport through an index map
//! - Stable in-place sorting by name, deposit or category
//! - Atomic wholesale reload from the store
//! - Per-category statistics

use crate::types::{BankError, Category, ClientRecord, Passport};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

/// Keys the registry can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Name, case-insensitive
    Name,
    /// Bonus-inclusive deposit, ascending
    Deposit,
    /// Category label, case-insensitive
    Category,
}

/// Figures for one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub category: Category,
    pub client_count: usize,
    /// Share of all clients in percent, one decimal
    pub share_percent: Decimal,
    pub total_deposits: Decimal,
    /// Zero when the category has no clients
    pub average_deposit: Decimal,
}

/// Summary of the whole registry
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryStats {
    pub client_count: usize,
    pub total_deposits: Decimal,
    /// Zero for an empty registry
    pub average_deposit: Decimal,
    /// One entry per category, in `Category::ALL` order
    pub by_category: Vec<CategoryStats>,
}

/// Ordered collection of client records keyed by unique passport
///
/// Not thread-safe: callers keep it confined to one owner.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    /// Records in display order
    clients: Vec<ClientRecord>,

    /// Passport to position in `clients`
    index: HashMap<Passport, usize>,
}

impl ClientRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        ClientRegistry {
            clients: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a record
    ///
    /// # Errors
    ///
    /// Returns `DuplicatePassport` if the passport is already present; the
    /// registry is left unchanged.
    pub fn add(&mut self, record: ClientRecord) -> Result<(), BankError> {
        if self.index.contains_key(record.passport()) {
            return Err(BankError::duplicate_passport(record.passport()));
        }

        self.index
            .insert(record.passport().to_string(), self.clients.len());
        self.clients.push(record);
        Ok(())
    }

    /// Remove the record with this passport
    ///
    /// Does nothing if the passport is absent.
    pub fn remove(&mut self, passport: &str) -> Option<ClientRecord> {
        let position = self.index.remove(passport)?;
        let removed = self.clients.remove(position);
        self.rebuild_index();
        Some(removed)
    }

    /// Replace the record with this passport, keeping its position
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` if the passport is absent, and `InvalidArgument`
    /// if the new record carries a different passport.
    pub fn replace(&mut self, passport: &str, record: ClientRecord) -> Result<(), BankError> {
        if record.passport() != passport {
            return Err(BankError::invalid_argument(format!(
                "passport is immutable: cannot replace {} with {}",
                passport,
                record.passport()
            )));
        }

        let position = *self
            .index
            .get(passport)
            .ok_or_else(|| BankError::client_not_found(passport))?;
        self.clients[position] = record;
        Ok(())
    }

    /// Look up a record by passport
    pub fn by_passport(&self, passport: &str) -> Option<&ClientRecord> {
        self.index
            .get(passport)
            .map(|&position| &self.clients[position])
    }

    /// Whether a record with this passport exists
    pub fn contains(&self, passport: &str) -> bool {
        self.index.contains_key(passport)
    }

    /// Snapshot of all records in display order
    pub fn all(&self) -> Vec<ClientRecord> {
        self.clients.clone()
    }

    /// Iterate over records in display order
    pub fn iter(&self) -> impl Iterator<Item = &ClientRecord> {
        self.clients.iter()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Sum of all bonus-inclusive deposits
    pub fn total_deposits(&self) -> Decimal {
        self.clients.iter().map(ClientRecord::deposit).sum()
    }

    /// Client counts, shares and deposit averages, overall and per category
    pub fn statistics(&self) -> RegistryStats {
        let client_count = self.clients.len();
        let total_deposits = self.total_deposits();

        let by_category = Category::ALL
            .iter()
            .map(|&category| {
                let deposits: Vec<Decimal> = self
                    .clients
                    .iter()
                    .filter(|client| client.category() == category)
                    .map(ClientRecord::deposit)
                    .collect();
                let count = deposits.len();
                let total: Decimal = deposits.iter().sum();

                CategoryStats {
                    category,
                    client_count: count,
                    share_percent: ratio(Decimal::from(count * 100), client_count, 1),
                    total_deposits: total,
                    average_deposit: ratio(total, count, 2),
                }
            })
            .collect();

        RegistryStats {
            client_count,
            total_deposits,
            average_deposit: ratio(total_deposits, client_count, 2),
            by_category,
        }
    }

    /// Sort by name, case-insensitive
    pub fn sort_by_name(&mut self) {
        self.clients
            .sort_by_cached_key(|client| client.name().to_lowercase());
        self.rebuild_index();
    }

    /// Sort by deposit, ascending
    pub fn sort_by_deposit(&mut self) {
        self.clients.sort_by_key(ClientRecord::deposit);
        self.rebuild_index();
    }

    /// Sort by category label, case-insensitive
    pub fn sort_by_category(&mut self) {
        self.clients
            .sort_by_cached_key(|client| client.category().label().to_lowercase());
        self.rebuild_index();
    }

    /// Sort by the given key
    ///
    /// All sorts are stable: records with equal keys keep their relative order.
    pub fn sort(&mut self, key: SortKey) {
        match key {
            SortKey::Name => self.sort_by_name(),
            SortKey::Deposit => self.sort_by_deposit(),
            SortKey::Category => self.sort_by_category(),
        }
    }

    /// Replace the whole content with the given records
    ///
    /// The new sequence is built aside and swapped in only when it is valid,
    /// so a failed reload leaves the registry untouched.
    ///
    /// # Errors
    ///
    /// Returns `DuplicatePassport` if the input repeats a passport.
    pub fn reload(&mut self, records: Vec<ClientRecord>) -> Result<(), BankError> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if index
                .insert(record.passport().to_string(), position)
                .is_some()
            {
                return Err(BankError::duplicate_passport(record.passport()));
            }
        }

        self.clients = records;
        self.index = index;
        Ok(())
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .clients
            .iter()
            .enumerate()
            .map(|(position, client)| (client.passport().to_string(), position))
            .collect();
    }
}

/// `amount / count` rounded half away from zero, zero when `count` is zero
fn ratio(amount: Decimal, count: usize, decimals: u32) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    (amount / Decimal::from(count))
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}
