//! Client registry service
//!
//! This module provides the BankService that keeps the in-memory registry and
//! the persistence gateway in step.
//!
//! Every mutation is persisted first and applied to the registry only when the
//! store accepted it, so a storage failure leaves the registry unchanged.
//! There is no rollback in the other direction: a registry that later
//! rejects a change the store already took cannot happen, because uniqueness
//! is checked against both before anything is written.

use crate::core::registry::{ClientRegistry, RegistryStats, SortKey};
use crate::core::traits::PersistenceGateway;
use crate::core::validation::{validate_deposit, validate_name, validate_passport};
use crate::io::csv_format::write_tabular;
use crate::io::importer::{parse_text, ImportSummary};
use crate::io::text_format::write_structured;
use crate::types::{create_client, BankError, Category, ClientRecord};
use chrono::Local;
use rust_decimal::Decimal;
use std::io::Write;
use tracing::{debug, info, warn};

/// Raw field values for a new client, as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientInput {
    pub name: String,
    pub passport: String,
    pub category: String,
    pub amount: String,
}

/// Fields to change on an existing client; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientEdit {
    pub name: Option<String>,
    pub category: Option<String>,
    pub amount: Option<String>,
}

/// Registry synchronized with a persistence gateway
pub struct BankService<G: PersistenceGateway> {
    registry: ClientRegistry,
    gateway: G,
}

impl<G: PersistenceGateway> BankService<G> {
    /// Open the service and load every stored client
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if the store cannot be read, or
    /// `DuplicatePassport` if it holds two rows with one passport.
    pub fn open(gateway: G) -> Result<Self, BankError> {
        let mut service = BankService {
            registry: ClientRegistry::new(),
            gateway,
        };
        service.reload()?;
        Ok(service)
    }

    /// Replace the registry content with what the store holds
    pub fn reload(&mut self) -> Result<(), BankError> {
        let records = self.gateway.list_all()?;
        self.registry.reload(records)?;
        debug!(clients = self.registry.len(), "registry loaded from store");
        Ok(())
    }

    /// Validate raw input and add the resulting client
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a field that fails validation,
    /// `DuplicatePassport` if the passport is taken, or `PersistenceFailure`.
    pub fn add_client(&mut self, input: &ClientInput) -> Result<ClientRecord, BankError> {
        validate_name(&input.name)?;
        validate_passport(&input.passport)?;
        let category = Category::from_label(&input.category)?;
        let principal = validate_deposit(&input.amount)?;

        let record = create_client(category, &input.name, &input.passport, principal)?;
        self.add_record(record.clone())?;
        Ok(record)
    }

    /// Add an already built record
    ///
    /// Uniqueness is checked against the registry and the store before
    /// anything is written.
    pub fn add_record(&mut self, record: ClientRecord) -> Result<(), BankError> {
        if self.registry.contains(record.passport()) || self.gateway.exists(record.passport())? {
            return Err(BankError::duplicate_passport(record.passport()));
        }

        self.gateway.save(&record)?;
        info!(passport = record.passport(), category = %record.category(), "client added");
        self.registry.add(record)
    }

    /// Edit name, category or principal of an existing client
    ///
    /// The deposit is recomputed from the new (or current) principal with the
    /// strategy of the new (or current) category.
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound`, `InvalidArgument` for a field that fails
    /// validation, or `PersistenceFailure`.
    pub fn edit_client(
        &mut self,
        passport: &str,
        edit: &ClientEdit,
    ) -> Result<ClientRecord, BankError> {
        let current = self.client(passport)?;

        let name = match &edit.name {
            Some(name) => {
                validate_name(name)?;
                name.as_str()
            }
            None => current.name(),
        };
        let category = match &edit.category {
            Some(label) => Category::from_label(label)?,
            None => current.category(),
        };
        let principal = match &edit.amount {
            Some(amount) => validate_deposit(amount)?,
            None => current.principal(),
        };

        let record = current.edited(name, category, principal)?;
        self.store_replacement(record)
    }

    /// Move a client to another category, recomputing the bonus from the principal
    pub fn change_category(
        &mut self,
        passport: &str,
        category: Category,
    ) -> Result<ClientRecord, BankError> {
        let record = self.client(passport)?.with_category(category);
        self.store_replacement(record)
    }

    /// Delete a client
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` if no such client is registered, or
    /// `PersistenceFailure`.
    pub fn delete_client(&mut self, passport: &str) -> Result<ClientRecord, BankError> {
        if !self.registry.contains(passport) {
            return Err(BankError::client_not_found(passport));
        }

        self.gateway.delete(passport)?;
        info!(passport, "client deleted");
        self.registry
            .remove(passport)
            .ok_or_else(|| BankError::client_not_found(passport))
    }

    /// Import clients from free text or a tabular export
    ///
    /// Blocks are committed one by one: a rejected block is counted and
    /// skipped, clients committed before it stay committed.
    pub fn import_text(&mut self, text: &str) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for outcome in parse_text(text) {
            let committed = outcome.and_then(|candidate| {
                let block = candidate.block;
                candidate
                    .into_record()
                    .and_then(|record| self.add_record(record))
                    .map_err(|e| BankError::block_rejected(block, e.to_string()))
            });

            match committed {
                Ok(()) => summary.record_imported(),
                Err(e) => {
                    warn!(error = %e, "import block skipped");
                    summary.record_error(&e);
                }
            }
        }

        info!(
            imported = summary.imported_count,
            errors = summary.error_count,
            "import finished"
        );
        summary
    }

    /// Write the structured report, stamped with the current local time
    pub fn export_structured(&self, output: &mut dyn Write) -> Result<(), BankError> {
        write_structured(&self.registry.all(), Local::now().naive_local(), output)
    }

    /// Write the semicolon-separated export
    pub fn export_tabular(&self, output: &mut dyn Write) -> Result<(), BankError> {
        write_tabular(&self.registry.all(), output)
    }

    /// Reorder the registry in place
    pub fn sort(&mut self, key: SortKey) {
        self.registry.sort(key);
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn total_deposits(&self) -> Decimal {
        self.registry.total_deposits()
    }

    pub fn statistics(&self) -> RegistryStats {
        self.registry.statistics()
    }

    fn client(&self, passport: &str) -> Result<&ClientRecord, BankError> {
        self.registry
            .by_passport(passport)
            .ok_or_else(|| BankError::client_not_found(passport))
    }

    fn store_replacement(&mut self, record: ClientRecord) -> Result<ClientRecord, BankError> {
        self.gateway.update(&record)?;
        info!(passport = record.passport(), category = %record.category(), "client updated");
        self.registry.replace(record.passport(), record.clone())?;
        Ok(record)
    }
}
