//! Core business logic module
//!
//! This module contains the client registry components:
//! - `traits` - Persistence contract and the stored record shape
//! - `registry` - In-memory ordered collection of clients
//! - `validation` - Rules for user-entered fields
//! - `bank` - Service coordinating the registry with a store

pub mod bank;
pub mod registry;
pub mod traits;
pub mod validation;

pub use bank::{BankService, ClientEdit, ClientInput};
pub use registry::{CategoryStats, ClientRegistry, RegistryStats, SortKey};
pub use traits::{PersistenceGateway, StoredClient};
