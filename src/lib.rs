//! Bank Client Registry Library
//! # Overview
//!
//! This library keeps a registry of bank clients, each holding one deposit
//! whose bonus depends on the client category, synchronized with a local
//! SQLite store.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (ClientRecord, Category, BonusStrategy, BankError)
//! - [`core`] - Business logic components:
//!   - [`core::registry`] - Ordered, passport-indexed collection of clients
//!   - [`core::bank`] - Service keeping the registry and the store in step
//!   - [`core::validation`] - Field rules for user input
//!   - [`core::traits`] - Persistence contract
//! - [`store`] - SQLite and in-memory implementations of the contract
//! - [`io`] - Structured and tabular export, heuristic import
//! - [`cli`] - CLI arguments parsing and command dispatch
//! - [`config`] / [`logging`] - TOML configuration and tracing setup
//!
//! # Categories
//!
//! The category fixes the bonus applied when a deposit is recorded:
//!
//! - **Regular**: no bonus
//! - **Pensioner**: fixed bonus of 3000
//! - **VIP**: 10% of the principal
//!
//! The stored deposit is bonus-inclusive. The principal is kept as well, so a
//! category change recomputes the deposit instead of stacking bonuses.

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod logging;
pub mod store;
pub mod types;

pub use config::{BankConfig, ExportFormat};
pub use core::{BankService, ClientEdit, ClientInput, ClientRegistry, RegistryStats, SortKey};
pub use io::ImportSummary;
pub use store::{InMemoryGateway, SqliteGateway};
pub use types::{create_client, BankError, BonusStrategy, Category, ClientRecord, Passport};
