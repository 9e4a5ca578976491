//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `bonus`: Deposit bonus strategies
//! - `client`: Client categories, records and the record factory
//! - `error`: Error types for the registry

pub mod bonus;
pub mod client;
pub mod error;

pub use bonus::BonusStrategy;
pub use client::{create_client, Category, ClientRecord, Passport};
pub use error::BankError;
