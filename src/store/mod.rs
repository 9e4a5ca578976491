//! Store module
//!
//! Implementations of the `PersistenceGateway` contract:
//! - `sqlite` - SQLite database file (the default store)
//! - `memory` - volatile store for tests and dry runs

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryGateway;
pub use sqlite::SqliteGateway;
