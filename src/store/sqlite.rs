//! SQLite-backed client store
//!
//! The gateway owns its connection. It is opened lazily on first use, kept
//! behind a single mutex, and only ever lent to a closure for the duration of
//! one call. That mutex is the coarse lock serializing every store operation.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS clients (
//!     passport TEXT PRIMARY KEY,
//!     name TEXT NOT NULL,
//!     deposit TEXT NOT NULL,
//!     principal TEXT,
//!     client_type TEXT NOT NULL,
//!     bonus_type TEXT,
//!     bonus_value TEXT
//! )
//! ```

use crate::core::traits::{PersistenceGateway, StoredClient};
use crate::types::{BankError, ClientRecord};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS clients (
    passport TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    deposit TEXT NOT NULL,
    principal TEXT,
    client_type TEXT NOT NULL,
    bonus_type TEXT,
    bonus_value TEXT
)";

/// Where the database lives
#[derive(Debug, Clone, PartialEq)]
enum Location {
    File(PathBuf),
    Memory,
}

/// Client store on top of a SQLite database
#[derive(Debug)]
pub struct SqliteGateway {
    location: Location,
    connection: Mutex<Option<Connection>>,
}

impl SqliteGateway {
    /// Open (or create) a database file and make sure the schema exists
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, BankError> {
        let gateway = SqliteGateway {
            location: Location::File(path.to_path_buf()),
            connection: Mutex::new(None),
        };
        gateway.with_connection(|_| Ok(()))?;
        Ok(gateway)
    }

    /// Open a private in-memory database
    ///
    /// Its content lives as long as the connection; `close` discards it.
    pub fn open_in_memory() -> Result<Self, BankError> {
        let gateway = SqliteGateway {
            location: Location::Memory,
            connection: Mutex::new(None),
        };
        gateway.with_connection(|_| Ok(()))?;
        Ok(gateway)
    }

    /// Release the connection; the next call reopens it
    pub fn close(&self) -> Result<(), BankError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| BankError::persistence("connection lock poisoned"))?;
        if let Some(connection) = guard.take() {
            connection
                .close()
                .map_err(|(_, e)| BankError::from(e))?;
        }
        Ok(())
    }

    fn connect(&self) -> Result<Connection, BankError> {
        let connection = match &self.location {
            Location::File(path) => {
                debug!(path = %path.display(), "opening client database");
                Connection::open(path)?
            }
            Location::Memory => Connection::open_in_memory()?,
        };
        connection.execute(CREATE_TABLE_SQL, [])?;
        Ok(connection)
    }

    /// Run `f` with the connection held under the gateway lock
    fn with_connection<T, F>(&self, f: F) -> Result<T, BankError>
    where
        F: FnOnce(&Connection) -> Result<T, BankError>,
    {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| BankError::persistence("connection lock poisoned"))?;

        if guard.is_none() {
            *guard = Some(self.connect()?);
        }

        match guard.as_ref() {
            Some(connection) => f(connection),
            None => Err(BankError::persistence("connection unavailable")),
        }
    }
}

impl PersistenceGateway for SqliteGateway {
    fn save(&self, record: &ClientRecord) -> Result<(), BankError> {
        let row = StoredClient::from_record(record);
        self.with_connection(|conn| {
            let result = conn.execute(
                "INSERT INTO clients (passport, name, deposit, principal, client_type, bonus_type, bonus_value) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    row.passport,
                    row.name,
                    row.deposit,
                    row.principal,
                    row.category_label,
                    row.bonus_kind,
                    row.bonus_value
                ],
            );

            match result {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    Err(BankError::duplicate_passport(&row.passport))
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    fn update(&self, record: &ClientRecord) -> Result<(), BankError> {
        let row = StoredClient::from_record(record);
        self.with_connection(|conn| {
            let changed = conn.execute(
                "UPDATE clients SET name = ?1, deposit = ?2, principal = ?3, client_type = ?4, \
                 bonus_type = ?5, bonus_value = ?6 WHERE passport = ?7",
                params![
                    row.name,
                    row.deposit,
                    row.principal,
                    row.category_label,
                    row.bonus_kind,
                    row.bonus_value,
                    row.passport
                ],
            )?;

            if changed == 0 {
                return Err(BankError::client_not_found(&row.passport));
            }
            Ok(())
        })
    }

    fn delete(&self, passport: &str) -> Result<(), BankError> {
        self.with_connection(|conn| {
            conn.execute("DELETE FROM clients WHERE passport = ?1", params![passport])?;
            Ok(())
        })
    }

    fn exists(&self, passport: &str) -> Result<bool, BankError> {
        self.with_connection(|conn| {
            let found = conn
                .query_row(
                    "SELECT 1 FROM clients WHERE passport = ?1",
                    params![passport],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    fn list_all(&self) -> Result<Vec<ClientRecord>, BankError> {
        let rows = self.with_connection(|conn| {
            let mut statement = conn.prepare(
                "SELECT passport, name, deposit, principal, client_type, bonus_type, bonus_value \
                 FROM clients ORDER BY rowid",
            )?;
            let rows = statement
                .query_map([], |row| {
                    Ok(StoredClient {
                        passport: row.get(0)?,
                        name: row.get(1)?,
                        deposit: row.get(2)?,
                        principal: row.get(3)?,
                        category_label: row.get(4)?,
                        bonus_kind: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                        bonus_value: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        debug!(count = rows.len(), "loaded clients from database");
        rows.into_iter().map(StoredClient::into_record).collect()
    }
}
