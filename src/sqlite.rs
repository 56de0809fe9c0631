//! SQLite-backed key store.
//!
//! Tokens live in a `Keys` table with a primary-key column enforcing
//! uniqueness. The claim is a single conditional `UPDATE ... RETURNING`
//! statement, so it is atomic at the storage level even for callers that
//! reach the database through their own connections.

use std::sync::Mutex;
use std::time::Duration;

use rusqlite::{Connection, params};

use crate::config::{SqliteConfig, default_busy_timeout_ms};
use crate::error::{KeyPoolError, Result};
use crate::store::{KeyStore, TokenRecord};

/// Durable key store over a SQLite database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (creating if necessary) the database named by `config`.
    ///
    /// The configured busy timeout bounds how long any storage call may
    /// wait on a locked database; expiry surfaces as `StorageUnavailable`.
    pub fn open(config: &SqliteConfig) -> Result<Self> {
        let conn = Connection::open(&config.path).map_err(storage_err)?;
        Self::prepare(conn, config.busy_timeout())
    }

    /// Open a private in-memory database, mainly useful in tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        Self::prepare(conn, Duration::from_millis(default_busy_timeout_ms()))
    }

    fn prepare(conn: Connection, busy_timeout: Duration) -> Result<Self> {
        conn.busy_timeout(busy_timeout).map_err(storage_err)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS Keys (
                value TEXT PRIMARY KEY,
                used INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .map_err(storage_err)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl KeyStore for SqliteStore {
    fn insert(&self, value: &str) -> Result<()> {
        let conn = self.conn.lock().expect("sqlite store poisoned");
        match conn.execute("INSERT INTO Keys (value, used) VALUES (?1, 0)", params![value]) {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(KeyPoolError::DuplicateKey),
            Err(e) => Err(storage_err(e)),
        }
    }

    fn list(&self) -> Result<Vec<TokenRecord>> {
        let conn = self.conn.lock().expect("sqlite store poisoned");
        let mut stmt = conn
            .prepare("SELECT value, used FROM Keys")
            .map_err(storage_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(TokenRecord {
                    value: row.get(0)?,
                    used: row.get(1)?,
                })
            })
            .map_err(storage_err)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(storage_err)?);
        }
        Ok(records)
    }

    fn claim_unused(&self) -> Result<Option<String>> {
        let conn = self.conn.lock().expect("sqlite store poisoned");
        // One conditional update: select-and-flip cannot interleave with
        // another claim.
        let claimed = conn.query_row(
            r#"
            UPDATE Keys SET used = 1
            WHERE value = (SELECT value FROM Keys WHERE used = 0 LIMIT 1)
            RETURNING value
            "#,
            [],
            |row| row.get(0),
        );
        match claimed {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(storage_err(e)),
        }
    }

    fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().expect("sqlite store poisoned");
        conn.execute("DELETE FROM Keys", []).map_err(storage_err)?;
        Ok(())
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn storage_err(err: rusqlite::Error) -> KeyPoolError {
    KeyPoolError::StorageUnavailable(err.to_string())
}
