use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info, warn};

use crate::config::DatabaseConfig;
use crate::models::{Customer, CustomerFields};

use super::customers::{delete_customer, fetch_customers, insert_customer, update_customer};
use super::error::surface_store_error;
use super::{CustomerStore, StoreError};

/// SQLite-backed store. Holds at most one connection, owned exclusively; when
/// the connection could not be made the store stays usable but disconnected.
pub struct SqliteStore {
    path: PathBuf,
    settings: DatabaseConfig,
    conn: Option<Connection>,
    connect_error: Option<String>,
}

impl SqliteStore {
    /// Build a store for `path` without touching the filesystem yet.
    pub fn new(path: impl Into<PathBuf>, settings: DatabaseConfig) -> Self {
        Self {
            path: path.into(),
            settings,
            conn: None,
            connect_error: None,
        }
    }

    /// Build and connect in one go. A failed connection is logged and kept as
    /// a diagnostic; the caller gets a disconnected store back.
    pub fn connected(path: impl Into<PathBuf>, settings: DatabaseConfig) -> Self {
        let mut store = Self::new(path, settings);
        if let Err(err) = store.connect() {
            warn!(target: "db", error = %surface_store_error(&err), "running without a database connection");
        }
        store
    }

    /// Private in-memory database with the schema in place.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let path = PathBuf::from(":memory:");
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Connect {
            path: path.clone(),
            source,
        })?;
        ensure_schema(&conn).map_err(|source| StoreError::Connect {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            settings: DatabaseConfig::default(),
            conn: Some(conn),
            connect_error: None,
        })
    }

    /// Open the configured database. No retry: one failure leaves the store
    /// disconnected until `connect` is called again.
    pub fn connect(&mut self) -> Result<(), StoreError> {
        if self.conn.is_some() {
            return Ok(());
        }

        match open_database(&self.path, &self.settings) {
            Ok(conn) => {
                info!(target: "db", path = %self.path.display(), "connected");
                self.conn = Some(conn);
                self.connect_error = None;
                Ok(())
            }
            Err(err) => {
                self.connect_error = Some(surface_store_error(&err));
                Err(err)
            }
        }
    }

    /// Reason the last `connect` failed, if it did.
    pub fn connect_error(&self) -> Option<&str> {
        self.connect_error.as_deref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Borrow the live connection, mainly for tooling and tests.
    pub fn connection(&self) -> Option<&Connection> {
        self.conn.as_ref()
    }

    fn live(&self) -> Result<&Connection, StoreError> {
        self.conn.as_ref().ok_or(StoreError::NotConnected)
    }
}

impl CustomerStore for SqliteStore {
    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn list(&self) -> Result<Vec<Customer>, StoreError> {
        match &self.conn {
            Some(conn) => {
                let customers = fetch_customers(conn)?;
                debug!(target: "db", rows = customers.len(), "fetched customers");
                Ok(customers)
            }
            None => Ok(Vec::new()),
        }
    }

    fn insert(&self, fields: &CustomerFields) -> Result<i64, StoreError> {
        let result = insert_customer(self.live()?, fields);
        match &result {
            Ok(id) => info!(target: "db", id, "customer added"),
            Err(err) => warn!(target: "db", error = %surface_store_error(err), "insert rolled back"),
        }
        result
    }

    fn update(&self, id: i64, fields: &CustomerFields) -> Result<(), StoreError> {
        let result = update_customer(self.live()?, id, fields);
        match &result {
            Ok(()) => info!(target: "db", id, "customer updated"),
            Err(err) => {
                warn!(target: "db", id, error = %surface_store_error(err), "update rolled back")
            }
        }
        result
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = delete_customer(self.live()?, id);
        match &result {
            Ok(()) => info!(target: "db", id, "customer deleted"),
            Err(err) => {
                warn!(target: "db", id, error = %surface_store_error(err), "delete rolled back")
            }
        }
        result
    }

    fn disconnect(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, err)) = conn.close() {
                warn!(target: "db", error = %err, "error while closing database");
            } else {
                info!(target: "db", "disconnected");
            }
        }
    }
}

impl Drop for SqliteStore {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Create the `customers` table if it does not exist yet. Timestamps default
/// to the server clock so the UI never supplies them.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS customers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            coid TEXT NOT NULL DEFAULT '',
            company_name TEXT NOT NULL DEFAULT '',
            short_name TEXT NOT NULL DEFAULT '',
            contact_person TEXT NOT NULL DEFAULT '',
            phone TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL DEFAULT '',
            address_line1 TEXT NOT NULL DEFAULT '',
            address_line2 TEXT NOT NULL DEFAULT '',
            city TEXT NOT NULL DEFAULT '',
            state TEXT NOT NULL DEFAULT '',
            postal_code TEXT NOT NULL DEFAULT '',
            country TEXT NOT NULL DEFAULT '',
            is_active INTEGER NOT NULL DEFAULT 1,
            date_created TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            date_updated TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;
    Ok(())
}

fn open_database(path: &Path, settings: &DatabaseConfig) -> Result<Connection, StoreError> {
    let connect_err = |source: rusqlite::Error| StoreError::Connect {
        path: path.to_path_buf(),
        source,
    };

    let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;

    if settings.create_schema {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!(target: "db", dir = %parent.display(), error = %err, "failed to create data directory");
            }
        }
        flags |= OpenFlags::SQLITE_OPEN_CREATE;
    }

    let conn = Connection::open_with_flags(path, flags).map_err(connect_err)?;
    conn.busy_timeout(Duration::from_millis(settings.busy_timeout_ms))
        .map_err(connect_err)?;

    if settings.create_schema {
        ensure_schema(&conn).map_err(connect_err)?;
    } else if !has_customers_table(&conn).map_err(connect_err)? {
        return Err(StoreError::MissingTable {
            path: path.to_path_buf(),
        });
    }

    Ok(conn)
}

fn has_customers_table(conn: &Connection) -> rusqlite::Result<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'customers'")?;
    let exists = stmt.exists([])?;
    Ok(exists)
}
