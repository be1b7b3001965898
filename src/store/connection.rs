/*!
 * Store connection management.
 *
 * Opens the SQLite file, applies the schema and hands out guarded access to
 * the single connection.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::schema;
use crate::errors::StoreError;

/// Default store filename
const DEFAULT_STORE_FILENAME: &str = "textalign.db";

/// Default store directory name under the user's data directory
const DEFAULT_STORE_DIRNAME: &str = "textalign";

/// Store connection wrapper with thread-safe access
#[derive(Clone)]
pub struct StoreConnection {
    path: PathBuf,
    connection: Arc<Mutex<Connection>>,
}

impl StoreConnection {
    /// Open the store at the configured path, or at the default location
    pub fn open_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::open(path),
            None => Self::open(Self::default_store_path()?),
        }
    }

    /// Open (and create if needed) the store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory: {:?}", parent))?;
        }

        info!("Opening store at: {:?}", path);

        let conn = Connection::open(&path).with_context(|| format!("Failed to open store: {:?}", path))?;
        schema::initialize_schema(&conn)?;

        Ok(Self {
            path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        debug!("Creating in-memory store");

        let conn = Connection::open_in_memory().context("Failed to create in-memory store")?;
        schema::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Default store path under the user's data directory
    pub fn default_store_path() -> Result<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join(DEFAULT_STORE_DIRNAME).join(DEFAULT_STORE_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run an operation with the connection
    pub fn execute<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self
            .connection
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;

        f(&conn)
    }

    /// Run operations inside one transaction; any error rolls everything back
    pub fn transaction<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&rusqlite::Transaction) -> Result<T, StoreError>,
    {
        let mut conn = self
            .connection
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;

        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;

        Ok(result)
    }
}
