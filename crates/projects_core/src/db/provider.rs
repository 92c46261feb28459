//! Per-operation connection supply.
//!
//! # Responsibility
//! - Hand repositories a ready connection for exactly one logical operation.
//!
//! # Invariants
//! - The caller owns the returned connection; dropping it releases it on
//!   every exit path.
//! - Providers hold no open connection between calls.

use super::{open_db, DbResult};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Source of single-use database connections.
pub trait ConnectionProvider {
    /// Opens a bootstrapped connection for one unit of work.
    fn connect(&self) -> DbResult<Connection>;
}

/// Opens a new connection to a SQLite file on every call.
#[derive(Debug, Clone)]
pub struct SqliteConnectionProvider {
    path: PathBuf,
}

impl SqliteConnectionProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Database file this provider connects to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionProvider for SqliteConnectionProvider {
    fn connect(&self) -> DbResult<Connection> {
        open_db(&self.path)
    }
}
