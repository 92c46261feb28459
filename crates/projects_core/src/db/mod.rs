//! SQLite storage bootstrap and connection supply.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the projects store.
//! - Make sure the project schema exists before a connection is handed out.
//! - Supply one fresh connection per logical repository operation.
//!
//! # Invariants
//! - Every returned connection has `foreign_keys=ON`, so child rows cascade.
//! - Core code never touches project tables before the schema script ran.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
mod provider;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use provider::{ConnectionProvider, SqliteConnectionProvider};

pub type DbResult<T> = Result<T, DbError>;

/// Storage engine failure.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
