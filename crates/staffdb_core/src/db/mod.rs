//! SQLite connection bootstrap for the staff store.
//!
//! # Responsibility
//! - Open and configure SQLite connections for staffdb core.
//! - Wrap driver failures in a crate-level error type.
//!
//! # Invariants
//! - Schema is owned by the entity repositories (`create_table`/`drop_table`);
//!   opening a connection never creates or alters tables.
//! - `foreign_keys` stays off: department references are checked in memory.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

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
