//! Repository layer: SQLite persistence plus per-entity identity caches.
//!
//! # Responsibility
//! - Define entity repository contracts and their SQLite implementations.
//! - Guarantee one in-memory instance per persisted row id (identity map).
//!
//! # Invariants
//! - An entity is cached if and only if it currently carries an id.
//! - Rows read back from SQLite pass the same validation as new entities.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod department_repo;
pub mod employee_repo;
pub mod identity_map;
mod row;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entity persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// Update/delete was called on an entity without an id.
    Unsaved { entity: &'static str },
    /// Save was called on an entity that already has an id.
    AlreadySaved { entity: &'static str, id: i64 },
    /// Update matched no row for a cached id.
    NotFound { entity: &'static str, id: i64 },
    /// A changed row could not refresh a cached instance the caller still borrows.
    Borrowed { entity: &'static str, id: i64 },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Unsaved { entity } => write!(f, "{entity} has not been saved"),
            Self::AlreadySaved { entity, id } => write!(f, "{entity} {id} is already saved"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Borrowed { entity, id } => {
                write!(f, "{entity} {id} is borrowed and cannot be refreshed")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Unsaved { .. }
            | Self::AlreadySaved { .. }
            | Self::NotFound { .. }
            | Self::Borrowed { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
