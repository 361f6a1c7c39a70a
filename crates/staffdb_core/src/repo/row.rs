//! Typed column reads that report bad stored values as validation errors.

use crate::model::validation::ValidationError;
use crate::repo::RepoResult;
use rusqlite::types::Value;
use rusqlite::Row;

pub(crate) fn text_column(row: &Row<'_>, field: &'static str) -> RepoResult<String> {
    match row.get::<_, Value>(field)? {
        Value::Text(text) => Ok(text),
        _ => Err(ValidationError::NotText { field }.into()),
    }
}

pub(crate) fn integer_column(row: &Row<'_>, field: &'static str) -> RepoResult<i64> {
    match row.get::<_, Value>(field)? {
        Value::Integer(value) => Ok(value),
        _ => Err(ValidationError::NotInteger { field }.into()),
    }
}
