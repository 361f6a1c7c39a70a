//! Field validation shared by entity models.

use crate::model::department::DepartmentId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Violated field constraint reported by model constructors and setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Stored value is not text (NULL or a non-text SQLite value).
    NotText { field: &'static str },
    /// Value is empty or whitespace-only.
    Blank { field: &'static str },
    /// Stored value is not an integer.
    NotInteger { field: &'static str },
    /// No department with this id is cached in the current process.
    UnknownDepartment(DepartmentId),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotText { field } => write!(f, "{field} must be a string"),
            Self::Blank { field } => write!(f, "{field} must not be empty"),
            Self::NotInteger { field } => write!(f, "{field} must be an integer"),
            Self::UnknownDepartment(id) => write!(
                f,
                "department_id {id} does not reference a saved department"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Returns `value` with surrounding whitespace stripped.
///
/// Rejects values that are empty after trimming.
pub fn require_text(
    field: &'static str,
    value: impl Into<String>,
) -> Result<String, ValidationError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{require_text, ValidationError};

    #[test]
    fn require_text_rejects_whitespace_only() {
        assert_eq!(
            require_text("name", " \t\n").unwrap_err(),
            ValidationError::Blank { field: "name" }
        );
        assert_eq!(
            require_text("location", "").unwrap_err(),
            ValidationError::Blank { field: "location" }
        );
    }

    #[test]
    fn require_text_strips_surrounding_whitespace() {
        assert_eq!(require_text("name", "  Payroll ").unwrap(), "Payroll");
        assert_eq!(require_text("name", "Human Resources").unwrap(), "Human Resources");
    }

    #[test]
    fn messages_name_the_violated_constraint() {
        assert_eq!(
            ValidationError::NotText { field: "name" }.to_string(),
            "name must be a string"
        );
        assert_eq!(
            ValidationError::NotInteger {
                field: "department_id"
            }
            .to_string(),
            "department_id must be an integer"
        );
        assert_eq!(
            ValidationError::UnknownDepartment(42).to_string(),
            "department_id 42 does not reference a saved department"
        );
    }
}
