//! Department entity model.
//!
//! # Responsibility
//! - Hold one department row in memory with validated fields.
//! - Expose the lookup contract employees validate against.
//!
//! # Invariants
//! - `name` and `location` are never blank.
//! - `id` is assigned and cleared only by the department repository.

use crate::model::validation::{require_text, ValidationError};
use serde::Serialize;
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Row identifier assigned by SQLite on insert.
pub type DepartmentId = i64;

/// Shared handle to the single in-memory instance of a department.
pub type DepartmentRef = Rc<RefCell<Department>>;

/// Answers whether a department id is known to the current process.
///
/// Employee validation goes through this trait so the employee model does not
/// need to know where departments are cached.
pub trait DepartmentLookup {
    fn contains_department(&self, id: DepartmentId) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Department {
    id: Option<DepartmentId>,
    name: String,
    location: String,
}

impl Department {
    /// Creates an unsaved department.
    ///
    /// # Errors
    /// - `ValidationError::Blank` when `name` or `location` is blank.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: None,
            name: require_text("name", name)?,
            location: require_text("location", location)?,
        })
    }

    pub(crate) fn with_id(
        id: DepartmentId,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let mut department = Self::new(name, location)?;
        department.id = Some(id);
        Ok(department)
    }

    pub fn id(&self) -> Option<DepartmentId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns whether this department has been persisted.
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// Replaces the name. The old value is kept when validation fails.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        self.name = require_text("name", name)?;
        Ok(())
    }

    /// Replaces the location. The old value is kept when validation fails.
    pub fn set_location(&mut self, location: impl Into<String>) -> Result<(), ValidationError> {
        self.location = require_text("location", location)?;
        Ok(())
    }

    /// Wraps this value into a shareable handle for repository calls.
    pub fn into_ref(self) -> DepartmentRef {
        Rc::new(RefCell::new(self))
    }

    pub(crate) fn assign_id(&mut self, id: DepartmentId) {
        self.id = Some(id);
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "Department {id}: {}, {}", self.name, self.location),
            None => write!(f, "Department new: {}, {}", self.name, self.location),
        }
    }
}
