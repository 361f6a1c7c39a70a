//! Employee entity model.
//!
//! # Responsibility
//! - Hold one employee row in memory with validated fields.
//!
//! # Invariants
//! - `name` and `job_title` are never blank.
//! - `department_id` referenced a cached department when it was last set.
//!   Later department deletion is not tracked (no foreign-key enforcement).

use crate::model::department::{DepartmentId, DepartmentLookup};
use crate::model::validation::{require_text, ValidationError};
use serde::Serialize;
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Row identifier assigned by SQLite on insert.
pub type EmployeeId = i64;

/// Shared handle to the single in-memory instance of an employee.
pub type EmployeeRef = Rc<RefCell<Employee>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    id: Option<EmployeeId>,
    name: String,
    job_title: String,
    department_id: DepartmentId,
}

impl Employee {
    /// Creates an unsaved employee.
    ///
    /// # Errors
    /// - `ValidationError::Blank` when `name` or `job_title` is blank.
    /// - `ValidationError::UnknownDepartment` when `departments` does not
    ///   contain `department_id`.
    pub fn new<L>(
        name: impl Into<String>,
        job_title: impl Into<String>,
        department_id: DepartmentId,
        departments: &L,
    ) -> Result<Self, ValidationError>
    where
        L: DepartmentLookup + ?Sized,
    {
        Ok(Self {
            id: None,
            name: require_text("name", name)?,
            job_title: require_text("job_title", job_title)?,
            department_id: require_department(department_id, departments)?,
        })
    }

    pub(crate) fn with_id<L>(
        id: EmployeeId,
        name: impl Into<String>,
        job_title: impl Into<String>,
        department_id: DepartmentId,
        departments: &L,
    ) -> Result<Self, ValidationError>
    where
        L: DepartmentLookup + ?Sized,
    {
        let mut employee = Self::new(name, job_title, department_id, departments)?;
        employee.id = Some(id);
        Ok(employee)
    }

    pub fn id(&self) -> Option<EmployeeId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn department_id(&self) -> DepartmentId {
        self.department_id
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        self.name = require_text("name", name)?;
        Ok(())
    }

    pub fn set_job_title(&mut self, job_title: impl Into<String>) -> Result<(), ValidationError> {
        self.job_title = require_text("job_title", job_title)?;
        Ok(())
    }

    /// Moves the employee to another cached department.
    pub fn set_department_id<L>(
        &mut self,
        department_id: DepartmentId,
        departments: &L,
    ) -> Result<(), ValidationError>
    where
        L: DepartmentLookup + ?Sized,
    {
        self.department_id = require_department(department_id, departments)?;
        Ok(())
    }

    pub fn into_ref(self) -> EmployeeRef {
        Rc::new(RefCell::new(self))
    }

    pub(crate) fn assign_id(&mut self, id: EmployeeId) {
        self.id = Some(id);
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }
}

impl Display for Employee {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "Employee {id}: ")?,
            None => write!(f, "Employee new: ")?,
        }
        write!(
            f,
            "{}, {}, Department {}",
            self.name, self.job_title, self.department_id
        )
    }
}

fn require_department<L>(id: DepartmentId, departments: &L) -> Result<DepartmentId, ValidationError>
where
    L: DepartmentLookup + ?Sized,
{
    if departments.contains_department(id) {
        Ok(id)
    } else {
        Err(ValidationError::UnknownDepartment(id))
    }
}
