//! Staff directory use-case service.
//!
//! # Responsibility
//! - Create and drop both tables in dependency order.
//! - Warm both identity maps so employee rows can be validated.
//! - Provide department roster reads.
//!
//! # Invariants
//! - Departments are always loaded before employees.
//! - Service APIs never bypass repository validation.

use crate::model::department::{DepartmentId, DepartmentRef};
use crate::model::employee::EmployeeRef;
use crate::repo::department_repo::DepartmentRepository;
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::RepoResult;
use log::info;

/// One department together with the employees assigned to it.
#[derive(Debug, Clone)]
pub struct DepartmentRoster {
    pub department: DepartmentRef,
    pub employees: Vec<EmployeeRef>,
}

/// Row counts returned by [`StaffService::load_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub departments: usize,
    pub employees: usize,
}

/// Use-case wrapper over a department and an employee repository.
pub struct StaffService<D, E>
where
    D: DepartmentRepository,
    E: EmployeeRepository,
{
    departments: D,
    employees: E,
}

impl<D, E> StaffService<D, E>
where
    D: DepartmentRepository,
    E: EmployeeRepository,
{
    pub fn new(departments: D, employees: E) -> Self {
        Self {
            departments,
            employees,
        }
    }

    pub fn departments(&self) -> &D {
        &self.departments
    }

    pub fn departments_mut(&mut self) -> &mut D {
        &mut self.departments
    }

    pub fn employees(&self) -> &E {
        &self.employees
    }

    pub fn employees_mut(&mut self) -> &mut E {
        &mut self.employees
    }

    /// Creates `departments` then `employees` if they do not exist.
    pub fn ensure_schema(&self) -> RepoResult<()> {
        self.departments.create_table()?;
        self.employees.create_table()?;
        Ok(())
    }

    /// Drops `employees` then `departments` and empties both caches.
    pub fn drop_schema(&mut self) -> RepoResult<()> {
        self.employees.drop_table()?;
        self.departments.drop_table()?;
        self.employees.clear_cache();
        self.departments.clear_cache();
        Ok(())
    }

    /// Loads every stored row into the identity maps.
    ///
    /// # Errors
    /// - Returns a validation error when a stored employee references a
    ///   department id with no stored row.
    pub fn load_all(&mut self) -> RepoResult<LoadSummary> {
        let (departments, employees) = self.directory()?;
        let summary = LoadSummary {
            departments: departments.len(),
            employees: employees.len(),
        };
        info!(
            "event=cache_load module=service status=ok departments={} employees={}",
            summary.departments, summary.employees
        );
        Ok(summary)
    }

    /// Returns every department and every employee, departments first.
    pub fn directory(&mut self) -> RepoResult<(Vec<DepartmentRef>, Vec<EmployeeRef>)> {
        let departments = self.departments.get_all()?;
        let employees = self.employees.get_all(&self.departments)?;
        Ok((departments, employees))
    }

    /// Creates a department and returns its handle.
    pub fn open_department(&mut self, name: &str, location: &str) -> RepoResult<DepartmentRef> {
        self.departments.create(name, location)
    }

    /// Creates an employee in an already cached department.
    pub fn hire(
        &mut self,
        department_id: DepartmentId,
        name: &str,
        job_title: &str,
    ) -> RepoResult<EmployeeRef> {
        self.employees.create(&self.departments, name, job_title, department_id)
    }

    /// Returns the department with `id` and its employees, if it exists.
    pub fn department_roster(&mut self, id: DepartmentId) -> RepoResult<Option<DepartmentRoster>> {
        match self.departments.find_by_id(id)? {
            Some(department) => self.roster_for(department).map(Some),
            None => Ok(None),
        }
    }

    /// Same as [`Self::department_roster`], resolving the department by name.
    pub fn roster_by_name(&mut self, name: &str) -> RepoResult<Option<DepartmentRoster>> {
        match self.departments.find_by_name(name)? {
            Some(department) => self.roster_for(department).map(Some),
            None => Ok(None),
        }
    }

    fn roster_for(&mut self, department: DepartmentRef) -> RepoResult<DepartmentRoster> {
        let employees = self
            .departments
            .employees(&department, &mut self.employees)?;
        Ok(DepartmentRoster {
            department,
            employees,
        })
    }
}
