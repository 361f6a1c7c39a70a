//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the `employees` table DDL and row CRUD.
//! - Keep the employee identity map in sync with persisted rows.
//!
//! # Invariants
//! - Every employee built from a row is validated against the department
//!   lookup passed in; rows pointing at uncached departments are rejected.
//! - `find_by_id` and `find_by_name` answer from the cache before querying.

use crate::model::department::{DepartmentId, DepartmentLookup};
use crate::model::employee::{Employee, EmployeeId, EmployeeRef};
use crate::repo::identity_map::{refresh_in_place, IdentityMap};
use crate::repo::row::{integer_column, text_column};
use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::rc::Rc;

const ENTITY: &str = "employee";

const EMPLOYEE_SELECT_SQL: &str = "SELECT id, name, job_title, department_id FROM employees";

/// Repository interface for employee persistence.
///
/// Methods that build employees take the department lookup used to check
/// `department_id`.
pub trait EmployeeRepository {
    fn create_table(&self) -> RepoResult<()>;
    fn drop_table(&self) -> RepoResult<()>;
    fn create<L>(
        &mut self,
        departments: &L,
        name: &str,
        job_title: &str,
        department_id: DepartmentId,
    ) -> RepoResult<EmployeeRef>
    where
        L: DepartmentLookup + ?Sized;
    fn save(&mut self, employee: &EmployeeRef) -> RepoResult<EmployeeId>;
    fn update(&self, employee: &EmployeeRef) -> RepoResult<()>;
    fn delete(&mut self, employee: &EmployeeRef) -> RepoResult<()>;
    fn get_all<L>(&mut self, departments: &L) -> RepoResult<Vec<EmployeeRef>>
    where
        L: DepartmentLookup + ?Sized;
    fn find_by_id<L>(
        &mut self,
        departments: &L,
        id: EmployeeId,
    ) -> RepoResult<Option<EmployeeRef>>
    where
        L: DepartmentLookup + ?Sized;
    /// Returns the first cached employee with this name, else the first row.
    fn find_by_name<L>(
        &mut self,
        departments: &L,
        name: &str,
    ) -> RepoResult<Option<EmployeeRef>>
    where
        L: DepartmentLookup + ?Sized;
    fn find_by_department<L>(
        &mut self,
        departments: &L,
        department_id: DepartmentId,
    ) -> RepoResult<Vec<EmployeeRef>>
    where
        L: DepartmentLookup + ?Sized;
    fn cached(&self, id: EmployeeId) -> Option<EmployeeRef>;
    fn cache_len(&self) -> usize;
    fn clear_cache(&mut self);
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
    cache: IdentityMap<Employee>,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            cache: IdentityMap::new(),
        }
    }

    /// Maps one `employees` row to its cached instance.
    ///
    /// The row is fully validated before the cache is touched. A cached
    /// instance is refreshed in place so existing handles stay live.
    pub fn instance_from_db<L>(
        &mut self,
        departments: &L,
        row: &Row<'_>,
    ) -> RepoResult<EmployeeRef>
    where
        L: DepartmentLookup + ?Sized,
    {
        let id: EmployeeId = row.get("id")?;
        let fresh = Employee::with_id(
            id,
            text_column(row, "name")?,
            text_column(row, "job_title")?,
            integer_column(row, "department_id")?,
            departments,
        )?;

        if let Some(existing) = self.cache.get(id) {
            refresh_in_place(&existing, fresh, ENTITY, id)?;
            return Ok(existing);
        }

        let employee = fresh.into_ref();
        self.cache.insert(id, Rc::clone(&employee));
        Ok(employee)
    }

    fn query_all<L>(
        &mut self,
        departments: &L,
        sql: &str,
        param: Option<i64>,
    ) -> RepoResult<Vec<EmployeeRef>>
    where
        L: DepartmentLookup + ?Sized,
    {
        let conn = self.conn;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = match param {
            Some(value) => stmt.query([value])?,
            None => stmt.query([])?,
        };
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(self.instance_from_db(departments, row)?);
        }

        Ok(employees)
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS employees (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                job_title TEXT NOT NULL,
                department_id INTEGER NOT NULL REFERENCES departments(id)
            );",
        )?;
        debug!("event=table_create module=repo status=ok table=employees");
        Ok(())
    }

    fn drop_table(&self) -> RepoResult<()> {
        self.conn.execute_batch("DROP TABLE IF EXISTS employees;")?;
        debug!("event=table_drop module=repo status=ok table=employees");
        Ok(())
    }

    fn create<L>(
        &mut self,
        departments: &L,
        name: &str,
        job_title: &str,
        department_id: DepartmentId,
    ) -> RepoResult<EmployeeRef>
    where
        L: DepartmentLookup + ?Sized,
    {
        let employee = Employee::new(name, job_title, department_id, departments)?.into_ref();
        self.save(&employee)?;
        Ok(employee)
    }

    fn save(&mut self, employee: &EmployeeRef) -> RepoResult<EmployeeId> {
        let id = {
            let current = employee.borrow();
            if let Some(id) = current.id() {
                return Err(RepoError::AlreadySaved { entity: ENTITY, id });
            }
            self.conn.execute(
                "INSERT INTO employees (name, job_title, department_id) VALUES (?1, ?2, ?3);",
                params![current.name(), current.job_title(), current.department_id()],
            )?;
            self.conn.last_insert_rowid()
        };

        employee.borrow_mut().assign_id(id);
        self.cache.insert(id, Rc::clone(employee));
        debug!("event=employee_save module=repo status=ok id={id}");
        Ok(id)
    }

    fn update(&self, employee: &EmployeeRef) -> RepoResult<()> {
        let current = employee.borrow();
        let id = current.id().ok_or(RepoError::Unsaved { entity: ENTITY })?;

        let changed = self.conn.execute(
            "UPDATE employees
             SET name = ?1, job_title = ?2, department_id = ?3
             WHERE id = ?4;",
            params![
                current.name(),
                current.job_title(),
                current.department_id(),
                id
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: ENTITY, id });
        }

        debug!("event=employee_update module=repo status=ok id={id}");
        Ok(())
    }

    fn delete(&mut self, employee: &EmployeeRef) -> RepoResult<()> {
        let id = employee
            .borrow()
            .id()
            .ok_or(RepoError::Unsaved { entity: ENTITY })?;

        self.conn.execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        self.cache.remove(id);
        employee.borrow_mut().clear_id();

        debug!("event=employee_delete module=repo status=ok id={id}");
        Ok(())
    }

    fn get_all<L>(&mut self, departments: &L) -> RepoResult<Vec<EmployeeRef>>
    where
        L: DepartmentLookup + ?Sized,
    {
        self.query_all(
            departments,
            &format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"),
            None,
        )
    }

    fn find_by_id<L>(
        &mut self,
        departments: &L,
        id: EmployeeId,
    ) -> RepoResult<Option<EmployeeRef>>
    where
        L: DepartmentLookup + ?Sized,
    {
        if let Some(cached) = self.cache.get(id) {
            return Ok(Some(cached));
        }

        let found = self.query_all(
            departments,
            &format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"),
            Some(id),
        )?;
        Ok(found.into_iter().next())
    }

    fn find_by_name<L>(
        &mut self,
        departments: &L,
        name: &str,
    ) -> RepoResult<Option<EmployeeRef>>
    where
        L: DepartmentLookup + ?Sized,
    {
        if let Some(cached) = self
            .cache
            .values()
            .find(|employee| {
                employee
                    .try_borrow()
                    .is_ok_and(|employee| employee.name() == name)
            })
        {
            return Ok(Some(Rc::clone(cached)));
        }

        let conn = self.conn;
        let mut stmt = conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL} WHERE name = ?1 ORDER BY id ASC LIMIT 1;"
        ))?;
        let mut rows = stmt.query([name])?;
        match rows.next()? {
            Some(row) => Ok(Some(self.instance_from_db(departments, row)?)),
            None => Ok(None),
        }
    }

    fn find_by_department<L>(
        &mut self,
        departments: &L,
        department_id: DepartmentId,
    ) -> RepoResult<Vec<EmployeeRef>>
    where
        L: DepartmentLookup + ?Sized,
    {
        self.query_all(
            departments,
            &format!("{EMPLOYEE_SELECT_SQL} WHERE department_id = ?1 ORDER BY id ASC;"),
            Some(department_id),
        )
    }

    fn cached(&self, id: EmployeeId) -> Option<EmployeeRef> {
        self.cache.get(id)
    }

    fn cache_len(&self) -> usize {
        self.cache.len()
    }

    fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
