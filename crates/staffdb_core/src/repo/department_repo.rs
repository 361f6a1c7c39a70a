//! Department repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the `departments` table DDL and row CRUD.
//! - Keep the department identity map in sync with persisted rows.
//!
//! # Invariants
//! - Reading a cached row refreshes the cached instance in place, so callers
//!   holding a handle observe the stored values.
//! - `delete` evicts the handle and clears its id even if no row matched.

use crate::model::department::{Department, DepartmentId, DepartmentLookup, DepartmentRef};
use crate::model::employee::EmployeeRef;
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::identity_map::{refresh_in_place, IdentityMap};
use crate::repo::row::text_column;
use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::rc::Rc;

const ENTITY: &str = "department";

const DEPARTMENT_SELECT_SQL: &str = "SELECT id, name, location FROM departments";

/// Repository interface for department persistence.
pub trait DepartmentRepository: DepartmentLookup {
    fn create_table(&self) -> RepoResult<()>;
    fn drop_table(&self) -> RepoResult<()>;
    /// Validates, inserts and caches a new department.
    fn create(&mut self, name: &str, location: &str) -> RepoResult<DepartmentRef>;
    /// Inserts an unsaved department, assigning its id and caching it.
    fn save(&mut self, department: &DepartmentRef) -> RepoResult<DepartmentId>;
    /// Writes the current field values of a saved department.
    fn update(&self, department: &DepartmentRef) -> RepoResult<()>;
    /// Deletes the row, evicts the handle and clears its id.
    fn delete(&mut self, department: &DepartmentRef) -> RepoResult<()>;
    fn get_all(&mut self) -> RepoResult<Vec<DepartmentRef>>;
    fn find_by_id(&mut self, id: DepartmentId) -> RepoResult<Option<DepartmentRef>>;
    /// Returns the first stored department with exactly this name.
    fn find_by_name(&mut self, name: &str) -> RepoResult<Option<DepartmentRef>>;
    /// Loads employees whose `department_id` matches this department.
    fn employees<E>(
        &self,
        department: &DepartmentRef,
        employees: &mut E,
    ) -> RepoResult<Vec<EmployeeRef>>
    where
        E: EmployeeRepository;
    fn cached(&self, id: DepartmentId) -> Option<DepartmentRef>;
    fn cache_len(&self) -> usize;
    fn clear_cache(&mut self);
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
    cache: IdentityMap<Department>,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    /// Creates a repository with an empty identity map.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            cache: IdentityMap::new(),
        }
    }

    /// Maps one `departments` row to its cached instance.
    ///
    /// A cache hit is overwritten with the row values; a miss constructs and
    /// registers a new instance.
    pub fn instance_from_db(&mut self, row: &Row<'_>) -> RepoResult<DepartmentRef> {
        let id: DepartmentId = row.get("id")?;
        let fresh = Department::with_id(
            id,
            text_column(row, "name")?,
            text_column(row, "location")?,
        )?;

        if let Some(existing) = self.cache.get(id) {
            refresh_in_place(&existing, fresh, ENTITY, id)?;
            return Ok(existing);
        }

        let department = fresh.into_ref();
        self.cache.insert(id, Rc::clone(&department));
        Ok(department)
    }

    fn query_one(
        &mut self,
        sql: &str,
        param: impl rusqlite::ToSql,
    ) -> RepoResult<Option<DepartmentRef>> {
        let conn = self.conn;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([param])?;
        match rows.next()? {
            Some(row) => Ok(Some(self.instance_from_db(row)?)),
            None => Ok(None),
        }
    }
}

impl DepartmentLookup for SqliteDepartmentRepository<'_> {
    fn contains_department(&self, id: DepartmentId) -> bool {
        self.cache.contains(id)
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS departments (
                id INTEGER PRIMARY KEY,
                name TEXT,
                location TEXT
            );",
        )?;
        debug!("event=table_create module=repo status=ok table=departments");
        Ok(())
    }

    fn drop_table(&self) -> RepoResult<()> {
        self.conn.execute_batch("DROP TABLE IF EXISTS departments;")?;
        debug!("event=table_drop module=repo status=ok table=departments");
        Ok(())
    }

    fn create(&mut self, name: &str, location: &str) -> RepoResult<DepartmentRef> {
        let department = Department::new(name, location)?.into_ref();
        self.save(&department)?;
        Ok(department)
    }

    fn save(&mut self, department: &DepartmentRef) -> RepoResult<DepartmentId> {
        let id = {
            let current = department.borrow();
            if let Some(id) = current.id() {
                return Err(RepoError::AlreadySaved { entity: ENTITY, id });
            }
            self.conn.execute(
                "INSERT INTO departments (name, location) VALUES (?1, ?2);",
                params![current.name(), current.location()],
            )?;
            self.conn.last_insert_rowid()
        };

        department.borrow_mut().assign_id(id);
        self.cache.insert(id, Rc::clone(department));
        debug!("event=department_save module=repo status=ok id={id}");
        Ok(id)
    }

    fn update(&self, department: &DepartmentRef) -> RepoResult<()> {
        let current = department.borrow();
        let id = current.id().ok_or(RepoError::Unsaved { entity: ENTITY })?;

        let changed = self.conn.execute(
            "UPDATE departments SET name = ?1, location = ?2 WHERE id = ?3;",
            params![current.name(), current.location(), id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: ENTITY, id });
        }

        debug!("event=department_update module=repo status=ok id={id}");
        Ok(())
    }

    fn delete(&mut self, department: &DepartmentRef) -> RepoResult<()> {
        let id = department
            .borrow()
            .id()
            .ok_or(RepoError::Unsaved { entity: ENTITY })?;

        self.conn.execute("DELETE FROM departments WHERE id = ?1;", [id])?;
        self.cache.remove(id);
        department.borrow_mut().clear_id();

        debug!("event=department_delete module=repo status=ok id={id}");
        Ok(())
    }

    fn get_all(&mut self) -> RepoResult<Vec<DepartmentRef>> {
        let conn = self.conn;
        let mut stmt = conn.prepare(&format!("{DEPARTMENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut departments = Vec::new();

        while let Some(row) = rows.next()? {
            departments.push(self.instance_from_db(row)?);
        }

        Ok(departments)
    }

    fn find_by_id(&mut self, id: DepartmentId) -> RepoResult<Option<DepartmentRef>> {
        self.query_one(&format!("{DEPARTMENT_SELECT_SQL} WHERE id = ?1;"), id)
    }

    fn find_by_name(&mut self, name: &str) -> RepoResult<Option<DepartmentRef>> {
        self.query_one(
            &format!("{DEPARTMENT_SELECT_SQL} WHERE name = ?1 ORDER BY id ASC LIMIT 1;"),
            name,
        )
    }

    fn employees<E>(
        &self,
        department: &DepartmentRef,
        employees: &mut E,
    ) -> RepoResult<Vec<EmployeeRef>>
    where
        E: EmployeeRepository,
    {
        let id = department
            .borrow()
            .id()
            .ok_or(RepoError::Unsaved { entity: ENTITY })?;
        employees.find_by_department(self, id)
    }

    fn cached(&self, id: DepartmentId) -> Option<DepartmentRef> {
        self.cache.get(id)
    }

    fn cache_len(&self) -> usize {
        self.cache.len()
    }

    fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
