//! Identity map keyed by row id.

use crate::model::department::{Department, DepartmentId, DepartmentLookup};
use crate::repo::{RepoError, RepoResult};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Cache holding the single live handle for each persisted row.
///
/// Iteration is in ascending id order, which is also insertion order for
/// SQLite rowids assigned by this process.
#[derive(Debug)]
pub struct IdentityMap<T> {
    entries: BTreeMap<i64, Rc<RefCell<T>>>,
}

impl<T> Default for IdentityMap<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> IdentityMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new handle to the cached instance, if any.
    pub fn get(&self, id: i64) -> Option<Rc<RefCell<T>>> {
        self.entries.get(&id).map(Rc::clone)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entries.contains_key(&id)
    }

    /// Registers `entity` under `id`, returning the handle it replaced.
    pub fn insert(&mut self, id: i64, entity: Rc<RefCell<T>>) -> Option<Rc<RefCell<T>>> {
        self.entries.insert(id, entity)
    }

    pub fn remove(&mut self, id: i64) -> Option<Rc<RefCell<T>>> {
        self.entries.remove(&id)
    }

    pub fn values(&self) -> impl Iterator<Item = &Rc<RefCell<T>>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Overwrites the cached instance behind `handle` with `fresh`.
///
/// While a caller still borrows the instance, an unchanged row is accepted
/// as is and a changed row fails with `RepoError::Borrowed`.
pub(crate) fn refresh_in_place<T: PartialEq>(
    handle: &Rc<RefCell<T>>,
    fresh: T,
    entity: &'static str,
    id: i64,
) -> RepoResult<()> {
    match handle.try_borrow_mut() {
        Ok(mut cached) => {
            *cached = fresh;
            Ok(())
        }
        Err(_) if handle.try_borrow().is_ok_and(|cached| *cached == fresh) => Ok(()),
        Err(_) => Err(RepoError::Borrowed { entity, id }),
    }
}

impl DepartmentLookup for IdentityMap<Department> {
    fn contains_department(&self, id: DepartmentId) -> bool {
        self.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::{refresh_in_place, IdentityMap};
    use crate::model::department::{Department, DepartmentLookup};
    use crate::repo::RepoError;

    #[test]
    fn insert_replaces_and_returns_previous_handle() {
        let mut map = IdentityMap::new();
        let first = Department::new("Payroll", "Floor 1").unwrap().into_ref();
        let second = Department::new("Payroll", "Floor 2").unwrap().into_ref();

        assert!(map.insert(7, first.clone()).is_none());
        let replaced = map.insert(7, second.clone()).unwrap();

        assert!(std::rc::Rc::ptr_eq(&replaced, &first));
        assert!(std::rc::Rc::ptr_eq(&map.get(7).unwrap(), &second));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn values_iterate_in_ascending_id_order() {
        let mut map = IdentityMap::new();
        for (id, name) in [(3, "c"), (1, "a"), (2, "b")] {
            map.insert(id, Department::new(name, "x").unwrap().into_ref());
        }

        let names: Vec<String> = map
            .values()
            .map(|dept| dept.borrow().name().to_string())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn department_lookup_follows_cache_contents() {
        let mut map = IdentityMap::new();
        map.insert(1, Department::new("Ops", "HQ").unwrap().into_ref());

        assert!(map.contains_department(1));
        assert!(!map.contains_department(2));

        map.remove(1);
        assert!(!map.contains_department(1));
        assert!(map.is_empty());
    }

    #[test]
    fn refresh_in_place_overwrites_the_shared_instance() {
        let handle = Department::new("Payroll", "Floor 1").unwrap().into_ref();
        let other = handle.clone();

        let fresh = Department::new("Payroll", "Floor 2").unwrap();
        refresh_in_place(&handle, fresh, "department", 1).unwrap();

        assert_eq!(other.borrow().location(), "Floor 2");
    }

    #[test]
    fn refresh_in_place_while_borrowed_accepts_equal_rows_and_rejects_changes() {
        let handle = Department::new("Payroll", "Floor 1").unwrap().into_ref();
        let held = handle.borrow();

        let same = Department::new("Payroll", "Floor 1").unwrap();
        refresh_in_place(&handle, same, "department", 1).unwrap();

        let changed = Department::new("Payroll", "Floor 2").unwrap();
        let err = refresh_in_place(&handle, changed, "department", 1).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Borrowed {
                entity: "department",
                id: 1
            }
        ));
        assert_eq!(held.location(), "Floor 1");
    }
}
