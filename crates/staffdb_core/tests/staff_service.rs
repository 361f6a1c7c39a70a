use rusqlite::Connection;
use staffdb_core::db::open_db_in_memory;
use staffdb_core::{
    DepartmentRepository, EmployeeRepository, LoadSummary, RepoError, SqliteDepartmentRepository,
    SqliteEmployeeRepository, StaffService, ValidationError,
};
use std::rc::Rc;

type SqliteStaffService<'conn> =
    StaffService<SqliteDepartmentRepository<'conn>, SqliteEmployeeRepository<'conn>>;

fn service(conn: &Connection) -> SqliteStaffService<'_> {
    StaffService::new(
        SqliteDepartmentRepository::new(conn),
        SqliteEmployeeRepository::new(conn),
    )
}

fn table_exists(conn: &Connection, name: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [name],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}

#[test]
fn ensure_schema_is_idempotent_and_drop_schema_clears_everything() {
    let conn = open_db_in_memory().unwrap();
    let mut staff = service(&conn);

    staff.ensure_schema().unwrap();
    staff.ensure_schema().unwrap();
    assert!(table_exists(&conn, "departments"));
    assert!(table_exists(&conn, "employees"));

    let department = staff.open_department("Payroll", "Building A").unwrap();
    let department_id = department.borrow().id().unwrap();
    staff.hire(department_id, "Amir", "Accountant").unwrap();

    staff.drop_schema().unwrap();
    assert!(!table_exists(&conn, "departments"));
    assert!(!table_exists(&conn, "employees"));
    assert_eq!(staff.departments().cache_len(), 0);
    assert_eq!(staff.employees().cache_len(), 0);
}

#[test]
fn load_all_warms_both_caches_from_a_fresh_process_view() {
    let conn = open_db_in_memory().unwrap();
    {
        let mut staff = service(&conn);
        staff.ensure_schema().unwrap();
        let payroll = staff.open_department("Payroll", "Building A").unwrap();
        let finance = staff.open_department("Finance", "Building B").unwrap();
        let payroll_id = payroll.borrow().id().unwrap();
        let finance_id = finance.borrow().id().unwrap();
        staff.hire(payroll_id, "Amir", "Accountant").unwrap();
        staff.hire(finance_id, "Bao", "Analyst").unwrap();
        staff.hire(finance_id, "Cleo", "Manager").unwrap();
    }

    let mut staff = service(&conn);
    let summary = staff.load_all().unwrap();

    assert_eq!(
        summary,
        LoadSummary {
            departments: 2,
            employees: 3
        }
    );
    assert_eq!(staff.departments().cache_len(), 2);
    assert_eq!(staff.employees().cache_len(), 3);
}

#[test]
fn load_all_reports_employees_of_deleted_departments() {
    let conn = open_db_in_memory().unwrap();
    let department_id = {
        let mut staff = service(&conn);
        staff.ensure_schema().unwrap();
        let department = staff.open_department("Payroll", "Building A").unwrap();
        let department_id = department.borrow().id().unwrap();
        staff.hire(department_id, "Amir", "Accountant").unwrap();
        staff.departments_mut().delete(&department).unwrap();
        department_id
    };

    let mut staff = service(&conn);
    let err = staff.load_all().unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::UnknownDepartment(id)) if id == department_id
    ));
}

#[test]
fn hire_into_unknown_department_fails() {
    let conn = open_db_in_memory().unwrap();
    let mut staff = service(&conn);
    staff.ensure_schema().unwrap();

    let err = staff.hire(7, "Amir", "Accountant").unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::UnknownDepartment(7))
    ));
}

#[test]
fn department_roster_lists_only_matching_employees() {
    let conn = open_db_in_memory().unwrap();
    let mut staff = service(&conn);
    staff.ensure_schema().unwrap();
    let payroll = staff.open_department("Payroll", "Building A").unwrap();
    let finance = staff.open_department("Finance", "Building B").unwrap();
    let payroll_id = payroll.borrow().id().unwrap();
    let finance_id = finance.borrow().id().unwrap();
    let amir = staff.hire(payroll_id, "Amir", "Accountant").unwrap();
    staff.hire(finance_id, "Bao", "Analyst").unwrap();

    let roster = staff.department_roster(payroll_id).unwrap().unwrap();

    assert!(Rc::ptr_eq(&roster.department, &payroll));
    assert_eq!(roster.employees.len(), 1);
    assert!(Rc::ptr_eq(&roster.employees[0], &amir));
    assert!(staff.department_roster(finance_id + 1).unwrap().is_none());
}

#[test]
fn roster_by_name_resolves_department_first() {
    let conn = open_db_in_memory().unwrap();
    let mut staff = service(&conn);
    staff.ensure_schema().unwrap();
    let finance = staff.open_department("Finance", "Building B").unwrap();
    let finance_id = finance.borrow().id().unwrap();
    staff.hire(finance_id, "Bao", "Analyst").unwrap();
    staff.hire(finance_id, "Cleo", "Manager").unwrap();

    let roster = staff.roster_by_name("Finance").unwrap().unwrap();
    let titles: Vec<String> = roster
        .employees
        .iter()
        .map(|employee| employee.borrow().job_title().to_string())
        .collect();

    assert_eq!(titles, ["Analyst", "Manager"]);
    assert!(staff.roster_by_name("Legal").unwrap().is_none());
}
