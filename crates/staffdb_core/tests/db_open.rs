use rusqlite::Connection;
use staffdb_core::db::{open_db, open_db_in_memory};
use staffdb_core::{DepartmentRepository, SqliteDepartmentRepository};

#[test]
fn open_db_in_memory_creates_no_tables() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(table_count(&conn), 0);
}

#[test]
fn connections_leave_foreign_keys_disabled() {
    let conn = open_db_in_memory().unwrap();

    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 0);
}

#[test]
fn file_database_keeps_rows_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staff.db");

    let id = {
        let conn = open_db(&path).unwrap();
        let mut repo = SqliteDepartmentRepository::new(&conn);
        repo.create_table().unwrap();
        let department = repo.create("Payroll", "Building A").unwrap();
        let id = department.borrow().id().unwrap();
        id
    };

    let conn = open_db(&path).unwrap();
    let mut repo = SqliteDepartmentRepository::new(&conn);
    assert_eq!(repo.cache_len(), 0);

    let reloaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(reloaded.borrow().name(), "Payroll");
    assert_eq!(repo.cache_len(), 1);
}

#[test]
fn open_db_fails_for_missing_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("staff.db");

    assert!(open_db(&path).is_err());
}

fn table_count(conn: &Connection) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table';",
        [],
        |row| row.get(0),
    )
    .unwrap()
}
