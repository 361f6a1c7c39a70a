//! Core persistence layer for the staff directory.
//! Departments and employees with validated fields, SQLite CRUD and
//! per-entity identity maps.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::department::{Department, DepartmentId, DepartmentLookup, DepartmentRef};
pub use model::employee::{Employee, EmployeeId, EmployeeRef};
pub use model::validation::ValidationError;
pub use repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::identity_map::IdentityMap;
pub use repo::{RepoError, RepoResult};
pub use service::staff_service::{DepartmentRoster, LoadSummary, StaffService};

/// Minimal health-check API for smoke tests.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
