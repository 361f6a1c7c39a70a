//! Entity models for the staff directory.
//!
//! # Responsibility
//! - Define the persisted record shapes and their field validation.
//! - Keep every mutation of a validated field behind a fallible setter.
//!
//! # Invariants
//! - A model value never holds a blank `name`, `location` or `job_title`.
//! - `id` is `None` until the owning repository assigns one on save.

pub mod department;
pub mod employee;
pub mod validation;
