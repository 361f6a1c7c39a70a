//! Core use-case services.
//!
//! # Responsibility
//! - Compose the department and employee repositories into use-case APIs.
//! - Own the ordering rules between the two tables and caches.

pub mod staff_service;
