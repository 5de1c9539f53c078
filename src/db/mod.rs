//! Database layer
//!
//! SQLite persistence for the NEABI backend: connection pool, code-based
//! migrations and one repository per entity. Repositories are the only
//! place that speaks SQL; services coordinate them.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, DbPool};
