//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! billing service test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common bills
//! - `builders`: Builder pattern for bill construction
//! - `database`: PostgreSQL container management
//! - `assertions`: Assertion helpers for bill invariants
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
