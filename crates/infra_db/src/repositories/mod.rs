//! Repository implementations
//!
//! Repositories own the SQL. They speak in row types and `DatabaseError`;
//! mapping to domain types happens in the adapters.
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate builds
//! without a live database.

pub mod bills;

pub use bills::{BillRepository, BillRow, NewBillRow};
