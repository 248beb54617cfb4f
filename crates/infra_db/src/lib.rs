//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL infrastructure for the billing
//! service using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: [`repositories::BillRepository`]
//! owns the SQL, and [`adapters::PostgresBillStore`] implements the domain's
//! `BillStore` port on top of it, translating rows and errors.
//!
//! The connection pool is reached through [`LazyPool`], a process-wide
//! handle that connects (and applies the schema) on first use only.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::{DatabaseConfig, LazyPool, PostgresBillStore};
//!
//! let pool = Arc::new(LazyPool::new(DatabaseConfig::new("postgres://localhost/billing")));
//! let store = PostgresBillStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod schema;
pub mod repositories;
pub mod adapters;
pub mod seed;

pub use pool::{DatabasePool, DatabaseConfig, LazyPool, create_pool};
pub use error::DatabaseError;
pub use adapters::PostgresBillStore;
pub use repositories::BillRepository;
