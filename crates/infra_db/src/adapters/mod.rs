//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::{DatabaseConfig, LazyPool, PostgresBillStore};
//! use domain_billing::BillStore;
//!
//! let pool = Arc::new(LazyPool::new(DatabaseConfig::new(url)));
//! let store: Arc<dyn BillStore> = Arc::new(PostgresBillStore::new(pool));
//! ```

pub mod bills;

pub use bills::PostgresBillStore;
