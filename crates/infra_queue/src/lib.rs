//! Notification Queue Infrastructure
//!
//! This crate provides the Redis implementation of the billing domain's
//! `BillNotifier` port. Each notification is serialized to JSON and pushed
//! onto every configured queue, so each downstream consumer owning a queue
//! receives its own copy.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_queue::{RedisBillNotifier, RedisNotifierConfig};
//! use domain_billing::BillNotifier;
//!
//! let config = RedisNotifierConfig::new("redis://localhost:6379");
//! let notifier: Arc<dyn BillNotifier> = Arc::new(RedisBillNotifier::new(config)?);
//! ```

pub mod config;
pub mod redis_notifier;

pub use config::{RedisNotifierConfig, DEFAULT_QUEUE};
pub use redis_notifier::{encode_notification, RedisBillNotifier};
