//! Core Kernel - Foundational types shared by every billing crate
//!
//! This crate provides the building blocks used across the domain,
//! infrastructure, and interface layers:
//! - Strongly-typed identifiers for externally visible records
//! - Port contracts (error type, marker and health traits) for adapters
//! - The core error type used for parsing and validation

pub mod identifiers;
pub mod ports;
pub mod error;

pub use identifiers::{BillId, NotificationId};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
