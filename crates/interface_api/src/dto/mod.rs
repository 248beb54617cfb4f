//! Request and response bodies of the RPC surface

pub mod billing;
