//! Tenant-scoped identifiers and redacted secrets shared across the broker.

pub mod id;
pub mod secret;

pub use id::*;
pub use secret::*;
