//! Platform-facing descriptor: where the remote API lives and how paths resolve.

pub mod descriptor;

pub use descriptor::*;
