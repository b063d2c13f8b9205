//! Core types and traits for the Zia task orchestrator.
//!
//! This crate provides the task and result data model, the capability
//! enumeration, error handling, and the trait definitions implemented by
//! capability handlers and oracles.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        reason = "Allow for tests"
    )
)]

/// Error types and result definitions.
pub mod error;
/// Poison-tolerant lock helpers.
pub mod sync;
/// Trait definitions for handlers and oracles.
pub mod traits;
/// Core data types for tasks and results.
pub mod types;

pub use error::{Error, Result};
pub use sync::IgnoreLock;
pub use traits::{CapabilityHandler, Oracle, OracleResponse};
pub use types::{Capability, JsonMap, Task, TaskResult};
