//! Oracle adapters for external language-model services.
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

/// Gemini `generateContent` oracle.
pub mod gemini;
/// Scripted oracle for tests and offline runs.
pub mod mock;

pub use gemini::GeminiOracle;
pub use mock::MockOracle;
