//! Blue-green backend core: error taxonomy, API payloads, and the calculation.
//!
//! This crate defines the contracts shared by the HTTP backend and its tests.
//! It intentionally carries no transport or runtime dependencies so the
//! business rules can be exercised without a server.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `BackendError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod calc;
pub mod error;
pub mod model;

/// Shared result type.
pub use error::{BackendError, Result};
