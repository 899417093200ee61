//! Error taxonomy (spec §7).
//!
//! Only two of the five categories described in the spec surface as a Rust
//! `Error`: validation failures at the public entry point, and invariant
//! violations that abort a tick. Precondition failures, rolled-failure
//! resolutions, and bounded-collection overflow are all represented as
//! events, never as errors, by design.

use thiserror::Error;

/// Errors that can escape `run_simulation` or `tick_hour`.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("seed must be a valid integer, got {0}")]
    InvalidSeed(String),

    #[error("days must be non-negative, got {0}")]
    NegativeDays(i64),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("unknown site id referenced: {0}")]
    UnknownSite(String),

    #[error("unknown npc id referenced: {0}")]
    UnknownNpc(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type SimResult<T> = Result<T, SimError>;

/// Aborts the current tick with an invariant-violation error. Call sites are
/// resolvers and processes that discover a value outside its documented
/// range (negative food, an out-of-bounds percent, a dangling id) -- these
/// indicate a bug upstream and must not be silently clamped away.
pub fn invariant(condition: bool, message: impl Into<String>) -> SimResult<()> {
    if condition {
        Ok(())
    } else {
        Err(SimError::InvariantViolation(message.into()))
    }
}
