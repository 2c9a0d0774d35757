//! Deploy Gate
//!
//! Verifies a remote HTTP service is reachable, fast enough, correctly
//! shaped, and enforcing authentication, then reports a single pass/fail
//! outcome for CI to gate on.
//!
//! # Design Principles
//! - Fail fast: configuration invariants are checked before any network activity
//! - Deterministic: the assertion pipeline is a pure function of its inputs
//! - Bounded: every probe terminates within the configured deadline

pub mod config;
pub mod engine;
pub mod probe;
pub mod report;

// Re-export contracts
#[path = "../contracts/mod.rs"]
pub mod contracts;

pub use contracts::*;
