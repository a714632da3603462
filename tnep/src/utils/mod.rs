//! Utilities for tnep: small, reusable helpers used across the crate.
//!
//! Hex helpers back the diagnostic buffer dumps; the timeout helpers keep
//! millisecond conversions in one place.

pub mod hex;
pub mod timeout;

pub use hex::*;
pub use timeout::*;
