// tnep/src/lib.rs

//! tnep
//!
//! Tag NDEF Exchange Protocol engines: the reader/writer (poller) state
//! machine and its counterpart tag role, sharing one state model, signal
//! set, waiting-time timer and NDEF record codec.
#![warn(missing_docs)]

pub mod buffer;
pub mod config;
pub mod constants;
pub mod error;
pub mod poller;
pub mod prelude;
pub mod protocol;
pub mod service;
pub mod signal;
pub mod tag;
pub mod test_support;
pub mod timer;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
