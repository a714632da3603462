//! Timeout helpers used across the crate.

use std::time::Duration;

use crate::constants::DEFAULT_PROCESS_TIMEOUT_MS;

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Default bounded wait of a `process()` call as Duration.
pub fn default_process_timeout() -> Duration {
    ms(DEFAULT_PROCESS_TIMEOUT_MS)
}
