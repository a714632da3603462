// tnep/src/config.rs

use std::time::Duration;

use crate::constants::{DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_MAX_RECORDS, DEFAULT_PROCESS_TIMEOUT_MS};
use crate::utils::ms;
use crate::{Error, Result};

/// Engine settings shared by the poller and tag roles.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Longest a single `process()` call blocks waiting for a signal
    pub process_timeout_ms: u64,
    /// Capacity of one encoded outbound message
    pub max_message_size: usize,
    /// Records one message may carry, both directions
    pub max_records: usize,
    /// Tag role: deselect after this long without a reader write while a
    /// service is selected. 0 disables the check.
    pub idle_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            process_timeout_ms: DEFAULT_PROCESS_TIMEOUT_MS,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            max_records: DEFAULT_MAX_RECORDS,
            idle_timeout_ms: 0,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    pub fn process_timeout(&self) -> Duration {
        ms(self.process_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.process_timeout_ms == 0 {
            return Err(Error::InvalidArgument("process timeout must be non-zero".into()));
        }
        if self.max_message_size == 0 || self.max_records == 0 {
            return Err(Error::InvalidArgument(
                "message size and record limits must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Helper to construct an EngineConfig with optional overrides.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_timeout(mut self, timeout: Duration) -> Self {
        self.config.process_timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn max_message_size(mut self, size: usize) -> Self {
        self.config.max_message_size = size;
        self
    }

    pub fn max_records(mut self, records: usize) -> Self {
        self.config.max_records = records;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    /// Consume the builder; rejects zero limits.
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
