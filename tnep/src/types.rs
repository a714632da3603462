// tnep/src/types.rs

use std::convert::TryFrom;
use std::fmt;

use derive_more::{Display, From};

use crate::constants::{MAX_URI_LEN, TNEP_VERSION};
use crate::Error;

/// Service name URI - Newtype Pattern (at most 255 bytes, no terminator)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uri(Vec<u8>);

impl Uri {
    pub fn new(bytes: impl Into<Vec<u8>>) -> crate::Result<Self> {
        let bytes = bytes.into();
        if bytes.len() > MAX_URI_LEN {
            return Err(Error::InvalidArgument(format!(
                "service uri is {} bytes, max {}",
                bytes.len(),
                MAX_URI_LEN
            )));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<&[u8]> for Uri {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::new(bytes.to_vec())
    }
}

impl TryFrom<&str> for Uri {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s.as_bytes().to_vec())
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Communication mode advertised for a service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommunicationMode {
    SingleResponse,
    /// Reserved or service-specific mode byte
    Other(u8),
}

impl CommunicationMode {
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::SingleResponse => 0x00,
            Self::Other(b) => *b,
        }
    }
}

impl From<u8> for CommunicationMode {
    fn from(b: u8) -> Self {
        match b {
            0x00 => Self::SingleResponse,
            other => Self::Other(other),
        }
    }
}

/// TNEP status byte carried by a Status record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From)]
#[display(fmt = "{:#04x}", _0)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Status(u8);

impl Status {
    pub const SUCCESS: Self = Self(0x00);
    pub const PROTOCOL_ERROR: Self = Self(0x01);

    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        *self == Self::SUCCESS
    }

    /// 0x80..=0xFE are reserved for service-specific errors
    pub fn is_service_error(&self) -> bool {
        (0x80..=0xfe).contains(&self.0)
    }
}

/// Decoded content of a Service Parameter record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceParam {
    pub version: u8,
    pub uri: Uri,
    pub communication_mode: CommunicationMode,
    /// Minimum waiting time code (WT)
    pub min_waiting_time: u8,
    /// Maximum number of waiting time extensions (N_wait)
    pub max_waiting_time_ext: u8,
    pub max_message_size: u16,
}

impl ServiceParam {
    /// Single-response parameters with the current TNEP version.
    pub fn new(uri: Uri, min_waiting_time: u8, max_waiting_time_ext: u8) -> Self {
        Self {
            version: TNEP_VERSION,
            uri,
            communication_mode: CommunicationMode::SingleResponse,
            min_waiting_time,
            max_waiting_time_ext,
            max_message_size: crate::constants::DEFAULT_MAX_MESSAGE_SIZE as u16,
        }
    }

    pub fn with_max_message_size(mut self, size: u16) -> Self {
        self.max_message_size = size;
        self
    }

    pub fn with_communication_mode(mut self, mode: CommunicationMode) -> Self {
        self.communication_mode = mode;
        self
    }
}

/// Protocol state shared by the poller and tag roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum State {
    #[display(fmt = "Disabled")]
    Disabled,
    #[display(fmt = "Service Ready")]
    ServiceReady,
    #[display(fmt = "Service Selected")]
    ServiceSelected,
}

impl Default for State {
    fn default() -> Self {
        Self::Disabled
    }
}
