// tnep/src/constants.rs
//! Common protocol constants used across the crate

/// TNEP version advertised in Service Parameter records (1.0)
pub const TNEP_VERSION: u8 = 0x10;

/// Well-known record type of the Service Parameter record
pub const REC_TYPE_SVC_PARAM: &[u8; 2] = b"Tp";

/// Well-known record type of the Service Select record
pub const REC_TYPE_SVC_SELECT: &[u8; 2] = b"Ts";

/// Well-known record type of the TNEP Status record
pub const REC_TYPE_STATUS: &[u8; 2] = b"Te";

/// Well-known record type of the NFC Forum Text record
pub const REC_TYPE_TEXT: &[u8; 1] = b"T";

/// Fixed bytes of a Service Parameter payload besides the URI:
/// version, uri length, mode, wt, n_wait, max message size (2)
pub const SVC_PARAM_FIXED_LEN: usize = 7;

/// Longest service name URI (its length is a single byte on the wire)
pub const MAX_URI_LEN: usize = 255;

/// Highest minimum-waiting-time code (6 bits)
pub const MAX_WAIT_TIME_CODE: u8 = 63;

/// Highest waiting-time-extension code (4 bits)
pub const MAX_WAIT_TIME_EXT_CODE: u8 = 15;

/// Default bounded wait of one `process()` call in milliseconds
pub const DEFAULT_PROCESS_TIMEOUT_MS: u64 = 100;

/// Default capacity of an encoded TNEP message
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024;

/// Default number of records one message may carry
pub const DEFAULT_MAX_RECORDS: usize = 16;
