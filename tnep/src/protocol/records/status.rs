// tnep/src/protocol/records/status.rs

use crate::protocol::parser::byte_at;
use crate::types::Status;
use crate::{Error, Result};

/// Status payload: [Status(1)]
pub fn encode_status(status: Status) -> Vec<u8> {
    vec![status.as_u8()]
}

pub fn decode_status(data: &[u8]) -> Result<Status> {
    if data.is_empty() {
        return Err(Error::Decode("status record with 0 length payload".into()));
    }
    Ok(Status::new(byte_at(data, 0)?))
}
