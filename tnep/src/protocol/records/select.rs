// tnep/src/protocol/records/select.rs

use crate::protocol::parser::{byte_at, slice_at};
use crate::types::Uri;
use crate::Result;

/// Service Select payload: [UriLen(1)] [Uri]. No URI encodes a deselect.
pub fn encode_select(uri: Option<&Uri>) -> Vec<u8> {
    let bytes = uri.map(Uri::as_bytes).unwrap_or(&[]);
    let mut out = Vec::with_capacity(1 + bytes.len());
    out.push(bytes.len() as u8);
    out.extend_from_slice(bytes);
    out
}

/// Decode a Service Select payload; `None` means deselect.
pub fn decode_select(data: &[u8]) -> Result<Option<Uri>> {
    let len = byte_at(data, 0)? as usize;
    if len == 0 {
        return Ok(None);
    }
    let uri = slice_at(data, 1, len)?;
    Uri::try_from(uri).map(Some)
}
