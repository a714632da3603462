// tnep/src/protocol/records/param.rs

use crate::constants::SVC_PARAM_FIXED_LEN;
use crate::protocol::parser::{be_u16_at, byte_at, ensure_len, slice_at};
use crate::types::{ServiceParam, Uri};
use crate::Result;

/// Service Parameter payload:
/// [Version(1)] [UriLen(1)] [Uri] [Mode(1)] [WT(1)] [N_wait(1)] [MaxSize(2, BE)]
pub fn encode_service_param(param: &ServiceParam) -> Vec<u8> {
    let uri = param.uri.as_bytes();
    let mut out = Vec::with_capacity(SVC_PARAM_FIXED_LEN + uri.len());
    out.push(param.version);
    out.push(uri.len() as u8);
    out.extend_from_slice(uri);
    out.push(param.communication_mode.as_u8());
    out.push(param.min_waiting_time);
    out.push(param.max_waiting_time_ext);
    out.extend_from_slice(&param.max_message_size.to_be_bytes());
    out
}

/// Decode a Service Parameter payload. Fails with `ShortBuffer` when the
/// declared URI length does not fit the payload.
pub fn decode_service_param(data: &[u8]) -> Result<ServiceParam> {
    let uri_len = byte_at(data, 1)? as usize;
    ensure_len(data, uri_len + SVC_PARAM_FIXED_LEN)?;

    let version = data[0];
    let uri = Uri::try_from(slice_at(data, 2, uri_len)?)?;
    let mut idx = 2 + uri_len;
    let communication_mode = byte_at(data, idx)?.into();
    idx += 1;
    let min_waiting_time = byte_at(data, idx)?;
    idx += 1;
    let max_waiting_time_ext = byte_at(data, idx)?;
    idx += 1;
    let max_message_size = be_u16_at(data, idx)?;

    Ok(ServiceParam {
        version,
        uri,
        communication_mode,
        min_waiting_time,
        max_waiting_time_ext,
        max_message_size,
    })
}
