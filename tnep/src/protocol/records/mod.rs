// tnep/src/protocol/records/mod.rs

//! TNEP record payloads. One file per record type, each providing an
//! encoder and a decoder for the payload bytes.

pub mod param;
pub mod select;
pub mod status;

pub use param::{decode_service_param, encode_service_param};
pub use select::{decode_select, encode_select};
pub use status::{decode_status, encode_status};
