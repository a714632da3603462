// tnep/src/protocol/codec.rs

//! Record codec adapter: the only place the engines touch NDEF bytes.

use crate::Result;
use crate::constants::{REC_TYPE_STATUS, REC_TYPE_SVC_PARAM, REC_TYPE_SVC_SELECT};
use crate::types::{ServiceParam, Status, Uri};

use super::ndef::{self, Message, Record};
use super::records;

/// Parse a raw NDEF message holding at most `max_records` records.
pub fn parse_message(data: &[u8], max_records: usize) -> Result<Message> {
    Message::parse(data, max_records)
}

/// First well-known record of the given type.
pub fn find_record<'a>(msg: &'a Message, record_type: &[u8]) -> Option<&'a Record> {
    msg.records().iter().find(|r| r.is_well_known(record_type))
}

/// Every well-known record of the given type, in message order.
pub fn find_records<'a>(
    msg: &'a Message,
    record_type: &'a [u8],
) -> impl Iterator<Item = &'a Record> + 'a {
    msg.records()
        .iter()
        .filter(move |r| r.is_well_known(record_type))
}

pub fn decode_service_param(record: &Record) -> Result<ServiceParam> {
    records::decode_service_param(record.payload())
}

pub fn decode_status(record: &Record) -> Result<Status> {
    records::decode_status(record.payload())
}

pub fn decode_select(record: &Record) -> Result<Option<Uri>> {
    records::decode_select(record.payload())
}

/// Service Select record; `None` builds the empty (deselect) record.
pub fn build_select_record(uri: Option<&Uri>) -> Record {
    Record::well_known(REC_TYPE_SVC_SELECT, records::encode_select(uri))
}

pub fn build_status_record(status: Status) -> Record {
    Record::well_known(REC_TYPE_STATUS, records::encode_status(status))
}

pub fn build_service_param_record(param: &ServiceParam) -> Record {
    Record::well_known(REC_TYPE_SVC_PARAM, records::encode_service_param(param))
}

/// Encode records into one NDEF message no larger than `max_size`.
pub fn encode(records: &[Record], max_size: usize) -> Result<Vec<u8>> {
    ndef::encode_records(records, max_size)
}

/// Decode every Service Parameter record carried by `msg`.
pub fn service_params(msg: &Message) -> Result<Vec<ServiceParam>> {
    find_records(msg, REC_TYPE_SVC_PARAM)
        .map(decode_service_param)
        .collect()
}

/// Status carried by `msg`, `Ok(None)` when it holds no Status record.
pub fn message_status(msg: &Message) -> Result<Option<Status>> {
    find_record(msg, REC_TYPE_STATUS)
        .map(decode_status)
        .transpose()
}
