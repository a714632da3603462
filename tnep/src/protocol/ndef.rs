// tnep/src/protocol/ndef.rs

//! NDEF records and messages as the engines see them.
//!
//! Wire encoding and decoding go through `ndef-rs`; this module only keeps
//! owned record values and enforces the record and size limits of a
//! configured engine.

use std::borrow::Cow;

use ndef_rs::payload::RecordPayload;
use ndef_rs::{NdefMessage, NdefRecord};

pub use ndef_rs::TNF;

use crate::constants::REC_TYPE_TEXT;
use crate::{Error, Result};

/// A single NDEF record.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    tnf: TNF,
    record_type: Vec<u8>,
    payload: Vec<u8>,
}

impl Record {
    pub fn new(tnf: TNF, record_type: impl Into<Vec<u8>>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            tnf,
            record_type: record_type.into(),
            payload: payload.into(),
        }
    }

    /// NFC Forum well-known type record.
    pub fn well_known(record_type: &[u8], payload: impl Into<Vec<u8>>) -> Self {
        Self::new(TNF::WellKnown, record_type.to_vec(), payload)
    }

    /// NFC Forum Text record, UTF-8 encoded.
    pub fn text(lang: &str, text: &str) -> Result<Self> {
        let lang = lang.as_bytes();
        if lang.len() > 0x3f {
            return Err(Error::InvalidArgument(format!(
                "language code is {} bytes, max 63",
                lang.len()
            )));
        }
        let mut payload = Vec::with_capacity(1 + lang.len() + text.len());
        payload.push(lang.len() as u8);
        payload.extend_from_slice(lang);
        payload.extend_from_slice(text.as_bytes());
        Ok(Self::well_known(REC_TYPE_TEXT, payload))
    }

    pub fn tnf(&self) -> &TNF {
        &self.tnf
    }

    pub fn record_type(&self) -> &[u8] {
        &self.record_type
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// True for a well-known record of exactly this type.
    pub fn is_well_known(&self, record_type: &[u8]) -> bool {
        matches!(self.tnf, TNF::WellKnown) && self.record_type == record_type
    }

    /// Text of a Text record, `None` for every other record.
    pub fn text_content(&self) -> Option<String> {
        if !self.is_well_known(REC_TYPE_TEXT) {
            return None;
        }
        let status = *self.payload.first()?;
        let start = 1 + (status & 0x3f) as usize;
        let body = self.payload.get(start..)?;
        Some(String::from_utf8_lossy(body).into_owned())
    }

    fn from_ndef(record: &NdefRecord) -> Self {
        Self {
            tnf: record.tnf().clone(),
            record_type: record.record_type().to_vec(),
            payload: record.payload().to_vec(),
        }
    }

    fn to_ndef(&self) -> Result<NdefRecord> {
        NdefRecord::builder()
            .tnf(self.tnf.clone())
            .payload(&RawPayload(self))
            .build()
            .map_err(|e| Error::Encode(format!("couldn't build ndef record: {:?}", e)))
    }
}

/// Type and payload of a [`Record`] handed to the `ndef-rs` record builder.
struct RawPayload<'a>(&'a Record);

impl RecordPayload for RawPayload<'_> {
    fn record_type(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.0.record_type)
    }

    fn payload(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.0.payload)
    }
}

/// An NDEF message holding at most `capacity` records.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    records: Vec<Record>,
    capacity: usize,
}

impl Message {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity,
        }
    }

    /// Append a record; fails once the record capacity is reached.
    pub fn push(&mut self, record: Record) -> Result<()> {
        if self.records.len() >= self.capacity {
            return Err(Error::Encode(format!(
                "message already holds {} records",
                self.capacity
            )));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Encode all records into a single NDEF message no larger than `max_size`.
    pub fn encode(&self, max_size: usize) -> Result<Vec<u8>> {
        encode_records(&self.records, max_size)
    }

    /// Decode an NDEF message carrying at most `capacity` records.
    pub fn parse(data: &[u8], capacity: usize) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::Decode("empty ndef message".into()));
        }
        let ndef = NdefMessage::decode(data)
            .map_err(|e| Error::Decode(format!("malformed ndef message: {:?}", e)))?;
        if ndef.records().len() > capacity {
            return Err(Error::Decode(format!(
                "message carries more than {} records",
                capacity
            )));
        }
        Ok(Self {
            records: ndef.records().iter().map(Record::from_ndef).collect(),
            capacity,
        })
    }
}

/// Encode a record slice into one NDEF message.
pub fn encode_records(records: &[Record], max_size: usize) -> Result<Vec<u8>> {
    let (first, rest) = records
        .split_first()
        .ok_or_else(|| Error::Encode("message has no records".into()))?;
    let mut message = NdefMessage::from(first.to_ndef()?);
    for rec in rest {
        message.add_record(rec.to_ndef()?);
    }
    let bytes = message
        .to_buffer()
        .map_err(|e| Error::Encode(format!("couldn't encode ndef message: {:?}", e)))?;
    if bytes.len() > max_size {
        return Err(Error::Encode(format!(
            "encoded message is {} bytes, max {}",
            bytes.len(),
            max_size
        )));
    }
    Ok(bytes)
}
