//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize service-table and message setup so tests across
//! the crate and the tests/ directory share the same fixtures.
#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use crate::protocol::{Record, codec};
use crate::service::{Service, ServiceHandler};
use crate::types::{ServiceParam, Status, Uri};
use crate::{Error, Result};

/// Callback observed by a [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Selected,
    Deselected,
    MessageReceived(Vec<u8>),
    Timeout,
    /// Display text of the reported error
    ErrorDetected(String),
}

/// Handler that records every callback into a shared log.
#[derive(Debug, Clone)]
pub struct RecordingHandler {
    log: Arc<Mutex<Vec<Callback>>>,
    selected_status: Status,
}

impl Default for RecordingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            selected_status: Status::SUCCESS,
        }
    }

    /// Handler whose `selected()` answers with `status`.
    pub fn answering(status: Status) -> Self {
        Self {
            selected_status: status,
            ..Self::new()
        }
    }

    fn log(&self) -> MutexGuard<'_, Vec<Callback>> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn calls(&self) -> Vec<Callback> {
        self.log().clone()
    }

    pub fn count(&self, wanted: &Callback) -> usize {
        self.log().iter().filter(|c| *c == wanted).count()
    }

    pub fn selected_count(&self) -> usize {
        self.count(&Callback::Selected)
    }

    pub fn errors(&self) -> Vec<String> {
        self.log()
            .iter()
            .filter_map(|c| match c {
                Callback::ErrorDetected(e) => Some(e.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn received(&self) -> Vec<Vec<u8>> {
        self.log()
            .iter()
            .filter_map(|c| match c {
                Callback::MessageReceived(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log().clear();
    }
}

impl ServiceHandler for RecordingHandler {
    fn selected(&mut self) -> Status {
        self.log().push(Callback::Selected);
        self.selected_status
    }

    fn deselected(&mut self) {
        self.log().push(Callback::Deselected);
    }

    fn message_received(&mut self, message: &[u8]) {
        self.log().push(Callback::MessageReceived(message.to_vec()));
    }

    fn timeout(&mut self) {
        self.log().push(Callback::Timeout);
    }

    fn error_detected(&mut self, error: &Error) {
        self.log().push(Callback::ErrorDetected(error.to_string()));
    }
}

#[doc(hidden)]
pub fn uri(s: &str) -> Uri {
    Uri::new(s.as_bytes().to_vec()).unwrap_or_else(|_| panic!("test uri too long: {}", s))
}

/// Single-response parameters for `uri` with the given timing codes.
#[doc(hidden)]
pub fn param(uri_str: &str, min_waiting_time: u8, max_waiting_time_ext: u8) -> ServiceParam {
    ServiceParam::new(uri(uri_str), min_waiting_time, max_waiting_time_ext)
}

/// Service backed by a fresh RecordingHandler; returns a handle to its log.
#[doc(hidden)]
pub fn recorded_service(
    uri_str: &str,
    min_waiting_time: u8,
    max_waiting_time_ext: u8,
) -> (Service, RecordingHandler) {
    let handler = RecordingHandler::new();
    let svc = Service::new(
        param(uri_str, min_waiting_time, max_waiting_time_ext),
        Box::new(handler.clone()),
    );
    (svc, handler)
}

/// Encoded initial (discovery) message advertising `params`.
#[doc(hidden)]
pub fn initial_message(params: &[ServiceParam]) -> Result<Vec<u8>> {
    let records: Vec<Record> = params
        .iter()
        .map(codec::build_service_param_record)
        .collect();
    codec::encode(&records, 1024)
}

/// Encoded message holding one Status record.
#[doc(hidden)]
pub fn status_message(status: Status) -> Result<Vec<u8>> {
    codec::encode(&[codec::build_status_record(status)], 64)
}

/// Encoded message holding a Text record, optionally followed by a Status.
#[doc(hidden)]
pub fn text_message(text: &str, status: Option<Status>) -> Result<Vec<u8>> {
    let mut records = vec![Record::text("en", text)?];
    if let Some(status) = status {
        records.push(codec::build_status_record(status));
    }
    codec::encode(&records, 1024)
}

/// Encoded Service Select message; `None` selects nothing.
#[doc(hidden)]
pub fn select_message(uri_str: Option<&str>) -> Result<Vec<u8>> {
    let target = uri_str.map(uri);
    codec::encode(&[codec::build_select_record(target.as_ref())], 300)
}
