// fixtures.rs — commonly used service tables and NDEF messages

use tnep::test_support::{self, RecordingHandler};
use tnep::{Service, ServiceParam, Status};

pub const SVC_ONE: &str = "urn:nfc:sn:one";
pub const SVC_TWO: &str = "urn:nfc:sn:two";

/// WT 0 is a 0.5 ms waiting period; N_wait 2 allows three of them.
pub const FAST_WT: u8 = 0;
pub const FAST_N: u8 = 2;

/// Parameters both test services are advertised with.
pub fn advertised() -> Vec<ServiceParam> {
    vec![
        test_support::param(SVC_ONE, FAST_WT, FAST_N),
        test_support::param(SVC_TWO, FAST_WT, FAST_N),
    ]
}

/// Two services with recording handlers, in table order.
pub fn two_services() -> (Vec<Service>, RecordingHandler, RecordingHandler) {
    let (one, log_one) = test_support::recorded_service(SVC_ONE, FAST_WT, FAST_N);
    let (two, log_two) = test_support::recorded_service(SVC_TWO, FAST_WT, FAST_N);
    (vec![one, two], log_one, log_two)
}

pub fn initial_message() -> Vec<u8> {
    test_support::initial_message(&advertised()).unwrap()
}

pub fn success() -> Vec<u8> {
    test_support::status_message(Status::SUCCESS).unwrap()
}

pub fn status(code: u8) -> Vec<u8> {
    test_support::status_message(Status::new(code)).unwrap()
}

pub fn select(uri: &str) -> Vec<u8> {
    test_support::select_message(Some(uri)).unwrap()
}

pub fn deselect() -> Vec<u8> {
    test_support::select_message(None).unwrap()
}
