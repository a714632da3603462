#[path = "../common/mod.rs"]
mod common;

use common::{fixtures, helpers};
use serial_test::serial;
use tnep::constants::REC_TYPE_SVC_PARAM;
use tnep::protocol::codec;
use tnep::test_support::{self, Callback};
use tnep::{Error, MockTransport, NdefBuffer, Record, ServiceSignal, Signal, State};

#[test]
fn select_index_out_of_range() {
    let rx = NdefBuffer::new(1024);
    let (services, _, _) = fixtures::two_services();
    let mut poller = helpers::running_poller(services, &rx, MockTransport::new());

    assert!(matches!(
        poller.select_service(2),
        Err(Error::InvalidArgument(_))
    ));
    assert!(poller.select_service(1).is_ok());
}

#[test]
#[serial]
fn selection_confirmed_by_success_status() {
    helpers::init_logger();
    let rx = NdefBuffer::new(1024);
    let (services, one, two) = fixtures::two_services();
    let tag = helpers::ScriptedTag::new(rx.clone()).on_select(fixtures::success());
    let mut poller = helpers::running_poller(services, &rx, tag.clone());

    poller.select_service(0).unwrap();
    poller.process().unwrap();
    // select written, confirmation still pending
    assert_eq!(tag.sent(), vec![fixtures::select(fixtures::SVC_ONE)]);
    assert_eq!(poller.state(), State::ServiceReady);
    assert_eq!(poller.active_index(), Some(0));

    assert!(helpers::pump_poller(&mut poller, 50, |p| p.state() == State::ServiceSelected));
    assert_eq!(poller.active_index(), Some(0));
    assert_eq!(poller.active_service().unwrap().uri().as_bytes(), fixtures::SVC_ONE.as_bytes());
    assert_eq!(one.calls(), vec![Callback::Selected]);
    assert!(two.calls().is_empty());
}

#[test]
fn select_while_active_is_permission_denied() {
    let rx = NdefBuffer::new(1024);
    let (services, _, _) = fixtures::two_services();
    let tag = helpers::ScriptedTag::new(rx.clone()).on_select(fixtures::success());
    let mut poller = helpers::running_poller(services, &rx, tag);

    poller.select_service(0).unwrap();
    poller.process().unwrap();
    assert!(matches!(
        poller.select_service(1),
        Err(Error::PermissionDenied)
    ));
}

#[test]
#[serial]
fn error_status_leaves_no_active_service() {
    helpers::init_logger();
    let rx = NdefBuffer::new(1024);
    let (services, one, _) = fixtures::two_services();
    let tag = helpers::ScriptedTag::new(rx.clone()).on_select(fixtures::status(0x81));
    let mut poller = helpers::running_poller(services, &rx, tag);

    poller.select_service(0).unwrap();
    assert!(helpers::pump_poller(&mut poller, 50, |_| !one.errors().is_empty()));
    assert_eq!(poller.state(), State::ServiceReady);
    assert_eq!(poller.active_index(), None);
    assert_eq!(one.selected_count(), 0);
    assert_eq!(one.errors().len(), 1);
    assert!(one.errors()[0].contains("0x81"));

    // a fresh selection is allowed again
    assert!(poller.select_service(1).is_ok());
}

#[test]
#[serial]
fn unanswered_select_times_out_after_retry_budget() {
    helpers::init_logger();
    let rx = NdefBuffer::new(1024);
    let (services, one, _) = fixtures::two_services();
    // memory only reflects the select, no answer
    let mut poller =
        helpers::running_poller(services, &rx, MockTransport::echoing(rx.clone()));

    poller.select_service(0).unwrap();
    poller.process().unwrap();

    // N_wait 2 allows three waiting periods; none of the first two report
    let mut fired = 0;
    while one.calls().is_empty() && fired < 3 {
        match poller.process() {
            Ok(()) => fired += 1,
            Err(e) => assert!(e.is_timeout()),
        }
    }
    assert_eq!(fired, 3);
    assert_eq!(one.calls(), vec![Callback::Timeout]);
    assert_eq!(poller.active_index(), None);
    assert_eq!(poller.state(), State::ServiceReady);
}

#[test]
fn unadvertised_service_is_not_selected() {
    helpers::init_logger();
    let rx = NdefBuffer::new(1024);
    let (services, one, _) = fixtures::two_services();
    let mock = MockTransport::new();
    let mut poller = helpers::running_poller(services, &rx, mock.clone());

    // the tag now only advertises the second service
    let only_two = tnep::test_support::initial_message(&fixtures::advertised()[1..]).unwrap();
    rx.write(&only_two).unwrap();

    poller.select_service(0).unwrap();
    poller.process().unwrap();
    assert_eq!(mock.sent_count(), 0);
    assert_eq!(poller.active_index(), None);
    assert!(!poller.services().lookup(0).unwrap().is_available());
    assert!(poller.services().lookup(1).unwrap().is_available());
    assert!(one.calls().is_empty());

    poller.select_service(1).unwrap();
    poller.process().unwrap();
    assert_eq!(mock.last_sent(), Some(fixtures::select(fixtures::SVC_TWO)));
}

#[test]
fn failed_select_write_reports_error() {
    helpers::init_logger();
    let rx = NdefBuffer::new(1024);
    let (services, one, _) = fixtures::two_services();
    let mock = MockTransport::echoing(rx.clone());
    mock.set_write_failures(1);
    let mut poller = helpers::running_poller(services, &rx, mock.clone());

    poller.select_service(0).unwrap();
    poller.process().unwrap();
    assert_eq!(mock.sent_count(), 0);
    assert_eq!(one.errors().len(), 1);
    assert_eq!(poller.active_index(), None);
    assert_eq!(poller.state(), State::ServiceReady);
}

#[test]
#[serial]
fn double_deselect_sends_one_message() {
    helpers::init_logger();
    let rx = NdefBuffer::new(1024);
    let (services, one, _) = fixtures::two_services();
    let tag = helpers::ScriptedTag::new(rx.clone()).on_select(fixtures::success());
    let mut poller = helpers::running_poller(services, &rx, tag.clone());

    poller.select_service(0).unwrap();
    assert!(helpers::pump_poller(&mut poller, 50, |p| p.state() == State::ServiceSelected));
    let before = tag.sent_count();

    poller.deselect_service();
    poller.deselect_service();
    poller.process().unwrap();
    assert_eq!(poller.state(), State::ServiceReady);
    assert_eq!(tag.sent_count(), before + 1);
    assert_eq!(tag.sent().last(), Some(&fixtures::deselect()));

    // nothing left to deselect in service ready
    poller.deselect_service();
    poller.process().unwrap();
    assert_eq!(tag.sent_count(), before + 1);
    assert_eq!(one.count(&Callback::Deselected), 1);
}

#[test]
fn deselect_cancels_pending_selection() {
    let rx = NdefBuffer::new(1024);
    let (services, one, _) = fixtures::two_services();
    let mock = MockTransport::echoing(rx.clone());
    let mut poller = helpers::running_poller(services, &rx, mock.clone());

    poller.select_service(0).unwrap();
    poller.process().unwrap();
    assert_eq!(poller.active_index(), Some(0));

    poller.deselect_service();
    poller.process().unwrap();
    assert_eq!(poller.active_index(), None);
    assert_eq!(mock.last_sent(), Some(fixtures::deselect()));
    assert!(one.calls().is_empty());
}

#[test]
#[serial]
fn signaller_deselects_from_another_thread() {
    helpers::init_logger();
    let rx = NdefBuffer::new(1024);
    let (services, one, _) = fixtures::two_services();
    let tag = helpers::ScriptedTag::new(rx.clone()).on_select(fixtures::success());
    let mut poller = helpers::running_poller(services, &rx, tag);

    poller.select_service(0).unwrap();
    assert!(helpers::pump_poller(&mut poller, 50, |p| p.state() == State::ServiceSelected));

    let signaller = poller.signaller();
    let handle = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(5));
        signaller.deselect()
    });
    assert!(helpers::pump_poller(&mut poller, 500, |p| p.state() == State::ServiceReady));
    assert!(handle.join().unwrap());
    assert_eq!(one.calls(), vec![Callback::Selected, Callback::Deselected]);
}

#[test]
#[serial]
fn stale_initial_message_keeps_selection_pending() {
    helpers::init_logger();
    let rx = NdefBuffer::new(1024);
    let (services, one, _) = fixtures::two_services();
    let mock = MockTransport::new();
    let mut poller = helpers::running_poller(services, &rx, mock.clone());
    // N_wait 15 gives the tag sixteen waiting periods to answer
    let patient =
        test_support::initial_message(&[test_support::param(fixtures::SVC_ONE, fixtures::FAST_WT, 15)])
            .unwrap();
    rx.write(&patient).unwrap();

    poller.select_service(0).unwrap();
    poller.process().unwrap();
    assert_eq!(mock.sent_count(), 1);

    // the tag memory still holds the initial message at the first tick
    assert!((0..50).any(|_| poller.process().is_ok()));
    assert!(one.calls().is_empty());
    assert_eq!(poller.active_index(), Some(0));
    assert_eq!(poller.state(), State::ServiceReady);

    rx.write(&fixtures::success()).unwrap();
    assert!(helpers::pump_poller(&mut poller, 50, |p| p.state() == State::ServiceSelected));
    assert_eq!(one.calls(), vec![Callback::Selected]);
}

#[test]
#[serial]
fn select_signal_ignored_while_selected() {
    helpers::init_logger();
    let rx = NdefBuffer::new(1024);
    let (services, one, two) = fixtures::two_services();
    let tag = helpers::ScriptedTag::new(rx.clone()).on_select(fixtures::success());
    let mut poller = helpers::running_poller(services, &rx, tag.clone());

    poller.select_service(0).unwrap();
    assert!(helpers::pump_poller(&mut poller, 50, |p| p.state() == State::ServiceSelected));
    let before = tag.sent_count();

    assert!(poller
        .signaller()
        .raise(Signal::Service(ServiceSignal::Select(1))));
    poller.process().unwrap();
    assert_eq!(tag.sent_count(), before);
    assert_eq!(poller.state(), State::ServiceSelected);
    assert_eq!(poller.active_index(), Some(0));
    assert_eq!(one.calls(), vec![Callback::Selected]);
    assert!(two.calls().is_empty());
}

#[test]
fn malformed_service_parameter_selects_nothing() {
    helpers::init_logger();
    let rx = NdefBuffer::new(1024);
    let (services, one, _) = fixtures::two_services();
    let mock = MockTransport::new();
    let mut poller = helpers::running_poller(services, &rx, mock.clone());

    // URI length runs past the end of the record payload
    let good = codec::build_service_param_record(&fixtures::advertised()[0]);
    let mut payload = good.payload().to_vec();
    payload[1] = 40;
    let bad = Record::well_known(REC_TYPE_SVC_PARAM, payload);
    rx.write(&codec::encode(&[bad], 256).unwrap()).unwrap();

    poller.select_service(0).unwrap();
    poller.process().unwrap();
    assert_eq!(mock.sent_count(), 0);
    assert_eq!(poller.active_index(), None);
    assert_eq!(poller.state(), State::ServiceReady);
    assert!(!poller.services().lookup(0).unwrap().is_available());
    assert!(!poller.services().lookup(1).unwrap().is_available());
    assert!(one.calls().is_empty());
}
