#[path = "../common/mod.rs"]
mod common;

use common::{fixtures, helpers};
use tnep::{Error, MockTransport, NdefBuffer, Poller, State};

#[test]
fn calls_before_init_are_refused() {
    let mut poller = Poller::new();
    assert_eq!(poller.state(), State::Disabled);
    assert!(matches!(poller.select_service(0), Err(Error::NotRunning)));
    assert!(matches!(poller.process(), Err(Error::NotRunning)));
    let rec = tnep::Record::text("en", "x").unwrap();
    assert!(matches!(poller.send(rec), Err(Error::NotRunning)));
}

#[test]
fn init_validates_arguments() {
    let mut poller = Poller::new();
    let (services, _, _) = fixtures::two_services();

    assert!(matches!(
        poller.init(Vec::new(), helpers::boxed(MockTransport::new())),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        poller.init(services, None),
        Err(Error::IoUnavailable)
    ));
    assert_eq!(poller.state(), State::Disabled);
}

#[test]
fn second_init_is_already_running() {
    let mut poller = Poller::new();
    let (services, _, _) = fixtures::two_services();
    poller
        .init(services, helpers::boxed(MockTransport::new()))
        .unwrap();
    assert_eq!(poller.state(), State::ServiceReady);

    let (again, _, _) = fixtures::two_services();
    assert!(matches!(
        poller.init(again, helpers::boxed(MockTransport::new())),
        Err(Error::AlreadyRunning)
    ));
}

#[test]
fn register_rx_buffer_rejects_zero_capacity() {
    let mut poller = Poller::new();
    assert!(matches!(
        poller.register_rx_buffer(NdefBuffer::new(0)),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn uninit_returns_services_and_allows_reinit() {
    helpers::init_logger();
    let rx = NdefBuffer::new(1024);
    let (services, _, _) = fixtures::two_services();
    let tag = helpers::ScriptedTag::new(rx.clone()).on_select(fixtures::success());
    let mut poller = helpers::running_poller(services, &rx, tag);

    poller.select_service(0).unwrap();
    assert!(helpers::pump_poller(&mut poller, 50, |p| p.state() == State::ServiceSelected));
    assert!(poller.services().lookup(0).unwrap().is_available());

    let services = poller.uninit();
    assert_eq!(services.len(), 2);
    assert!(services.iter().all(|s| !s.is_available()));
    assert_eq!(poller.state(), State::Disabled);
    assert_eq!(poller.active_index(), None);
    assert!(poller.last_tx().is_empty());
    assert!(matches!(poller.process(), Err(Error::NotRunning)));

    // a second uninit hands back nothing
    assert!(poller.uninit().is_empty());

    poller
        .init(services, helpers::boxed(MockTransport::new()))
        .unwrap();
    assert_eq!(poller.state(), State::ServiceReady);
}

#[test]
fn idle_process_times_out() {
    let mut poller = Poller::with_config(helpers::fast_config());
    let (services, _, _) = fixtures::two_services();
    poller
        .init(services, helpers::boxed(MockTransport::new()))
        .unwrap();
    let err = poller.process().unwrap_err();
    assert!(err.is_timeout());
}
