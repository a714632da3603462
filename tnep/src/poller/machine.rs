// tnep/src/poller/machine.rs

use log::{debug, trace, warn};

use super::Poller;
use crate::buffer::NdefBuffer;
use crate::protocol::{Record, codec};
use crate::service::ServiceHandler;
use crate::signal::{ServiceSignal, Signal};
use crate::timer::{TimerEvent, WaitTiming};
use crate::types::{State, Status};
use crate::utils::trace_dump;
use crate::{Error, Result};

impl Poller {
    /// Run one transition for `signal` in the current state.
    pub(super) fn step(&mut self, signal: Signal) {
        trace!("{}: {:?}", self.state, signal);
        let result = match self.state {
            State::Disabled => {
                debug!("tnep disabled, {:?} ignored", signal);
                Ok(())
            }
            State::ServiceReady => self.service_ready(signal),
            State::ServiceSelected => self.service_selected(signal),
        };
        self.check(result);
    }

    /// Single error funnel: report to the active service, else log.
    fn check(&mut self, result: Result<()>) {
        let Err(err) = result else {
            return;
        };
        debug!("tnep error: {}", err);
        match self.active {
            Some(idx) => self.notify(idx, |h| h.error_detected(&err)),
            None => debug!("no active service, error dropped"),
        }
    }

    fn notify(&mut self, idx: usize, f: impl FnOnce(&mut dyn ServiceHandler)) {
        if let Ok(svc) = self.services.lookup_mut(idx) {
            f(svc.handler_mut());
        }
    }

    fn service_ready(&mut self, signal: Signal) -> Result<()> {
        match signal {
            Signal::Service(ServiceSignal::Deselect) => self.cancel_selection(),
            Signal::Service(ServiceSignal::Select(idx)) => self.select(idx),
            Signal::Timer(event) => self.confirm_selection(event),
            Signal::MessageTx => {
                debug!("record will be sent after service selection");
                self.signals.raise(Signal::MessageTx);
                Ok(())
            }
            Signal::MessageRx => {
                debug!("rx indication is a tag role signal, ignored");
                Ok(())
            }
        }
    }

    fn service_selected(&mut self, signal: Signal) -> Result<()> {
        match signal {
            Signal::Service(ServiceSignal::Deselect) => self.deselect(),
            Signal::Service(ServiceSignal::Select(idx)) => {
                warn!(
                    "only deselection is allowed in service selected state, select {} ignored",
                    idx
                );
                Ok(())
            }
            Signal::MessageTx => self.transmit(),
            Signal::Timer(event) => self.poll_response(event),
            Signal::MessageRx => {
                debug!("rx indication is a tag role signal, ignored");
                Ok(())
            }
        }
    }

    fn select(&mut self, idx: usize) -> Result<()> {
        if let Err(err) = self.refresh_services() {
            debug!("couldn't read service parameters: {}", err);
        }

        let svc = self
            .services
            .lookup(idx)
            .ok()
            .filter(|s| s.is_available())
            .ok_or_else(|| {
                debug!("no such service in the initial message, id {}", idx);
                Error::NoSuchService { index: idx }
            })?;
        let uri = svc.uri().clone();
        let timing = WaitTiming::from_param(svc.param());

        self.active = Some(idx);
        if let Err(err) = self.write_records(&[codec::build_select_record(Some(&uri))]) {
            self.notify(idx, |h| h.error_detected(&err));
            self.active = None;
            return Ok(());
        }

        debug!("service select sent for {}", uri);
        self.timer.stop();
        self.timer.configure(timing);
        self.timer.start();
        Ok(())
    }

    /// Deselect while a selection is still unconfirmed.
    fn cancel_selection(&mut self) -> Result<()> {
        if self.active.take().is_none() {
            debug!("already in service ready state");
            return Ok(());
        }
        debug!("pending selection cancelled");
        self.timer.stop();
        self.write_records(&[codec::build_select_record(None)])
    }

    fn confirm_selection(&mut self, event: TimerEvent) -> Result<()> {
        let Some(idx) = self.active else {
            debug!("service timer signal while no service selected");
            return Err(Error::PermissionDenied);
        };

        let rx = self.rx_snapshot();
        let outcome = if rx == self.tx {
            None
        } else {
            trace_dump("rx", &rx);
            match self.read_status(&rx) {
                Ok(Some(status)) if status.is_success() => Some(Ok(())),
                Ok(Some(status)) => Some(Err(Error::Protocol { status })),
                Ok(None) => {
                    trace!("rx holds no status record yet");
                    None
                }
                Err(err) => Some(Err(err)),
            }
        };
        let Some(outcome) = outcome else {
            if event == TimerEvent::Expired {
                debug!("no answer to service select within the waiting time");
                self.timer.stop();
                self.active = None;
                self.notify(idx, |h| h.timeout());
            }
            return Ok(());
        };

        self.timer.stop();
        match outcome {
            Ok(()) => {
                self.state = State::ServiceSelected;
                debug!("service {} selected", idx);
                self.notify(idx, |h| {
                    h.selected();
                });
            }
            Err(err) => {
                debug!("service {} selection failed: {}", idx, err);
                self.active = None;
                self.notify(idx, |h| h.error_detected(&err));
            }
        }
        Ok(())
    }

    fn deselect(&mut self) -> Result<()> {
        let idx = self.active.take();
        self.timer.stop();
        self.state = State::ServiceReady;
        debug!("service {:?} deselected", idx);
        if let Some(idx) = idx {
            self.notify(idx, |h| h.deselected());
        }
        self.write_records(&[codec::build_select_record(None)])
    }

    fn transmit(&mut self) -> Result<()> {
        if self.outbound.is_empty() {
            debug!("no records queued");
            return Ok(());
        }
        let bytes = self
            .outbound
            .encode(self.config.max_message_size)
            .inspect_err(|e| debug!("couldn't encode tx message: {}", e));
        let bytes = match bytes {
            Ok(bytes) => bytes,
            Err(err) => {
                self.outbound.clear();
                return Err(err);
            }
        };
        self.write_bytes(bytes)
            .inspect_err(|e| debug!("couldn't write: {}", e))?;
        self.outbound.clear();
        self.timer.start();
        Ok(())
    }

    fn poll_response(&mut self, event: TimerEvent) -> Result<()> {
        let Some(idx) = self.active else {
            return Err(Error::PermissionDenied);
        };

        let rx = self.rx_snapshot();
        if rx == self.tx {
            if event == TimerEvent::Expired {
                debug!("waiting time exhausted without a new message");
                self.notify(idx, |h| h.timeout());
                self.signals
                    .raise(Signal::Service(ServiceSignal::Deselect));
            }
            return Ok(());
        }

        trace_dump("rx", &rx);
        self.timer.stop();
        self.notify(idx, |h| h.message_received(&rx));

        match self.read_status(&rx) {
            Ok(Some(status)) if status.is_success() => {
                debug!("service reported success, ending exchange");
                self.signals
                    .raise(Signal::Service(ServiceSignal::Deselect));
            }
            Ok(Some(status)) => debug!("service status {}", status),
            Ok(None) => {}
            Err(err) => debug!("response is not a readable ndef message: {}", err),
        }
        Ok(())
    }

    /// Re-read the tag's service parameters. A message without any
    /// Service Parameter record leaves availability as it was.
    fn refresh_services(&mut self) -> Result<()> {
        let rx = self
            .rx
            .as_ref()
            .map(NdefBuffer::snapshot)
            .ok_or_else(|| Error::InvalidArgument("no rx buffer registered".into()))?;
        let msg = codec::parse_message(&rx, self.config.max_records)?;
        let params = codec::service_params(&msg)?;
        if params.is_empty() {
            trace!("no service parameter records, availability unchanged");
            return Ok(());
        }
        let found = self.services.refresh(&params);
        debug!(
            "{} of {} services advertised by the tag",
            found,
            self.services.len()
        );
        Ok(())
    }

    fn read_status(&self, rx: &[u8]) -> Result<Option<Status>> {
        let msg = codec::parse_message(rx, self.config.max_records)?;
        codec::message_status(&msg)
    }

    fn rx_snapshot(&self) -> Vec<u8> {
        self.rx.as_ref().map(NdefBuffer::snapshot).unwrap_or_default()
    }

    fn write_records(&mut self, records: &[Record]) -> Result<()> {
        let bytes = codec::encode(records, self.config.max_message_size)?;
        self.write_bytes(bytes)
    }

    fn write_bytes(&mut self, bytes: Vec<u8>) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(Error::IoUnavailable)?;
        self.tx = bytes;
        trace_dump("tx", &self.tx);
        writer.write(&self.tx)
    }
}
