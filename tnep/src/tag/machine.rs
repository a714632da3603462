// tnep/src/tag/machine.rs

use log::{debug, trace, warn};

use super::Tag;
use crate::protocol::{Message, Record, codec};
use crate::service::ServiceHandler;
use crate::signal::Signal;
use crate::timer::{TimerEvent, WaitTiming};
use crate::types::{State, Status, Uri};
use crate::utils::{ms, trace_dump};
use crate::{Error, Result};

impl Tag {
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

    fn check(&mut self, result: Result<()>) {
        let Err(err) = result else {
            return;
        };
        debug!("tnep error: {}", err);
        match self.active {
            Some(idx) => {
                self.notify(idx, |h| h.error_detected(&err));
            }
            None => debug!("no active service, error dropped"),
        }
    }

    fn notify<T>(&mut self, idx: usize, f: impl FnOnce(&mut dyn ServiceHandler) -> T) -> Option<T> {
        self.services
            .lookup_mut(idx)
            .ok()
            .map(|svc| f(svc.handler_mut()))
    }

    fn service_ready(&mut self, signal: Signal) -> Result<()> {
        match signal {
            Signal::MessageRx => {
                let msg = self.read_rx()?;
                match self.select_request(&msg)? {
                    Some(uri) => self.select(uri),
                    None => {
                        debug!("no service select record, message ignored");
                        Ok(())
                    }
                }
            }
            Signal::MessageTx => {
                warn!("no service selected, {} queued records dropped", self.outbound.len());
                self.outbound.clear();
                Ok(())
            }
            Signal::Timer(_) | Signal::Service(_) => {
                debug!("{:?} ignored in service ready state", signal);
                Ok(())
            }
        }
    }

    fn service_selected(&mut self, signal: Signal) -> Result<()> {
        match signal {
            Signal::MessageRx => {
                let raw = self.rx.snapshot();
                let msg = self.read_rx()?;
                match self.select_request(&msg)? {
                    Some(None) => self.leave_selected(),
                    Some(Some(_)) => {
                        // The new select itself is handled from Service Ready.
                        self.deselect();
                        self.signals.raise(Signal::MessageRx);
                        Ok(())
                    }
                    None => {
                        if let Some(idx) = self.active {
                            self.notify(idx, |h| h.message_received(&raw));
                        }
                        self.arm_idle_timer();
                        Ok(())
                    }
                }
            }
            Signal::MessageTx => self.transmit(),
            Signal::Timer(TimerEvent::Expired) => {
                debug!("reader silent for the idle timeout");
                if let Some(idx) = self.active.take() {
                    self.notify(idx, |h| h.timeout());
                }
                self.leave_selected()
            }
            Signal::Timer(TimerEvent::Tick) | Signal::Service(_) => Ok(()),
        }
    }

    /// Select request carried by `msg`: `None` without a Service Select
    /// record, `Some(None)` for an empty one (deselect).
    fn select_request(&self, msg: &Message) -> Result<Option<Option<Uri>>> {
        match codec::find_record(msg, crate::constants::REC_TYPE_SVC_SELECT) {
            Some(rec) => codec::decode_select(rec).map(Some),
            None => Ok(None),
        }
    }

    fn select(&mut self, uri: Option<Uri>) -> Result<()> {
        let Some(uri) = uri else {
            debug!("deselect while no service selected");
            return self.write_initial_message();
        };
        let Some(idx) = self.services.position(uri.as_bytes()) else {
            debug!("unknown service {} requested", uri);
            return self.write_initial_message();
        };

        let status = self.notify(idx, |h| h.selected()).unwrap_or(Status::PROTOCOL_ERROR);
        self.write_records(&[codec::build_status_record(status)])?;
        if !status.is_success() {
            debug!("service {} refused selection with status {}", uri, status);
            return Ok(());
        }

        self.active = Some(idx);
        self.state = State::ServiceSelected;
        debug!("service {} selected", uri);
        self.arm_idle_timer();
        Ok(())
    }

    fn deselect(&mut self) {
        if let Some(idx) = self.active.take() {
            debug!("service {} deselected", idx);
            self.notify(idx, |h| h.deselected());
        }
        self.timer.stop();
        self.state = State::ServiceReady;
    }

    fn leave_selected(&mut self) -> Result<()> {
        self.deselect();
        self.write_initial_message()
    }

    fn arm_idle_timer(&mut self) {
        if self.config.idle_timeout_ms == 0 {
            self.timer.stop();
            return;
        }
        self.timer
            .configure(WaitTiming::new(ms(self.config.idle_timeout_ms), 1));
        self.timer.start();
    }

    fn transmit(&mut self) -> Result<()> {
        if self.outbound.is_empty() {
            return Ok(());
        }
        let result = self
            .outbound
            .encode(self.config.max_message_size)
            .and_then(|bytes| self.write_bytes(&bytes));
        self.outbound.clear();
        result
    }

    fn read_rx(&self) -> Result<Message> {
        let raw = self.rx.snapshot();
        trace_dump("rx", &raw);
        codec::parse_message(&raw, self.config.max_records)
    }

    pub(super) fn write_initial_message(&mut self) -> Result<()> {
        let records: Vec<Record> = self
            .services
            .iter()
            .map(|svc| codec::build_service_param_record(svc.param()))
            .collect();
        self.write_records(&records)
    }

    fn write_records(&mut self, records: &[Record]) -> Result<()> {
        let bytes = codec::encode(records, self.config.max_message_size)?;
        self.write_bytes(&bytes)
    }

    fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        let tx = self.tx.as_ref().ok_or(Error::IoUnavailable)?;
        trace_dump("tx", bytes);
        tx.write(bytes)
    }
}
