// tnep/src/poller/mod.rs

//! TNEP reader/writer (poller) role.
//!
//! The host registers the RX buffer holding the tag's NDEF message, hands
//! over its service table and write primitive with [`Poller::init`], and
//! then calls [`Poller::process`] from its main loop. Every call performs one
//! bounded wait and dispatches each pending signal exactly once.

use std::sync::Arc;

use log::debug;

use crate::buffer::NdefBuffer;
use crate::config::EngineConfig;
use crate::protocol::{Message, Record};
use crate::service::{Service, ServiceRegistry};
use crate::signal::{self, ServiceSignal, Signal, Signaller, Signals};
use crate::timer::ProtocolTimer;
use crate::transport::NfcWrite;
use crate::types::State;
use crate::{Error, Result};

mod machine;

/// TNEP engine for the reader/writer side of an exchange.
pub struct Poller {
    config: EngineConfig,
    state: State,
    services: ServiceRegistry,
    active: Option<usize>,
    writer: Option<Box<dyn NfcWrite>>,
    rx: Option<NdefBuffer>,
    /// Last message handed to the write primitive
    tx: Vec<u8>,
    outbound: Message,
    signals: Arc<Signals>,
    timer: ProtocolTimer,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new()
    }
}

impl Poller {
    /// Disabled poller with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Disabled poller with record limits and wait bounds from `config`.
    pub fn with_config(config: EngineConfig) -> Self {
        let outbound = Message::with_capacity(config.max_records);
        Self {
            config,
            state: State::Disabled,
            services: ServiceRegistry::default(),
            active: None,
            writer: None,
            rx: None,
            tx: Vec::new(),
            outbound,
            signals: Arc::new(Signals::new()),
            timer: ProtocolTimer::default(),
        }
    }

    /// Register the buffer the transport fills with the tag's NDEF message.
    pub fn register_rx_buffer(&mut self, rx: NdefBuffer) -> Result<()> {
        if rx.capacity() == 0 {
            debug!("invalid rx buffer");
            return Err(Error::InvalidArgument("rx buffer has no capacity".into()));
        }
        self.rx = Some(rx);
        Ok(())
    }

    /// Take over the service table and write primitive and enter
    /// Service Ready.
    pub fn init(
        &mut self,
        services: Vec<Service>,
        writer: Option<Box<dyn NfcWrite>>,
    ) -> Result<()> {
        if self.state != State::Disabled {
            debug!("tnep already running");
            return Err(Error::AlreadyRunning);
        }
        let registry = ServiceRegistry::new(services)?;
        let writer = writer.ok_or_else(|| {
            debug!("no write function");
            Error::IoUnavailable
        })?;

        self.services = registry;
        self.writer = Some(writer);
        self.active = None;
        self.outbound.clear();
        self.signals.clear();
        self.timer.stop();
        self.state = State::ServiceReady;
        debug!("poller initialised with {} services", self.services.len());
        Ok(())
    }

    /// Return to Disabled, dropping buffers, the writer and queued records.
    /// The service table is handed back with every service unavailable;
    /// calling it again returns an empty table.
    pub fn uninit(&mut self) -> Vec<Service> {
        self.services.reset_availability();
        self.active = None;
        self.writer = None;
        self.rx = None;
        self.tx.clear();
        self.outbound.clear();
        self.signals.clear();
        self.timer.stop();
        self.state = State::Disabled;
        std::mem::take(&mut self.services).into_inner()
    }

    /// Request selection of the service at `index`. Selection completes
    /// asynchronously once the tag answers with a success status.
    pub fn select_service(&mut self, index: usize) -> Result<()> {
        if self.state == State::Disabled {
            return Err(Error::NotRunning);
        }
        if self.active.is_some() {
            debug!("deselect service before selecting new one");
            return Err(Error::PermissionDenied);
        }
        if index >= self.services.len() {
            return Err(Error::InvalidArgument(format!(
                "service index {} out of range ({} services)",
                index,
                self.services.len()
            )));
        }
        self.signals
            .raise(Signal::Service(ServiceSignal::Select(index)));
        Ok(())
    }

    /// Request deselection. Safe to call in any state; it is a no-op
    /// when nothing is selected.
    pub fn deselect_service(&self) {
        self.signals.raise(Signal::Service(ServiceSignal::Deselect));
    }

    /// Queue an application record for the next outbound message.
    pub fn send(&mut self, record: Record) -> Result<()> {
        if self.state == State::Disabled {
            return Err(Error::NotRunning);
        }
        self.outbound.push(record).inspect_err(|e| {
            debug!("couldn't add tx record: {}", e);
        })?;
        self.signals.raise(Signal::MessageTx);
        Ok(())
    }

    /// Wait for pending signals and run the state machine once per signal.
    /// Returns `Error::Timeout` when nothing happened within the bounded wait.
    pub fn process(&mut self) -> Result<()> {
        if self.state == State::Disabled {
            return Err(Error::NotRunning);
        }
        let pending =
            signal::next_signals(&self.signals, &mut self.timer, self.config.process_timeout());
        if pending.is_empty() {
            return Err(Error::Timeout);
        }
        for sig in pending {
            self.step(sig);
        }
        Ok(())
    }

    /// Current protocol state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Index of the selected or pending service.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Service at [`Poller::active_index`].
    pub fn active_service(&self) -> Option<&Service> {
        self.active.and_then(|idx| self.services.lookup(idx).ok())
    }

    /// Service table, with availability from the last initial message.
    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Last message handed to the write primitive.
    pub fn last_tx(&self) -> &[u8] {
        &self.tx
    }

    /// Records queued for the next outbound message.
    pub fn queued(&self) -> &Message {
        &self.outbound
    }

    /// Handle for raising deselect / outbound-ready from other threads.
    pub fn signaller(&self) -> Signaller {
        Signaller::new(self.signals.clone())
    }
}
