// tnep/src/tag/mod.rs

//! TNEP tag device role.
//!
//! The tag serves its NDEF message from a registered TX buffer. When the
//! reader finishes an NDEF write the transport calls
//! [`Tag::rx_msg_indicate`] (or writes through an [`RxIndicator`]); the
//! state machine then reacts inside [`Tag::process`].

use std::sync::Arc;

use log::debug;

use crate::buffer::NdefBuffer;
use crate::config::EngineConfig;
use crate::protocol::{Message, Record, codec};
use crate::service::{Service, ServiceRegistry};
use crate::signal::{self, Signal, Signaller, Signals};
use crate::timer::ProtocolTimer;
use crate::transport::NfcWrite;
use crate::types::{State, Status};
use crate::{Error, Result};

mod machine;

/// TNEP engine for the tag side of an exchange.
pub struct Tag {
    config: EngineConfig,
    state: State,
    services: ServiceRegistry,
    active: Option<usize>,
    tx: Option<NdefBuffer>,
    /// Copy of the message the reader wrote last
    rx: NdefBuffer,
    outbound: Message,
    signals: Arc<Signals>,
    timer: ProtocolTimer,
}

impl Default for Tag {
    fn default() -> Self {
        Self::new()
    }
}

impl Tag {
    /// Disabled tag with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Disabled tag with record limits and wait bounds from `config`.
    pub fn with_config(config: EngineConfig) -> Self {
        let outbound = Message::with_capacity(config.max_records);
        let rx = NdefBuffer::new(config.max_message_size);
        Self {
            config,
            state: State::Disabled,
            services: ServiceRegistry::default(),
            active: None,
            tx: None,
            rx,
            outbound,
            signals: Arc::new(Signals::new()),
            timer: ProtocolTimer::default(),
        }
    }

    /// Register the NDEF area the transport serves to the reader.
    pub fn register_tx_buffer(&mut self, tx: NdefBuffer) -> Result<()> {
        if tx.capacity() == 0 {
            return Err(Error::InvalidArgument("tx buffer has no capacity".into()));
        }
        self.tx = Some(tx);
        Ok(())
    }

    /// Take over the service table, publish the initial message and enter
    /// Service Ready.
    pub fn init(&mut self, services: Vec<Service>) -> Result<()> {
        if self.state != State::Disabled {
            debug!("tnep already running");
            return Err(Error::AlreadyRunning);
        }
        let mut registry = ServiceRegistry::new(services)?;
        if self.tx.is_none() {
            debug!("no tx buffer registered");
            return Err(Error::IoUnavailable);
        }

        registry.mark_all_available();
        self.services = registry;
        self.active = None;
        self.outbound.clear();
        self.signals.clear();
        self.timer.stop();
        self.write_initial_message()?;
        self.state = State::ServiceReady;
        debug!("tag initialised with {} services", self.services.len());
        Ok(())
    }

    /// Return to Disabled and hand the service table back.
    pub fn uninit(&mut self) -> Vec<Service> {
        self.services.reset_availability();
        self.active = None;
        self.tx = None;
        self.rx.clear();
        self.outbound.clear();
        self.signals.clear();
        self.timer.stop();
        self.state = State::Disabled;
        std::mem::take(&mut self.services).into_inner()
    }

    /// The reader finished an NDEF write of `message`.
    pub fn rx_msg_indicate(&self, message: &[u8]) -> Result<()> {
        self.rx.write(message)?;
        self.signals.raise(Signal::MessageRx);
        Ok(())
    }

    /// Handle for the transport to deliver reader writes from elsewhere.
    pub fn indicator(&self) -> Result<RxIndicator> {
        let area = self.tx.clone().ok_or(Error::IoUnavailable)?;
        Ok(RxIndicator {
            area,
            rx: self.rx.clone(),
            signals: Signaller::new(self.signals.clone()),
        })
    }

    /// Queue an application record for the next response.
    pub fn tx_msg_app_data(&mut self, record: Record) -> Result<()> {
        if self.state == State::Disabled {
            return Err(Error::NotRunning);
        }
        self.outbound.push(record)?;
        self.signals.raise(Signal::MessageTx);
        Ok(())
    }

    /// No more application data: answer with a single success Status record.
    pub fn tx_msg_no_app_data(&mut self) -> Result<()> {
        if self.state == State::Disabled {
            return Err(Error::NotRunning);
        }
        self.outbound.clear();
        self.outbound
            .push(codec::build_status_record(Status::SUCCESS))?;
        self.signals.raise(Signal::MessageTx);
        Ok(())
    }

    /// Wait for pending signals and run the state machine once per signal.
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

    /// Index of the selected service.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Services announced in the initial message.
    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }
}

/// Write primitive representing the reader side of the tag's NDEF area:
/// each write replaces the area content and indicates the new message to
/// the tag, like an NDEF write procedure on an emulated tag.
#[derive(Debug, Clone)]
pub struct RxIndicator {
    area: NdefBuffer,
    rx: NdefBuffer,
    signals: Signaller,
}

impl NfcWrite for RxIndicator {
    fn write(&mut self, message: &[u8]) -> Result<()> {
        self.area.write(message)?;
        self.rx.write(message)?;
        self.signals.raise(Signal::MessageRx);
        Ok(())
    }
}
