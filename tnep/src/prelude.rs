// tnep/src/prelude.rs

pub use crate::buffer::NdefBuffer;
pub use crate::config::{EngineConfig, EngineConfigBuilder};
pub use crate::poller::Poller;
pub use crate::protocol::{Message, Record};
pub use crate::service::{NoopHandler, Service, ServiceHandler, ServiceRegistry};
pub use crate::signal::{ServiceSignal, Signal, Signaller};
pub use crate::tag::{RxIndicator, Tag};
pub use crate::timer::{TimerEvent, WaitTiming};
pub use crate::transport::{BufferWriter, MockTransport, NfcWrite};
pub use crate::{CommunicationMode, Error, Result, ServiceParam, State, Status, Uri};

pub use crate::utils::{bytes_to_hex_spaced, default_process_timeout, ms};
