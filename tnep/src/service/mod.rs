// tnep/src/service/mod.rs

use std::fmt;

use crate::types::{ServiceParam, Status, Uri};
use crate::Error;

mod registry;
pub use registry::ServiceRegistry;

/// Application callbacks of one TNEP service.
///
/// The engines call at most one of these per dispatched signal and never
/// from inside another callback. All methods have empty defaults.
pub trait ServiceHandler: Send {
    /// The service became active. On the tag role the returned status is
    /// written back to the reader.
    fn selected(&mut self) -> Status {
        Status::SUCCESS
    }

    fn deselected(&mut self) {}

    /// A new message arrived from the peer while the service is active.
    fn message_received(&mut self, _message: &[u8]) {}

    /// The waiting-time budget ran out without a peer response.
    fn timeout(&mut self) {}

    fn error_detected(&mut self, _error: &Error) {}
}

/// Handler that ignores every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl ServiceHandler for NoopHandler {}

/// One registered TNEP service.
pub struct Service {
    param: ServiceParam,
    available: bool,
    handler: Box<dyn ServiceHandler>,
}

impl Service {
    pub fn new(param: ServiceParam, handler: Box<dyn ServiceHandler>) -> Self {
        Self {
            param,
            available: false,
            handler,
        }
    }

    pub fn uri(&self) -> &Uri {
        &self.param.uri
    }

    pub fn param(&self) -> &ServiceParam {
        &self.param
    }

    /// Present in the most recently parsed discovery message.
    pub fn is_available(&self) -> bool {
        self.available
    }

    pub(crate) fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub(crate) fn handler_mut(&mut self) -> &mut dyn ServiceHandler {
        &mut *self.handler
    }

    /// Take over mode and timing codes advertised by the tag.
    pub(crate) fn update_from(&mut self, advertised: &ServiceParam) {
        self.param.communication_mode = advertised.communication_mode;
        self.param.min_waiting_time = advertised.min_waiting_time;
        self.param.max_waiting_time_ext = advertised.max_waiting_time_ext;
        self.param.max_message_size = advertised.max_message_size;
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("param", &self.param)
            .field("available", &self.available)
            .finish_non_exhaustive()
    }
}
