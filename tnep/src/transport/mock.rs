// tnep/src/transport/mock.rs

use std::sync::{Arc, Mutex, MutexGuard};

use crate::buffer::NdefBuffer;
use crate::transport::traits::NfcWrite;
use crate::{Error, Result};

/// Mock transport for tests. Clones share state, so a test can keep one
/// handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    sent: Vec<Vec<u8>>,
    /// Number of subsequent writes that should fail with an io error
    write_failures: usize,
    /// When set, every successful write is copied here (RX == TX loopback)
    echo: Option<NdefBuffer>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that copies each written message into `rx`, mirroring a tag
    /// memory that reflects the last NDEF write.
    pub fn echoing(rx: NdefBuffer) -> Self {
        let mock = Self::new();
        mock.state().echo = Some(rx);
        mock
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Set how many subsequent writes should fail (for tests).
    pub fn set_write_failures(&self, n: usize) {
        self.state().write_failures = n;
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state().sent.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.state().sent.len()
    }

    pub fn last_sent(&self) -> Option<Vec<u8>> {
        self.state().sent.last().cloned()
    }

    pub fn pop_sent(&self) -> Option<Vec<u8>> {
        self.state().sent.pop()
    }

    pub fn clear(&self) {
        self.state().sent.clear();
    }
}

impl NfcWrite for MockTransport {
    fn write(&mut self, message: &[u8]) -> Result<()> {
        let mut state = self.state();
        if state.write_failures > 0 {
            state.write_failures -= 1;
            return Err(Error::Io("mock write failure".into()));
        }
        state.sent.push(message.to_vec());
        if let Some(echo) = &state.echo {
            echo.write(message)?;
        }
        Ok(())
    }
}
