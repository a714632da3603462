// tnep/src/buffer.rs

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{Error, Result};

/// Shared NDEF message buffer with a fixed capacity.
///
/// The poller reads its RX buffer through one of these while the
/// transport (or a test) writes into it; the tag role writes its
/// outgoing message into one for the transport to serve.
#[derive(Debug, Clone, Default)]
pub struct NdefBuffer {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    data: Vec<u8>,
    capacity: usize,
}

impl NdefBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                data: Vec::with_capacity(capacity),
                capacity,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity
    }

    pub fn len(&self) -> usize {
        self.lock().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().data.is_empty()
    }

    /// Replace the content with `data`.
    pub fn write(&self, data: &[u8]) -> Result<()> {
        let mut inner = self.lock();
        if data.len() > inner.capacity {
            return Err(Error::ShortBuffer {
                expected: data.len(),
                actual: inner.capacity,
            });
        }
        inner.data.clear();
        inner.data.extend_from_slice(data);
        Ok(())
    }

    pub fn clear(&self) {
        self.lock().data.clear();
    }

    pub fn snapshot(&self) -> Vec<u8> {
        self.lock().data.clone()
    }

    /// Byte-for-byte comparison without copying the content out.
    pub fn content_eq(&self, other: &[u8]) -> bool {
        self.lock().data == other
    }
}
