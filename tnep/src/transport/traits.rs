// tnep/src/transport/traits.rs

use crate::buffer::NdefBuffer;
use crate::Result;

/// Write primitive of the NFC transport: hands one encoded NDEF message to
/// the tag. Calls are synchronous and are never retried by the engine.
pub trait NfcWrite: Send {
    fn write(&mut self, message: &[u8]) -> Result<()>;
}

impl<F> NfcWrite for F
where
    F: FnMut(&[u8]) -> Result<()> + Send,
{
    fn write(&mut self, message: &[u8]) -> Result<()> {
        self(message)
    }
}

/// Writer that copies every message into a shared buffer, the way a tag
/// emulated in local memory would store it.
#[derive(Debug, Clone)]
pub struct BufferWriter {
    target: NdefBuffer,
}

impl BufferWriter {
    pub fn new(target: NdefBuffer) -> Self {
        Self { target }
    }
}

impl NfcWrite for BufferWriter {
    fn write(&mut self, message: &[u8]) -> Result<()> {
        self.target.write(message)
    }
}
