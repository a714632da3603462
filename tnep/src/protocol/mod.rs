// tnep/src/protocol/mod.rs

pub mod codec;
pub mod ndef;
pub mod parser;
pub mod records;

pub use ndef::{Message, Record, TNF};
