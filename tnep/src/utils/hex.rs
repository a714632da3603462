//! Hex formatting for log lines and diagnostic buffer dumps.

use std::fmt::Write;

/// Longest prefix of a buffer printed by `hex_preview`.
pub const PREVIEW_LEN: usize = 32;

/// Lowercase hex with a single space between bytes.
///
/// Example: `&[0xd1, 0x02]` -> `"d1 02"`
pub fn bytes_to_hex_spaced(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i != 0 {
            s.push(' ');
        }
        // write! never fails writing to a String
        let _ = write!(&mut s, "{:02x}", b);
    }
    s
}

/// Spaced hex of at most `PREVIEW_LEN` bytes, followed by the total length
/// when the buffer was cut.
pub fn hex_preview(bytes: &[u8]) -> String {
    if bytes.len() <= PREVIEW_LEN {
        return bytes_to_hex_spaced(bytes);
    }
    let mut s = bytes_to_hex_spaced(&bytes[..PREVIEW_LEN]);
    let _ = write!(&mut s, " .. ({} bytes)", bytes.len());
    s
}

/// Trace-level dump of a message buffer, compiled in with `diagnostics`.
#[cfg(feature = "diagnostics")]
pub fn trace_dump(label: &str, bytes: &[u8]) {
    log::trace!("{}: {}", label, hex_preview(bytes));
}

#[cfg(not(feature = "diagnostics"))]
pub fn trace_dump(_label: &str, _bytes: &[u8]) {}
