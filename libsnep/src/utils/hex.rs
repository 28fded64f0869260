// libsnep-rs/libsnep/src/utils/hex.rs

//! Hex formatting for trace logs.

use std::fmt::Write;

/// Number of bytes shown by `preview` before truncating.
pub const PREVIEW_LEN: usize = 32;

/// Lowercase hex with a space between bytes: `&[0xde, 0xad]` -> `"de ad"`.
pub fn bytes_to_hex_spaced(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i != 0 {
            s.push(' ');
        }
        // writing to a String cannot fail
        let _ = write!(&mut s, "{:02x}", b);
    }
    s
}

/// Spaced hex of at most `PREVIEW_LEN` bytes, with a suffix counting the
/// bytes left out. Fragments can be large; logs stay readable.
pub fn preview(bytes: &[u8]) -> String {
    if bytes.len() <= PREVIEW_LEN {
        return bytes_to_hex_spaced(bytes);
    }
    format!(
        "{} .. (+{} bytes)",
        bytes_to_hex_spaced(&bytes[..PREVIEW_LEN]),
        bytes.len() - PREVIEW_LEN
    )
}
