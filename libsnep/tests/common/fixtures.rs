// fixtures.rs — wire captures and canned messages shared by the tests

use libsnep::ndef::NdefMessage;

/// Text record "Lorem ipsum dolor sit amet." in language "la".
pub const SMALL_NDEF_HEX: &str =
    "d1011e54026c614c6f72656d20697073756d20646f6c6f722073697420616d65742e";

/// PUT request carrying the small NDEF message.
pub const SMALL_PUT_HEX: &str =
    "100200000022d1011e54026c614c6f72656d20697073756d20646f6c6f722073697420616d65742e";

/// GET request with acceptable length 1024 and the small NDEF message.
pub const SMALL_GET_HEX: &str =
    "10010000002600000400d1011e54026c614c6f72656d20697073756d20646f6c6f722073697420616d65742e";

pub fn bytes(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str).unwrap()
}

pub fn small_ndef() -> NdefMessage {
    libsnep::test_support::small_ndef()
}

pub fn large_ndef() -> NdefMessage {
    libsnep::test_support::large_ndef()
}

/// Control header: version 1.0, `field`, zero length.
pub fn header(field: u8) -> Vec<u8> {
    vec![0x10, field, 0x00, 0x00, 0x00, 0x00]
}
