// libsnep-rs/libsnep/src/ndef/mod.rs

//! Minimal NDEF codec used to validate the payloads carried by SNEP and
//! NDEF Push messages.

pub mod message;
pub mod record;

pub use message::NdefMessage;
pub use record::{NdefRecord, RTD_TEXT, RTD_URI, Tnf};
