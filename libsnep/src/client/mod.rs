// libsnep-rs/libsnep/src/client/mod.rs

//! Request-issuing side: SNEP client, legacy NDEF Push client and the DTA
//! conformance client driver.

pub mod dta;
pub mod npp;
pub mod snep;

pub use npp::NdefPushClient;
pub use snep::SnepClient;
