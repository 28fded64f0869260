// libsnep-rs/libsnep/src/lib.rs

//! libsnep
//!
//! Pure Rust SNEP (Simple NDEF Exchange Protocol) and legacy NDEF Push
//! message layer for NFC peer-to-peer links. The LLCP link itself is
//! consumed through the traits in `transport`.

pub mod client;
pub mod compliance;
pub mod config;
pub mod constants;
pub mod error;
pub mod messenger;
pub mod ndef;
pub mod prelude;
pub mod protocol;
pub mod server;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`
// and the newtypes in `types` are available everywhere.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
