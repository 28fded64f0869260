// libsnep-rs/libsnep/src/utils/mod.rs

//! Small helpers shared across the crate: hex previews for log output and
//! receive deadlines.

pub mod hex;
pub mod timeout;

pub use hex::*;
pub use timeout::*;
