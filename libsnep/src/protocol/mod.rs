// libsnep-rs/libsnep/src/protocol/mod.rs

pub mod npp;
pub mod parser;
pub mod snep;

pub use npp::NdefPushProtocol;
pub use snep::SnepMessage;
