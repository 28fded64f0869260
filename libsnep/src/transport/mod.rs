// libsnep-rs/libsnep/src/transport/mod.rs

pub mod mock;
pub mod traits;

pub use mock::{MockLlcpLink, MockLlcpServerSocket, MockLlcpSocket};
pub use traits::{LlcpLink, LlcpServerSocket, LlcpSocket};
