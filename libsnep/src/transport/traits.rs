// libsnep-rs/libsnep/src/transport/traits.rs

use std::sync::Arc;
use std::time::Duration;

use crate::Result;
use crate::config::SocketOptions;

/// Connection-oriented LLCP data link. The SNEP layer treats it as a
/// reliable, ordered stream of PDUs.
///
/// Methods take `&self` so one thread can close a socket while another is
/// blocked receiving on it; implementations synchronise internally.
pub trait LlcpSocket: Send + Sync {
    /// Send one PDU to the peer.
    fn send(&self, data: &[u8]) -> Result<()>;

    /// Receive up to `max_len` bytes. Blocks until data arrives, the
    /// deadline elapses (`Error::Timeout`), or the socket is closed on
    /// either side (`Error::ConnectionClosed`).
    fn receive(&self, max_len: usize, timeout: Option<Duration>) -> Result<Vec<u8>>;

    /// MIU advertised by the peer.
    fn remote_miu(&self) -> usize;

    /// MIU this side advertised.
    fn local_miu(&self) -> usize;

    /// Close the socket. Calling it again is a no-op.
    fn close(&self) -> Result<()>;
}

/// Listening socket bound to a SAP and service name.
pub trait LlcpServerSocket: Send + Sync {
    /// Block until a peer connects. Fails with `Error::ConnectionClosed`
    /// once the listener has been closed.
    fn accept(&self) -> Result<Arc<dyn LlcpSocket>>;

    fn close(&self) -> Result<()>;
}

/// Entry point to an activated LLCP link: creates client connections and
/// listening sockets.
pub trait LlcpLink: Send + Sync {
    fn connect_to_service(
        &self,
        service_name: &str,
        options: &SocketOptions,
    ) -> Result<Arc<dyn LlcpSocket>>;

    fn connect_to_sap(&self, sap: u8, options: &SocketOptions) -> Result<Arc<dyn LlcpSocket>>;

    fn listen(
        &self,
        sap: u8,
        service_name: &str,
        options: &SocketOptions,
    ) -> Result<Arc<dyn LlcpServerSocket>>;
}
