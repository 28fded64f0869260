// libsnep-rs/libsnep/src/server/npp.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, error, warn};

use crate::config::NdefPushServerConfig;
use crate::constants::NPP_RECEIVE_CHUNK;
use crate::ndef::NdefMessage;
use crate::protocol::NdefPushProtocol;
use crate::server::acceptor::Acceptor;
use crate::transport::{LlcpLink, LlcpSocket};
use crate::{Error, Result};

/// Receives the IMMEDIATE message of every pushed envelope.
pub trait NdefPushCallback: Send + Sync {
    fn on_message_received(&self, msg: NdefMessage);
}

/// Legacy NDEF Push server. Each connection is read until the peer closes,
/// then parsed as one envelope whose IMMEDIATE message is delivered.
pub struct NdefPushServer {
    config: NdefPushServerConfig,
    callback: Arc<dyn NdefPushCallback>,
    acceptor: Acceptor,
}

impl NdefPushServer {
    pub fn new(
        link: Arc<dyn LlcpLink>,
        config: NdefPushServerConfig,
        callback: Arc<dyn NdefPushCallback>,
    ) -> Self {
        let acceptor = Acceptor::new("npp", link, config.sap, &config.service_name, config.socket);
        Self {
            config,
            callback,
            acceptor,
        }
    }

    pub fn start(&self) -> Result<()> {
        let callback = self.callback.clone();
        let timeout = self.config.receive_timeout;
        let max_len = self.config.max_envelope_len;
        self.acceptor.start(Arc::new(
            move |socket: Arc<dyn LlcpSocket>, running: &AtomicBool| {
                let result = read_envelope(socket.as_ref(), timeout, max_len);
                if let Err(e) = socket.close() {
                    warn!("failed to close ndef push socket: {}", e);
                }
                if !running.load(Ordering::SeqCst) {
                    debug!("server stopping, dropping ndef push data");
                    return;
                }
                match result.and_then(|data| NdefPushProtocol::from_bytes(&data)) {
                    Ok(envelope) => match envelope.immediate() {
                        Some(msg) => callback.on_message_received(msg.clone()),
                        None => warn!("ndef push envelope without immediate message"),
                    },
                    Err(e) => error!("badly formatted ndef push message, ignoring: {}", e),
                }
            },
        ))
    }

    pub fn stop(&self) {
        self.acceptor.stop();
    }

    pub fn is_running(&self) -> bool {
        self.acceptor.is_running()
    }

    pub fn session_count(&self) -> usize {
        self.acceptor.session_count()
    }
}

impl Drop for NdefPushServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Accumulate everything the peer sends until it closes the connection.
/// Fails with `Error::Format` once more than `max_len` bytes arrived.
fn read_envelope(
    socket: &dyn LlcpSocket,
    timeout: Option<Duration>,
    max_len: usize,
) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(NPP_RECEIVE_CHUNK.min(max_len));
    loop {
        match socket.receive(NPP_RECEIVE_CHUNK, timeout) {
            Ok(chunk) => {
                debug!("read {} bytes", chunk.len());
                if buffer.len() + chunk.len() > max_len {
                    return Err(Error::Format(format!(
                        "ndef push envelope exceeds {} bytes",
                        max_len
                    )));
                }
                buffer.extend_from_slice(&chunk);
            }
            Err(Error::ConnectionClosed) => return Ok(buffer),
            Err(e) => return Err(e),
        }
    }
}
