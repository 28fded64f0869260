// libsnep-rs/libsnep/src/client/npp.rs

use std::sync::Arc;

use log::{debug, trace, warn};
use parking_lot::Mutex;

use crate::config::NdefPushClientConfig;
use crate::ndef::NdefMessage;
use crate::protocol::NdefPushProtocol;
use crate::transport::{LlcpLink, LlcpSocket};
use crate::types::{Action, ConnectionState};
use crate::utils::preview;
use crate::{Error, Result};

struct Inner {
    state: ConnectionState,
    socket: Option<Arc<dyn LlcpSocket>>,
}

/// Legacy NDEF Push client. One connection carries exactly one push; the
/// socket is closed afterwards whether the push succeeded or not.
pub struct NdefPushClient {
    link: Arc<dyn LlcpLink>,
    config: NdefPushClientConfig,
    inner: Mutex<Inner>,
}

impl NdefPushClient {
    pub fn new(link: Arc<dyn LlcpLink>, config: NdefPushClientConfig) -> Self {
        Self {
            link,
            config,
            inner: Mutex::new(Inner {
                state: ConnectionState::Disconnected,
                socket: None,
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.lock().state
    }

    pub fn connect(&self) -> Result<()> {
        {
            let mut inner = self.inner.lock();
            if inner.state != ConnectionState::Disconnected {
                return Err(Error::AlreadyInUse);
            }
            inner.state = ConnectionState::Connecting;
        }

        debug!("connecting to service {}", self.config.service_name);
        match self
            .link
            .connect_to_service(&self.config.service_name, &self.config.socket)
        {
            Ok(socket) => {
                let mut inner = self.inner.lock();
                inner.socket = Some(socket);
                inner.state = ConnectionState::Connected;
                Ok(())
            }
            Err(e) => {
                self.inner.lock().state = ConnectionState::Disconnected;
                Err(e)
            }
        }
    }

    /// Push `msg` as a single IMMEDIATE entry, streamed in remote-MIU sized
    /// chunks. There is no acknowledgement in this protocol.
    pub fn push(&self, msg: NdefMessage) -> Result<()> {
        let socket = {
            let mut inner = self.inner.lock();
            if inner.state != ConnectionState::Connected {
                return Err(Error::NotConnected);
            }
            inner.state = ConnectionState::Disconnected;
            inner.socket.take().ok_or(Error::NotConnected)?
        };

        let result = send_chunked(socket.as_ref(), &NdefPushProtocol::new(msg, Action::IMMEDIATE).to_bytes());
        if let Err(e) = socket.close() {
            warn!("failed to close ndef push socket: {}", e);
        }
        result
    }

    pub fn close(&self) {
        let socket = {
            let mut inner = self.inner.lock();
            inner.state = ConnectionState::Disconnected;
            inner.socket.take()
        };
        if let Some(socket) = socket {
            if let Err(e) = socket.close() {
                warn!("failed to close ndef push socket: {}", e);
            }
        }
    }
}

fn send_chunked(socket: &dyn LlcpSocket, buffer: &[u8]) -> Result<()> {
    let miu = socket.remote_miu();
    if miu == 0 {
        return Err(Error::InvalidArgument("remote miu is zero".into()));
    }
    debug!("pushing {} bytes in chunks of {}", buffer.len(), miu);
    for chunk in buffer.chunks(miu) {
        trace!("-> [{}] {}", chunk.len(), preview(chunk));
        socket.send(chunk)?;
    }
    Ok(())
}
