// libsnep-rs/libsnep/src/client/snep.rs

use std::sync::Arc;

use log::{debug, warn};
use parking_lot::Mutex;

use crate::config::{ServiceTarget, SnepClientConfig};
use crate::messenger::SnepMessenger;
use crate::ndef::NdefMessage;
use crate::protocol::SnepMessage;
use crate::transport::{LlcpLink, LlcpSocket};
use crate::types::ConnectionState;
use crate::{Error, Result};

#[derive(Debug)]
struct Inner {
    state: ConnectionState,
    messenger: Option<Arc<SnepMessenger>>,
}

/// SNEP client bound to one LLCP link.
///
/// The connection state lock is held only briefly; a separate transmission
/// lock keeps PUT and GET exchanges from interleaving on the wire.
pub struct SnepClient {
    link: Arc<dyn LlcpLink>,
    config: SnepClientConfig,
    inner: Mutex<Inner>,
    transmission: Mutex<()>,
}

impl SnepClient {
    pub fn new(link: Arc<dyn LlcpLink>, config: SnepClientConfig) -> Self {
        Self {
            link,
            config,
            inner: Mutex::new(Inner {
                state: ConnectionState::Disconnected,
                messenger: None,
            }),
            transmission: Mutex::new(()),
        }
    }

    /// Configuration this client connects with.
    pub fn config(&self) -> &SnepClientConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.lock().state
    }

    /// Connect to the configured service and negotiate the fragment length.
    /// Fails with `Error::AlreadyInUse` unless currently disconnected.
    pub fn connect(&self) -> Result<()> {
        {
            let mut inner = self.inner.lock();
            if inner.state != ConnectionState::Disconnected {
                return Err(Error::AlreadyInUse);
            }
            inner.state = ConnectionState::Connecting;
        }

        match self.open() {
            Ok(messenger) => {
                let mut inner = self.inner.lock();
                inner.messenger = Some(Arc::new(messenger));
                inner.state = ConnectionState::Connected;
                Ok(())
            }
            Err(e) => {
                self.inner.lock().state = ConnectionState::Disconnected;
                Err(e)
            }
        }
    }

    fn open(&self) -> Result<SnepMessenger> {
        debug!("connecting to {}", self.config.target);
        let socket: Arc<dyn LlcpSocket> = match &self.config.target {
            ServiceTarget::Name(name) => self.link.connect_to_service(name, &self.config.socket)?,
            ServiceTarget::Sap(sap) => self.link.connect_to_sap(*sap, &self.config.socket)?,
        };

        let messenger = self
            .config
            .negotiate_fragment_length(socket.remote_miu())
            .and_then(|fragment_length| {
                debug!(
                    "remote miu {}, fragment length {}",
                    socket.remote_miu(),
                    fragment_length
                );
                SnepMessenger::new(
                    true,
                    socket.clone(),
                    fragment_length,
                    self.config.compliance,
                    self.config.receive_timeout,
                )
            });
        if messenger.is_err() {
            if let Err(e) = socket.close() {
                warn!("failed to close socket after connect error: {}", e);
            }
        }
        messenger
    }

    fn messenger(&self) -> Result<Arc<SnepMessenger>> {
        let inner = self.inner.lock();
        match (&inner.state, &inner.messenger) {
            (ConnectionState::Connected, Some(messenger)) => Ok(messenger.clone()),
            _ => Err(Error::NotConnected),
        }
    }

    /// Send a PUT request and wait for the server's reply.
    pub fn put(&self, ndef: NdefMessage) -> Result<SnepMessage> {
        let messenger = self.messenger()?;
        let _tx = self.transmission.lock();
        messenger.send_message(&SnepMessage::put_request(ndef))?;
        messenger.get_message()
    }

    /// Send a GET request carrying the configured acceptable length.
    pub fn get(&self, ndef: NdefMessage) -> Result<SnepMessage> {
        let messenger = self.messenger()?;
        let _tx = self.transmission.lock();
        messenger.send_message(&SnepMessage::get_request(self.config.acceptable_length, ndef))?;
        messenger.get_message()
    }

    /// Close the connection. Close failures are logged and swallowed.
    pub fn close(&self) {
        let messenger = {
            let mut inner = self.inner.lock();
            inner.state = ConnectionState::Disconnected;
            inner.messenger.take()
        };
        if let Some(messenger) = messenger {
            if let Err(e) = messenger.close() {
                warn!("failed to close snep client socket: {}", e);
            }
        }
    }
}

impl Drop for SnepClient {
    fn drop(&mut self) {
        self.close();
    }
}
