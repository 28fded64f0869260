// libsnep-rs/libsnep/src/server/snep.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use crate::compliance::ComplianceProfile;
use crate::config::SnepServerConfig;
use crate::messenger::SnepMessenger;
use crate::ndef::NdefMessage;
use crate::protocol::SnepMessage;
use crate::server::acceptor::Acceptor;
use crate::transport::{LlcpLink, LlcpSocket};
use crate::types::Field;
use crate::{Error, Result};

/// Application hooks of a SNEP server. Each returns the complete response
/// message to send back.
pub trait SnepCallback: Send + Sync {
    fn do_put(&self, msg: Option<NdefMessage>) -> SnepMessage;

    fn do_get(&self, acceptable_length: u32, msg: Option<NdefMessage>) -> SnepMessage;
}

/// Read one request from `messenger`, dispatch it and send the response.
///
/// Returns `Ok(false)` when the session should end: the request could not
/// be decoded (answered with BAD_REQUEST) or carried an unsupported major
/// version (answered with UNSUPPORTED_VERSION). Transport errors are
/// returned as-is.
pub fn handle_request(
    messenger: &SnepMessenger,
    callback: &dyn SnepCallback,
    profile: ComplianceProfile,
) -> Result<bool> {
    let request = match messenger.get_message() {
        Ok(request) => request,
        Err(Error::Format(reason)) => {
            warn!("bad snep request: {}", reason);
            if let Err(e) = messenger.send_message(&SnepMessage::message(Field::RESPONSE_BAD_REQUEST)) {
                debug!("failed to send BAD_REQUEST: {}", e);
            }
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    if !request.version().is_compatible() {
        debug!("unsupported version {}, ending session", request.version());
        messenger.send_message(&SnepMessage::message(Field::RESPONSE_UNSUPPORTED_VERSION))?;
        return Ok(false);
    }

    let response = if profile.refuses_length(false, request.length()) {
        debug!("refusing request length {}", request.length());
        SnepMessage::message(Field::RESPONSE_REJECT)
    } else {
        match request.field() {
            Field::REQUEST_GET => {
                let acceptable_length = request.acceptable_length()?;
                callback.do_get(acceptable_length, request.into_ndef_message())
            }
            Field::REQUEST_PUT => {
                debug!("put request, {} bytes", request.length());
                callback.do_put(request.into_ndef_message())
            }
            other => {
                debug!("unknown request {}", other);
                SnepMessage::message(Field::RESPONSE_BAD_REQUEST)
            }
        }
    };

    messenger.send_message(&response)?;
    Ok(true)
}

/// SNEP server: one accept loop plus one handler thread per connection.
pub struct SnepServer {
    config: SnepServerConfig,
    callback: Arc<dyn SnepCallback>,
    acceptor: Acceptor,
}

impl SnepServer {
    pub fn new(link: Arc<dyn LlcpLink>, config: SnepServerConfig, callback: Arc<dyn SnepCallback>) -> Self {
        let acceptor = Acceptor::new("snep", link, config.sap, &config.service_name, config.socket);
        Self {
            config,
            callback,
            acceptor,
        }
    }

    /// Configuration the server listens with.
    pub fn config(&self) -> &SnepServerConfig {
        &self.config
    }

    /// Bind the service and start accepting connections.
    pub fn start(&self) -> Result<()> {
        let config = self.config.clone();
        let callback = self.callback.clone();
        self.acceptor.start(Arc::new(move |socket: Arc<dyn LlcpSocket>, running: &AtomicBool| {
            serve_connection(&config, callback.as_ref(), socket, running)
        }))
    }

    /// Stop accepting and tear down every live session.
    pub fn stop(&self) {
        self.acceptor.stop();
    }

    pub fn is_running(&self) -> bool {
        self.acceptor.is_running()
    }

    /// Number of connections currently being served.
    pub fn session_count(&self) -> usize {
        self.acceptor.session_count()
    }
}

impl Drop for SnepServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn serve_connection(
    config: &SnepServerConfig,
    callback: &dyn SnepCallback,
    socket: Arc<dyn LlcpSocket>,
    running: &AtomicBool,
) {
    let messenger = config
        .negotiate_fragment_length(socket.remote_miu())
        .and_then(|fragment_length| {
            debug!("session fragment length {}", fragment_length);
            SnepMessenger::new(
                false,
                socket.clone(),
                fragment_length,
                config.compliance,
                config.receive_timeout,
            )
        });

    match messenger {
        Ok(messenger) => {
            while running.load(Ordering::SeqCst) {
                match handle_request(&messenger, callback, config.compliance) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => {
                        debug!("snep session ended: {}", e);
                        break;
                    }
                }
            }
        }
        Err(e) => warn!("cannot serve snep connection: {}", e),
    }

    if let Err(e) = socket.close() {
        warn!("failed to close snep session socket: {}", e);
    }
}
