// libsnep-rs/libsnep/src/server/acceptor.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use log::{debug, error, warn};
use parking_lot::Mutex;

use crate::config::SocketOptions;
use crate::server::session::SessionRegistry;
use crate::transport::{LlcpLink, LlcpServerSocket, LlcpSocket};
use crate::{Error, Result};

/// Runs for every accepted connection on that session's own thread.
pub(crate) type ConnectionHandler = Arc<dyn Fn(Arc<dyn LlcpSocket>, &AtomicBool) + Send + Sync>;

type ListenerSlot = Arc<Mutex<Option<Arc<dyn LlcpServerSocket>>>>;

/// Listening half shared by the SNEP and NDEF Push servers: binds the
/// service, accepts connections on a background thread and hands each one
/// to a tracked session thread.
pub(crate) struct Acceptor {
    label: &'static str,
    link: Arc<dyn LlcpLink>,
    sap: u8,
    service_name: String,
    options: SocketOptions,
    running: Arc<AtomicBool>,
    listener: ListenerSlot,
    thread: Mutex<Option<JoinHandle<()>>>,
    sessions: Arc<SessionRegistry>,
}

impl Acceptor {
    pub(crate) fn new(
        label: &'static str,
        link: Arc<dyn LlcpLink>,
        sap: u8,
        service_name: &str,
        options: SocketOptions,
    ) -> Self {
        Self {
            label,
            link,
            sap,
            service_name: service_name.to_string(),
            options,
            running: Arc::new(AtomicBool::new(false)),
            listener: Arc::new(Mutex::new(None)),
            thread: Mutex::new(None),
            sessions: SessionRegistry::new(),
        }
    }

    /// Bind the service and start accepting. The listen error is returned
    /// to the caller; calling this while running is a no-op.
    pub(crate) fn start(&self, handler: ConnectionHandler) -> Result<()> {
        let mut thread = self.thread.lock();
        if let Some(handle) = thread.take() {
            if self.is_running() {
                *thread = Some(handle);
                return Ok(());
            }
            // acceptor gave up after a failed re-listen
            if handle.join().is_err() {
                error!("{} acceptor panicked", self.label);
            }
        }

        let server_socket = self
            .link
            .listen(self.sap, &self.service_name, &self.options)?;
        debug!(
            "{} listening on sap {} ({})",
            self.label, self.sap, self.service_name
        );
        *self.listener.lock() = Some(server_socket);
        self.running.store(true, Ordering::SeqCst);

        let accept_loop = AcceptLoop {
            label: self.label,
            link: self.link.clone(),
            sap: self.sap,
            service_name: self.service_name.clone(),
            options: self.options,
            running: self.running.clone(),
            listener: self.listener.clone(),
            sessions: self.sessions.clone(),
            handler,
        };
        match thread::Builder::new()
            .name(format!("{}-acceptor", self.label))
            .spawn(move || accept_loop.run())
        {
            Ok(handle) => {
                *thread = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                close_listener(&self.listener);
                Err(Error::Io(e))
            }
        }
    }

    /// Stop accepting, then close and join every live session.
    pub(crate) fn stop(&self) {
        let Some(handle) = self.thread.lock().take() else {
            return;
        };
        debug!("stopping {} server", self.label);
        self.running.store(false, Ordering::SeqCst);
        close_listener(&self.listener);
        if handle.join().is_err() {
            error!("{} acceptor panicked", self.label);
        }
        self.sessions.shutdown();
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

fn close_listener(slot: &ListenerSlot) {
    if let Some(listener) = slot.lock().take() {
        if let Err(e) = listener.close() {
            warn!("failed to close listening socket: {}", e);
        }
    }
}

struct AcceptLoop {
    label: &'static str,
    link: Arc<dyn LlcpLink>,
    sap: u8,
    service_name: String,
    options: SocketOptions,
    running: Arc<AtomicBool>,
    listener: ListenerSlot,
    sessions: Arc<SessionRegistry>,
    handler: ConnectionHandler,
}

impl AcceptLoop {
    fn running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn run(self) {
        while self.running() {
            let Some(listener) = self.listener.lock().clone() else {
                break;
            };

            match listener.accept() {
                Ok(socket) => {
                    if !self.running() {
                        let _ = socket.close();
                        break;
                    }
                    debug!("{} accepted connection (remote miu {})", self.label, socket.remote_miu());
                    let handler = self.handler.clone();
                    let running = self.running.clone();
                    let session_socket = socket.clone();
                    if let Err(e) = self.sessions.spawn(
                        format!("{}-session", self.label),
                        socket,
                        move || handler(session_socket, running.as_ref()),
                    ) {
                        error!("{} failed to start session: {}", self.label, e);
                    }
                }
                Err(e) => {
                    if !self.running() {
                        break;
                    }
                    error!("{} accept failed: {}", self.label, e);
                    if !self.relisten() {
                        break;
                    }
                }
            }
        }
        debug!("{} acceptor finished", self.label);
    }

    /// Replace a broken listener. Done under the slot lock so `stop()`
    /// either sees the new listener or makes us bail out.
    fn relisten(&self) -> bool {
        let mut slot = self.listener.lock();
        if let Some(old) = slot.take() {
            let _ = old.close();
        }
        if !self.running() {
            return false;
        }
        match self.link.listen(self.sap, &self.service_name, &self.options) {
            Ok(listener) => {
                debug!("{} listening again on sap {}", self.label, self.sap);
                *slot = Some(listener);
                true
            }
            Err(e) => {
                error!("{} could not listen again: {}", self.label, e);
                self.running.store(false, Ordering::SeqCst);
                false
            }
        }
    }
}
