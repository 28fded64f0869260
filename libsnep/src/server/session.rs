// libsnep-rs/libsnep/src/server/session.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use log::{debug, error, warn};
use parking_lot::Mutex;

use crate::transport::LlcpSocket;
use crate::{Error, Result};

struct Session {
    socket: Arc<dyn LlcpSocket>,
    handle: Option<JoinHandle<()>>,
}

/// Live per-connection handler threads of one server.
///
/// Closing a session's socket is the cancellation signal: a handler blocked
/// in `receive` wakes up with `Error::ConnectionClosed` and returns.
#[derive(Default)]
pub struct SessionRegistry {
    next_id: AtomicU64,
    sessions: Mutex<HashMap<u64, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Run `body` on a new named thread and track it until it returns.
    pub fn spawn<F>(self: &Arc<Self>, name: String, socket: Arc<dyn LlcpSocket>, body: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        // registered before the thread starts so a short session can
        // deregister itself
        self.sessions.lock().insert(
            id,
            Session {
                socket: socket.clone(),
                handle: None,
            },
        );

        let registry = Arc::clone(self);
        let spawned = thread::Builder::new().name(name).spawn(move || {
            body();
            registry.finish(id);
        });

        match spawned {
            Ok(handle) => {
                // None when the session already finished; dropping the handle
                // detaches a thread that has returned.
                if let Some(session) = self.sessions.lock().get_mut(&id) {
                    session.handle = Some(handle);
                }
                debug!("session {} started", id);
                Ok(())
            }
            Err(e) => {
                self.sessions.lock().remove(&id);
                if let Err(close_err) = socket.close() {
                    warn!("failed to close socket of unstarted session: {}", close_err);
                }
                Err(Error::Io(e))
            }
        }
    }

    fn finish(&self, id: u64) {
        if self.sessions.lock().remove(&id).is_some() {
            debug!("session {} finished", id);
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close every session socket and wait for the handler threads.
    pub fn shutdown(&self) {
        let drained: Vec<(u64, Session)> = self.sessions.lock().drain().collect();
        if drained.is_empty() {
            return;
        }
        debug!("closing {} sessions", drained.len());

        for (id, session) in &drained {
            if let Err(e) = session.socket.close() {
                warn!("failed to close session {}: {}", id, e);
            }
        }
        let current = thread::current().id();
        for (id, session) in drained {
            let Some(handle) = session.handle else {
                continue;
            };
            // stop() may be called from inside a handler
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                error!("session {} panicked", id);
            }
        }
    }
}
