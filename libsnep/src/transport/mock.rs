// libsnep-rs/libsnep/src/transport/mock.rs

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, after, never, select, unbounded};
use parking_lot::Mutex;

use crate::config::SocketOptions;
use crate::transport::traits::{LlcpLink, LlcpServerSocket, LlcpSocket};
use crate::{Error, Result};

/// In-memory LLCP socket. Each `send` is delivered to the bound peer as
/// one PDU; a PDU longer than the receiver's `max_len` is handed out over
/// several `receive` calls.
#[derive(Debug)]
pub struct MockLlcpSocket {
    local_miu: usize,
    remote_miu: usize,
    tx: Mutex<Option<Sender<Vec<u8>>>>,
    rx: Receiver<Vec<u8>>,
    pending: Mutex<Vec<u8>>,
    // dropped on close so receivers blocked in select! wake up
    wake_tx: Mutex<Option<Sender<()>>>,
    wake_rx: Receiver<()>,
    closed: Arc<AtomicBool>,
    peer_closed: Arc<AtomicBool>,
    sent: Mutex<Vec<Vec<u8>>>,
}

impl MockLlcpSocket {
    /// Two sockets bound to each other. `miu_a` is advertised by `a`,
    /// `miu_b` by `b`.
    pub fn pair(miu_a: usize, miu_b: usize) -> (Arc<Self>, Arc<Self>) {
        let (a_tx, b_rx) = unbounded();
        let (b_tx, a_rx) = unbounded();
        let a_closed = Arc::new(AtomicBool::new(false));
        let b_closed = Arc::new(AtomicBool::new(false));

        let a = Self::half(miu_a, miu_b, a_tx, a_rx, a_closed.clone(), b_closed.clone());
        let b = Self::half(miu_b, miu_a, b_tx, b_rx, b_closed, a_closed);
        (Arc::new(a), Arc::new(b))
    }

    fn half(
        local_miu: usize,
        remote_miu: usize,
        tx: Sender<Vec<u8>>,
        rx: Receiver<Vec<u8>>,
        closed: Arc<AtomicBool>,
        peer_closed: Arc<AtomicBool>,
    ) -> Self {
        let (wake_tx, wake_rx) = unbounded();
        Self {
            local_miu,
            remote_miu,
            tx: Mutex::new(Some(tx)),
            rx,
            pending: Mutex::new(Vec::new()),
            wake_tx: Mutex::new(Some(wake_tx)),
            wake_rx,
            closed,
            peer_closed,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Every PDU this socket has sent, in order.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl LlcpSocket for MockLlcpSocket {
    fn send(&self, data: &[u8]) -> Result<()> {
        if self.is_closed() || self.peer_closed.load(Ordering::SeqCst) {
            return Err(Error::ConnectionClosed);
        }
        let guard = self.tx.lock();
        let tx = guard.as_ref().ok_or(Error::ConnectionClosed)?;
        tx.send(data.to_vec()).map_err(|_| Error::ConnectionClosed)?;
        self.sent.lock().push(data.to_vec());
        Ok(())
    }

    fn receive(&self, max_len: usize, timeout: Option<Duration>) -> Result<Vec<u8>> {
        if self.is_closed() {
            return Err(Error::ConnectionClosed);
        }
        {
            let mut pending = self.pending.lock();
            if !pending.is_empty() {
                let n = pending.len().min(max_len);
                return Ok(pending.drain(..n).collect());
            }
        }

        let deadline = match timeout {
            Some(d) => after(d),
            None => never::<Instant>(),
        };
        let mut pdu = select! {
            recv(self.rx) -> msg => msg.map_err(|_| Error::ConnectionClosed)?,
            recv(self.wake_rx) -> _ => return Err(Error::ConnectionClosed),
            recv(deadline) -> _ => return Err(Error::Timeout),
        };

        if pdu.len() > max_len {
            let rest = pdu.split_off(max_len);
            self.pending.lock().extend_from_slice(&rest);
        }
        Ok(pdu)
    }

    fn remote_miu(&self) -> usize {
        self.remote_miu
    }

    fn local_miu(&self) -> usize {
        self.local_miu
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        self.tx.lock().take();
        self.wake_tx.lock().take();
        Ok(())
    }
}

/// In-memory listening socket created by `MockLlcpLink::listen`.
#[derive(Debug)]
pub struct MockLlcpServerSocket {
    sap: u8,
    service_name: String,
    miu: usize,
    incoming: Receiver<Arc<MockLlcpSocket>>,
    wake_tx: Mutex<Option<Sender<()>>>,
    wake_rx: Receiver<()>,
    closed: AtomicBool,
}

impl MockLlcpServerSocket {
    pub fn sap(&self) -> u8 {
        self.sap
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl LlcpServerSocket for MockLlcpServerSocket {
    fn accept(&self) -> Result<Arc<dyn LlcpSocket>> {
        if self.is_closed() {
            return Err(Error::ConnectionClosed);
        }
        select! {
            recv(self.incoming) -> sock => {
                let sock = sock.map_err(|_| Error::ConnectionClosed)?;
                Ok(sock as Arc<dyn LlcpSocket>)
            }
            recv(self.wake_rx) -> _ => Err(Error::ConnectionClosed),
        }
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        self.wake_tx.lock().take();
        Ok(())
    }
}

#[derive(Debug)]
struct Listener {
    sap: u8,
    service_name: String,
    miu: usize,
    tx: Sender<Arc<MockLlcpSocket>>,
    server: Weak<MockLlcpServerSocket>,
}

impl Listener {
    fn is_live(&self) -> bool {
        self.server.upgrade().is_some_and(|s| !s.is_closed())
    }
}

/// In-memory LLCP link with a registry of listeners, used by tests and
/// the demo to run clients and servers in one process.
#[derive(Debug, Default)]
pub struct MockLlcpLink {
    listeners: Mutex<Vec<Listener>>,
    connections: Mutex<Vec<(Arc<MockLlcpSocket>, Arc<MockLlcpSocket>)>>,
    /// Testing hook: number of subsequent connects that should fail
    connect_failures: AtomicUsize,
}

impl MockLlcpLink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next `n` connect attempts fail with `ServiceUnavailable`.
    pub fn set_connect_failures(&self, n: usize) {
        self.connect_failures.store(n, Ordering::SeqCst);
    }

    /// (client, server) socket pairs created so far.
    pub fn connections(&self) -> Vec<(Arc<MockLlcpSocket>, Arc<MockLlcpSocket>)> {
        self.connections.lock().clone()
    }

    /// Simulate link loss: close every listener and every connection.
    pub fn deactivate(&self) {
        let listeners: Vec<_> = self.listeners.lock().drain(..).collect();
        for listener in listeners {
            if let Some(server) = listener.server.upgrade() {
                let _ = server.close();
            }
        }
        for (client, server) in self.connections.lock().iter() {
            let _ = client.close();
            let _ = server.close();
        }
    }

    pub fn listener_count(&self) -> usize {
        let mut listeners = self.listeners.lock();
        listeners.retain(Listener::is_live);
        listeners.len()
    }

    fn connect_where(
        &self,
        what: &str,
        options: &SocketOptions,
        matches: impl Fn(&Listener) -> bool,
    ) -> Result<Arc<dyn LlcpSocket>> {
        if self
            .connect_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(Error::ServiceUnavailable(format!("{} (injected failure)", what)));
        }

        let mut listeners = self.listeners.lock();
        listeners.retain(Listener::is_live);
        let listener = listeners
            .iter()
            .find(|l| matches(l))
            .ok_or_else(|| Error::ServiceUnavailable(what.to_string()))?;

        let (client, server) = MockLlcpSocket::pair(options.miu, listener.miu);
        listener
            .tx
            .send(server.clone())
            .map_err(|_| Error::ServiceUnavailable(what.to_string()))?;
        self.connections.lock().push((client.clone(), server));
        Ok(client)
    }
}

impl LlcpLink for MockLlcpLink {
    fn connect_to_service(
        &self,
        service_name: &str,
        options: &SocketOptions,
    ) -> Result<Arc<dyn LlcpSocket>> {
        self.connect_where(&format!("service {}", service_name), options, |l| {
            l.service_name == service_name
        })
    }

    fn connect_to_sap(&self, sap: u8, options: &SocketOptions) -> Result<Arc<dyn LlcpSocket>> {
        self.connect_where(&format!("sap {}", sap), options, |l| l.sap == sap)
    }

    fn listen(
        &self,
        sap: u8,
        service_name: &str,
        options: &SocketOptions,
    ) -> Result<Arc<dyn LlcpServerSocket>> {
        let mut listeners = self.listeners.lock();
        listeners.retain(Listener::is_live);
        if listeners
            .iter()
            .any(|l| l.sap == sap || l.service_name == service_name)
        {
            return Err(Error::ServiceUnavailable(format!(
                "sap {} / service {} already bound",
                sap, service_name
            )));
        }

        let (tx, incoming) = unbounded();
        let (wake_tx, wake_rx) = unbounded();
        let server = Arc::new(MockLlcpServerSocket {
            sap,
            service_name: service_name.to_string(),
            miu: options.miu,
            incoming,
            wake_tx: Mutex::new(Some(wake_tx)),
            wake_rx,
            closed: AtomicBool::new(false),
        });
        listeners.push(Listener {
            sap,
            service_name: service_name.to_string(),
            miu: server.miu,
            tx,
            server: Arc::downgrade(&server),
        });
        Ok(server)
    }
}
