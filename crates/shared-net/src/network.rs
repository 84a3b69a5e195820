//! # Message Network
//!
//! [`MsgNetwork`] owns an endpoint's handler registry and inbound queue and
//! runs its event loop; [`NetHandle`] is the cloneable side used to connect,
//! listen and address accepted connections by peer address.
//!
//! Every connection, inbound or outbound, is tracked by peer address so a
//! response can be routed to a client that connected earlier.

use parking_lot::Mutex;
use shared_types::WireMessage;
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::NetConfig;
use crate::connection::{spawn_io, Connection, NetEvent};
use crate::error::NetError;
use crate::registry::{Dispatch, HandlerRegistry};

type DisconnectHook<S> = Box<dyn FnMut(&mut S, &Connection) -> ControlFlow<()> + Send>;

/// Why [`MsgNetwork::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The shutdown future resolved.
    Shutdown,
    /// A handler or the disconnect hook returned `Break`.
    Stopped,
}

struct Inner {
    config: NetConfig,
    conns: Mutex<HashMap<SocketAddr, Connection>>,
    events: mpsc::Sender<NetEvent>,
    next_id: AtomicU64,
}

/// Cloneable handle for connecting, listening and sending.
///
/// `connect` and `listen` spawn I/O tasks on the runtime they are awaited in.
#[derive(Clone)]
pub struct NetHandle {
    inner: Arc<Inner>,
}

impl NetHandle {
    #[must_use]
    pub fn config(&self) -> &NetConfig {
        &self.inner.config
    }

    /// Establish an outbound connection. Resolves once the TCP handshake is
    /// done; failure is returned, never retried.
    pub async fn connect(&self, addr: SocketAddr) -> Result<Connection, NetError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| NetError::ConnectFailed { addr, source })?;
        let conn = self.register(stream, addr);
        info!(peer = %addr, conn_id = conn.id(), "Connected");
        Ok(conn)
    }

    /// Bind `addr` and accept connections in the background.
    ///
    /// Returns the bound address (useful with port 0).
    pub async fn listen(&self, addr: SocketAddr) -> Result<SocketAddr, NetError> {
        let listener = TcpListener::bind(addr).await?;
        let local = listener.local_addr()?;
        info!(addr = %local, "Listening");

        let handle = self.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, peer)) => {
                        let conn = handle.register(stream, peer);
                        debug!(%peer, conn_id = conn.id(), "Accepted connection");
                    }
                    Err(e) => {
                        error!(error = %e, "Accept failed");
                        tokio::time::sleep(Duration::from_millis(50)).await;
                    }
                }
            }
        });
        Ok(local)
    }

    /// Live connection to `addr`, if any.
    #[must_use]
    pub fn connection(&self, addr: &SocketAddr) -> Option<Connection> {
        self.inner.conns.lock().get(addr).cloned()
    }

    /// Send `msg` on the connection whose peer is `addr`.
    pub fn send_to<M: WireMessage>(&self, addr: &SocketAddr, msg: &M) -> Result<(), NetError> {
        self.connection(addr)
            .ok_or(NetError::UnknownPeer(*addr))?
            .send_msg(msg)
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.inner.conns.lock().len()
    }

    fn register(&self, stream: TcpStream, peer: SocketAddr) -> Connection {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let conn = spawn_io(
            stream,
            id,
            peer,
            self.inner.config.max_msg_size,
            self.inner.events.clone(),
        );
        self.inner.conns.lock().insert(peer, conn.clone());
        conn
    }

    /// Drop the address entry if it still points at `conn`.
    fn forget(&self, conn: &Connection) {
        let mut conns = self.inner.conns.lock();
        if conns
            .get(&conn.peer_addr())
            .is_some_and(|c| c.id() == conn.id())
        {
            conns.remove(&conn.peer_addr());
        }
    }
}

/// One network endpoint: handlers plus the event loop that runs them.
///
/// `S` is the state object every handler receives by `&mut`.
pub struct MsgNetwork<S> {
    handle: NetHandle,
    registry: HandlerRegistry<S>,
    on_disconnect: Option<DisconnectHook<S>>,
    events: mpsc::Receiver<NetEvent>,
}

impl<S> MsgNetwork<S> {
    #[must_use]
    pub fn new(config: NetConfig) -> Self {
        let (events_tx, events) = mpsc::channel(config.channel_capacity.max(1));
        Self {
            handle: NetHandle {
                inner: Arc::new(Inner {
                    config,
                    conns: Mutex::new(HashMap::new()),
                    events: events_tx,
                    next_id: AtomicU64::new(0),
                }),
            },
            registry: HandlerRegistry::new(),
            on_disconnect: None,
            events,
        }
    }

    #[must_use]
    pub fn handle(&self) -> NetHandle {
        self.handle.clone()
    }

    /// Register the handler for messages of type `M`. One per opcode.
    pub fn reg_handler<M, F>(&mut self, handler: F) -> Result<(), NetError>
    where
        M: WireMessage,
        F: FnMut(&mut S, M, &Connection) -> ControlFlow<()> + Send + 'static,
    {
        self.registry.register::<M, F>(handler)
    }

    /// Called once per connection after its reader stops.
    pub fn on_disconnect<F>(&mut self, hook: F)
    where
        F: FnMut(&mut S, &Connection) -> ControlFlow<()> + Send + 'static,
    {
        self.on_disconnect = Some(Box::new(hook));
    }

    /// Run the event loop until `shutdown` resolves or a handler breaks.
    ///
    /// Drains at most `burst_size` events per wakeup before yielding.
    pub async fn run<F>(mut self, state: &mut S, shutdown: F) -> LoopExit
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let burst = self.handle.config().burst_size.max(1);

        loop {
            let first = tokio::select! {
                biased;
                () = &mut shutdown => return LoopExit::Shutdown,
                event = self.events.recv() => event,
            };
            // `self.handle` keeps a sender alive, so the queue never closes.
            let Some(first) = first else {
                return LoopExit::Stopped;
            };
            if self.dispatch(state, first).is_break() {
                return LoopExit::Stopped;
            }

            let mut drained = 1;
            while drained < burst {
                let Ok(event) = self.events.try_recv() else {
                    break;
                };
                if self.dispatch(state, event).is_break() {
                    return LoopExit::Stopped;
                }
                drained += 1;
            }
            if drained == burst {
                tokio::task::yield_now().await;
            }
        }
    }

    fn dispatch(&mut self, state: &mut S, event: NetEvent) -> ControlFlow<()> {
        match event {
            NetEvent::Frame { conn, frame } => {
                match self.registry.dispatch(state, &frame, &conn) {
                    Dispatch::Handled(flow) => flow,
                    Dispatch::UnknownOpcode(opcode) => {
                        warn!(peer = %conn.peer_addr(), opcode, "No handler for opcode, dropping frame");
                        ControlFlow::Continue(())
                    }
                    Dispatch::Malformed(e) => {
                        warn!(peer = %conn.peer_addr(), error = %e, "Undecodable message, dropping frame");
                        ControlFlow::Continue(())
                    }
                }
            }
            NetEvent::Closed { conn } => {
                self.handle.forget(&conn);
                match self.on_disconnect.as_mut() {
                    Some(hook) => hook(state, &conn),
                    None => ControlFlow::Continue(()),
                }
            }
        }
    }
}
