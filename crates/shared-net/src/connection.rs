//! Connection handles and per-connection I/O tasks.
//!
//! A [`Connection`] is a cheap, cloneable handle. Sending only enqueues the
//! encoded frame for the connection's writer task, so it never blocks and can
//! be called from any thread, including another endpoint's event loop.

use shared_types::WireMessage;
use std::fmt;
use std::net::SocketAddr;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::NetError;
use crate::frame::{read_frame, Frame};

/// Endpoint-local connection identifier.
pub type ConnId = u64;

/// Handle to one established connection.
#[derive(Clone)]
pub struct Connection {
    id: ConnId,
    peer: SocketAddr,
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    max_msg_size: usize,
}

impl Connection {
    #[must_use]
    pub fn id(&self) -> ConnId {
        self.id
    }

    #[must_use]
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Whether the writer side has shut down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }

    /// Encode and enqueue `msg` for this connection.
    pub fn send_msg<M: WireMessage>(&self, msg: &M) -> Result<(), NetError> {
        let bytes = Frame::from_message(msg)?.to_bytes(self.max_msg_size)?;
        self.outbound
            .send(bytes)
            .map_err(|_| NetError::ConnectionClosed(self.peer))
    }

    /// A connection with no socket behind it. Frames sent on it show up on
    /// the returned receiver.
    #[cfg(any(test, feature = "test-utils"))]
    #[must_use]
    pub fn detached(
        id: ConnId,
        peer: SocketAddr,
        max_msg_size: usize,
    ) -> (Self, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        (
            Self {
                id,
                peer,
                outbound,
                max_msg_size,
            },
            rx,
        )
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("peer", &self.peer)
            .finish()
    }
}

/// Something the reader side of a connection observed.
#[derive(Debug)]
pub(crate) enum NetEvent {
    Frame { conn: Connection, frame: Frame },
    Closed { conn: Connection },
}

/// Split `stream` into reader and writer tasks on the current runtime.
pub(crate) fn spawn_io(
    stream: TcpStream,
    id: ConnId,
    peer: SocketAddr,
    max_msg_size: usize,
    events: mpsc::Sender<NetEvent>,
) -> Connection {
    if let Err(e) = stream.set_nodelay(true) {
        debug!(%peer, error = %e, "Could not disable Nagle");
    }
    let (mut rd, mut wr) = stream.into_split();
    let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Vec<u8>>();
    let conn = Connection {
        id,
        peer,
        outbound,
        max_msg_size,
    };

    tokio::spawn(async move {
        while let Some(bytes) = outbound_rx.recv().await {
            if let Err(e) = wr.write_all(&bytes).await {
                warn!(%peer, error = %e, "Write failed, closing writer");
                break;
            }
        }
        let _ = wr.shutdown().await;
    });

    let reader_conn = conn.clone();
    tokio::spawn(async move {
        loop {
            match read_frame(&mut rd, max_msg_size).await {
                Ok(Some(frame)) => {
                    let event = NetEvent::Frame {
                        conn: reader_conn.clone(),
                        frame,
                    };
                    if events.send(event).await.is_err() {
                        debug!(%peer, "Event loop gone, stopping reader");
                        return;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(%peer, error = %e, "Read failed, dropping connection");
                    break;
                }
            }
        }
        debug!(%peer, conn_id = id, "Connection closed");
        let _ = events.send(NetEvent::Closed { conn: reader_conn }).await;
    });

    conn
}
