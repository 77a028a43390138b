//! Session client for the palaver chat protocol

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};

use palaver_protocol::{extract_messages, Frame, FrameCodec};
use palaver_utils::{PalaverError, Result};

use super::handler::{spawn_event_worker, SessionEvent, SessionEvents};
use crate::config::SessionConfig;

/// Capacity of the outgoing frame queue
const OUTGOING_QUEUE: usize = 100;

/// Upper bound on decoded frames folded into one callback batch
const RECEIVE_BATCH: usize = 64;

/// Observable connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Transport handles for one live connection.
///
/// Exists only inside [`LinkState::Connected`], so a handle can never outlive
/// the connected state that owns it.
struct Link {
    /// Single-consumer queue to the writer task; queueing a frame is the only
    /// way to reach the write half, so whole frames never interleave
    outgoing: mpsc::Sender<Frame>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

enum LinkState {
    Disconnected,
    Connecting,
    Connected(Link),
}

impl LinkState {
    fn observable(&self) -> SessionState {
        match self {
            LinkState::Disconnected => SessionState::Disconnected,
            LinkState::Connecting => SessionState::Connecting,
            LinkState::Connected(_) => SessionState::Connected,
        }
    }
}

/// Mutable identity fields, guarded by one lock
struct Identity {
    name: String,
    room: String,
}

struct Inner {
    host: String,
    port: u16,
    identity: Mutex<Identity>,
    link: Mutex<LinkState>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

/// Client session for one chat server connection.
///
/// Owns the socket, the current display name and room, and the background
/// tasks that move frames in both directions. Send and identity operations
/// are silent no-ops while not connected; callers that need to know why an
/// operation did nothing can poll [`Session::state`].
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    /// Create a session in the disconnected state.
    ///
    /// Spawns the callback worker for `handler`, so this must be called
    /// within a Tokio runtime.
    pub fn new(handler: impl SessionEvents, config: SessionConfig) -> Self {
        let (events, events_rx) = mpsc::unbounded_channel();
        // The worker lives for the whole session and exits once the last
        // event sender is gone
        let _ = spawn_event_worker(Box::new(handler), events_rx);

        Self {
            inner: Arc::new(Inner {
                host: config.host,
                port: config.port,
                identity: Mutex::new(Identity {
                    name: config.name,
                    room: config.room,
                }),
                link: Mutex::new(LinkState::Disconnected),
                events,
            }),
        }
    }

    pub fn host(&self) -> &str {
        &self.inner.host
    }

    pub fn port(&self) -> u16 {
        self.inner.port
    }

    /// The "host:port" target of this session
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.inner.host, self.inner.port)
    }

    /// Current connection state
    pub async fn state(&self) -> SessionState {
        self.inner.link.lock().await.observable()
    }

    pub async fn is_connected(&self) -> bool {
        self.state().await == SessionState::Connected
    }

    /// Current display name (updated locally before the server acknowledges)
    pub async fn name(&self) -> String {
        self.inner.identity.lock().await.name.clone()
    }

    /// Current room code
    pub async fn room(&self) -> String {
        self.inner.identity.lock().await.room.clone()
    }

    /// Connect to the configured server.
    ///
    /// No-op if already connected. On success the receive loop is running,
    /// the connect event has been dispatched, and the current room and name
    /// have been queued as the two initial frames (room first; the server
    /// binds the session to a room before naming the member). Connection
    /// failure is returned to the caller; there is no internal retry.
    pub async fn connect(&self) -> Result<()> {
        let mut link = self.inner.link.lock().await;
        if matches!(*link, LinkState::Connected(_)) {
            return Ok(());
        }
        *link = LinkState::Connecting;

        let endpoint = self.endpoint();
        let stream = match TcpStream::connect(&endpoint).await {
            Ok(stream) => stream,
            Err(e) => {
                *link = LinkState::Disconnected;
                return Err(PalaverError::connection(format!(
                    "failed to connect to {}: {}",
                    endpoint, e
                )));
            }
        };
        tracing::info!(%endpoint, "connected");

        let (read_half, write_half) = stream.into_split();
        let (outgoing, outgoing_rx) = mpsc::channel(OUTGOING_QUEUE);

        let writer = tokio::spawn(write_loop(
            FramedWrite::new(write_half, FrameCodec::new()),
            outgoing_rx,
        ));
        let reader = tokio::spawn(receive_loop(
            FramedRead::new(read_half, FrameCodec::new()),
            Arc::clone(&self.inner),
        ));

        *link = LinkState::Connected(Link {
            outgoing: outgoing.clone(),
            reader,
            writer,
        });

        // Still under the link lock, so a racing teardown cannot slip its
        // disconnect event in front of these
        let _ = self.inner.events.send(SessionEvent::Connected(endpoint));

        let (room, name) = {
            let identity = self.inner.identity.lock().await;
            (identity.room.clone(), identity.name.clone())
        };
        let _ = outgoing.send(Frame::Room(room)).await;
        let _ = outgoing.send(Frame::Name(name)).await;

        Ok(())
    }

    /// Disconnect from the server.
    ///
    /// No-op if not connected. Queues a best-effort `Disconnect` frame,
    /// cancels the receive loop, releases the transport, and dispatches the
    /// disconnect event exactly once.
    pub async fn disconnect(&self) {
        self.inner.teardown(true).await;
    }

    /// Send a chat message. No-op if not connected.
    pub async fn send_message(&self, text: &str) {
        let Some(outgoing) = self.outgoing().await else {
            return;
        };
        if outgoing.send(Frame::Message(text.to_owned())).await.is_err() {
            tracing::debug!("message dropped, link is closing");
        }
    }

    /// Change the display name and notify the server. No-op if not connected;
    /// the local field is updated before the send is queued.
    pub async fn change_name(&self, name: &str) {
        let Some(outgoing) = self.outgoing().await else {
            return;
        };
        self.inner.identity.lock().await.name = name.to_owned();
        let _ = outgoing.send(Frame::Name(name.to_owned())).await;
    }

    /// Change the room and notify the server. Same contract as
    /// [`Session::change_name`].
    pub async fn change_room(&self, room: &str) {
        let Some(outgoing) = self.outgoing().await else {
            return;
        };
        self.inner.identity.lock().await.room = room.to_owned();
        let _ = outgoing.send(Frame::Room(room.to_owned())).await;
    }

    async fn outgoing(&self) -> Option<mpsc::Sender<Frame>> {
        match &*self.inner.link.lock().await {
            LinkState::Connected(link) => Some(link.outgoing.clone()),
            _ => None,
        }
    }
}

impl Inner {
    /// Tear the link down and dispatch the disconnect event.
    ///
    /// The one cancellation point: both explicit `disconnect` and the receive
    /// loop's exit paths land here, and the link lock makes whoever takes the
    /// `Connected` state first the only one to run the teardown.
    async fn teardown(&self, abort_reader: bool) {
        let link = {
            let mut state = self.link.lock().await;
            match std::mem::replace(&mut *state, LinkState::Disconnected) {
                LinkState::Connected(link) => link,
                other => {
                    *state = other;
                    return;
                }
            }
        };

        // Best-effort disconnect notice; the writer drains the queue and then
        // closes the write half once every sender is gone
        let _ = link.outgoing.try_send(Frame::Disconnect);
        drop(link.outgoing);

        if abort_reader {
            link.reader.abort();
        }

        // Wait for the writer to drain the queue and release the write half
        let _ = link.writer.await;

        tracing::info!("disconnected");
        let _ = self.events.send(SessionEvent::Disconnected);
    }
}

/// Sole consumer of the outgoing queue and sole owner of the write half
async fn write_loop(
    mut sink: FramedWrite<OwnedWriteHalf, FrameCodec>,
    mut frames: mpsc::Receiver<Frame>,
) {
    while let Some(frame) = frames.recv().await {
        if let Err(e) = sink.send(frame).await {
            tracing::debug!(error = %e, "write failed, dropping link");
            return;
        }
    }
    let _ = sink.close().await;
}

/// Perpetual receive loop; sole owner of the read half.
///
/// Every wakeup drains the frames the decoder can currently produce and
/// delivers their chat payloads as one batch. Transport errors are absorbed
/// here: logged, then the common teardown path runs. `abort_reader` is false
/// on these paths because this task is the reader.
async fn receive_loop(frames: FramedRead<OwnedReadHalf, FrameCodec>, inner: Arc<Inner>) {
    let mut batches = frames.ready_chunks(RECEIVE_BATCH);
    while let Some(batch) = batches.next().await {
        let mut messages = Vec::new();
        let mut closing = false;

        for item in batch {
            match item {
                Ok(text) if text.is_empty() => {
                    // Lone terminator: the server is disconnecting us
                    tracing::debug!("server signalled disconnect");
                    closing = true;
                    break;
                }
                Ok(text) => messages.extend(extract_messages(&text)),
                Err(e) => {
                    tracing::warn!(error = %e, "receive failed, dropping link");
                    closing = true;
                    break;
                }
            }
        }

        if !messages.is_empty() {
            let _ = inner.events.send(SessionEvent::Messages(messages));
        }
        if closing {
            inner.teardown(false).await;
            return;
        }
    }

    tracing::debug!("server closed connection");
    inner.teardown(false).await;
}
