//! Session event handler trait and callback dispatch

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Trait for reacting to session events.
///
/// Implemented by the embedding application. All methods are invoked on a
/// dedicated callback worker task, never on the networking tasks, so a slow
/// handler cannot stall the receive loop. Dispatch order is preserved.
pub trait SessionEvents: Send + 'static {
    /// One batch of decoded chat messages, in arrival order
    fn on_message(&mut self, messages: Vec<String>);

    /// Connection established; `endpoint` is "host:port"
    fn on_connect(&mut self, _endpoint: &str) {}

    /// Connection torn down (explicit disconnect, server close, or read error)
    fn on_disconnect(&mut self) {}

    /// Reserved for a future delivery-acknowledgement flow; no wire event
    /// produces this yet
    fn on_verify(&mut self, _payload: &str) {}
}

/// Internal event routed from the networking tasks to the callback worker
#[derive(Debug)]
pub(crate) enum SessionEvent {
    Connected(String),
    Messages(Vec<String>),
    Disconnected,
    /// Part of the planned acknowledgement flow; nothing constructs it yet
    #[allow(dead_code)]
    Verify(String),
}

/// Spawn the single-consumer callback worker.
///
/// The worker runs until every event sender is dropped.
pub(crate) fn spawn_event_worker(
    mut handler: Box<dyn SessionEvents>,
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::Connected(endpoint) => handler.on_connect(&endpoint),
                SessionEvent::Messages(batch) => handler.on_message(batch),
                SessionEvent::Disconnected => handler.on_disconnect(),
                SessionEvent::Verify(payload) => handler.on_verify(&payload),
            }
        }
    })
}
