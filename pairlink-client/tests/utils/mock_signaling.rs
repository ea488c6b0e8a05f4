use async_trait::async_trait;
use pairlink_client::{HandlerTable, LostHandler, SignalHandler, SignalingChannel};
use pairlink_core::{ClientSignal, ServerSignal, SignalKind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// SignalingChannel that records everything the session sends and lets the
/// test play the server.
pub struct MockSignaling {
    handlers: HandlerTable,
    lost: Mutex<Option<LostHandler>>,
    /// Every outbound signal, including ones sent after disconnect.
    sent: Mutex<Vec<ClientSignal>>,
    sent_tx: mpsc::UnboundedSender<ClientSignal>,
    disconnects: AtomicUsize,
}

impl MockSignaling {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<ClientSignal>) {
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let signaling = Arc::new(Self {
            handlers: HandlerTable::new(),
            lost: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
            sent_tx,
            disconnects: AtomicUsize::new(0),
        });
        (signaling, sent_rx)
    }

    /// Plays an inbound server message. Returns `false` when no handler is
    /// registered for it.
    pub fn deliver(&self, signal: ServerSignal) -> bool {
        tracing::debug!("[MockSignaling] deliver {:?}", signal.kind());
        self.handlers.dispatch(signal)
    }

    pub fn lose_transport(&self) {
        let handler = self.lost.lock().unwrap().clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    pub fn sent(&self) -> Vec<ClientSignal> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_events(&self) -> Vec<&'static str> {
        self.sent().iter().map(|s| s.event_name()).collect()
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

#[async_trait]
impl SignalingChannel for MockSignaling {
    fn on(&self, kind: SignalKind, handler: SignalHandler) {
        self.handlers.register(kind, handler);
    }

    fn on_transport_lost(&self, handler: LostHandler) {
        *self.lost.lock().unwrap() = Some(handler);
    }

    async fn send(&self, signal: ClientSignal) {
        tracing::debug!("[MockSignaling] send {}", signal.event_name());
        self.sent.lock().unwrap().push(signal.clone());
        let _ = self.sent_tx.send(signal);
    }

    async fn disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.handlers.clear();
    }
}
