use crate::error::SessionError;
use crate::signaling::{HandlerTable, LostHandler, SignalHandler, SignalingChannel};
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use pairlink_core::{ClientSignal, ServerSignal, SignalKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Signaling over a WebSocket carrying JSON text frames.
pub struct WsSignalingChannel {
    tx: mpsc::UnboundedSender<Message>,
    handlers: HandlerTable,
    lost: Arc<OnceLock<LostHandler>>,
    closed: AtomicBool,
    shutdown: CancellationToken,
}

impl WsSignalingChannel {
    /// Opens the socket and starts the reader and writer tasks.
    pub async fn connect(url: &str) -> Result<Self, SessionError> {
        info!("Connecting to signaling server: {}", url);

        let (ws_stream, _) = connect_async(url).await.map_err(|e| {
            error!("Signaling connect to {} failed: {}", url, e);
            SessionError::TransportUnavailable(e.to_string())
        })?;

        let (write, read) = ws_stream.split();
        let (tx, rx) = mpsc::unbounded_channel();
        let handlers = HandlerTable::new();
        let lost: Arc<OnceLock<LostHandler>> = Arc::new(OnceLock::new());
        let shutdown = CancellationToken::new();

        tokio::spawn(Self::writer_task(write, rx));
        tokio::spawn(Self::reader_task(
            read,
            handlers.clone(),
            lost.clone(),
            shutdown.clone(),
        ));

        Ok(Self {
            tx,
            handlers,
            lost,
            closed: AtomicBool::new(false),
            shutdown,
        })
    }

    async fn writer_task(
        mut write: SplitSink<WsStream, Message>,
        mut rx: mpsc::UnboundedReceiver<Message>,
    ) {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if let Err(e) = write.send(msg).await {
                warn!("Failed to write signaling frame: {}", e);
                break;
            }
            if closing {
                break;
            }
        }

        debug!("Signaling writer stopped");
    }

    async fn reader_task(
        mut read: SplitStream<WsStream>,
        handlers: HandlerTable,
        lost: Arc<OnceLock<LostHandler>>,
        shutdown: CancellationToken,
    ) {
        loop {
            let frame = tokio::select! {
                _ = shutdown.cancelled() => break,
                frame = read.next() => frame,
            };

            match frame {
                Some(Ok(Message::Text(text))) => match ServerSignal::from_json(text.as_str()) {
                    Ok(signal) => {
                        let kind = signal.kind();
                        if !handlers.dispatch(signal) {
                            debug!("No handler for {:?}", kind);
                        }
                    }
                    Err(e) => warn!("Invalid signaling frame: {}", e),
                },
                Some(Ok(Message::Close(_))) | None => {
                    warn!("Signaling server closed the connection");
                    break;
                }
                Some(Err(e)) => {
                    warn!("Signaling transport error: {}", e);
                    break;
                }
                Some(Ok(_)) => {}
            }
        }

        if !shutdown.is_cancelled() {
            if let Some(handler) = lost.get() {
                handler();
            }
        }
        debug!("Signaling reader stopped");
    }
}

#[async_trait]
impl SignalingChannel for WsSignalingChannel {
    fn on(&self, kind: SignalKind, handler: SignalHandler) {
        self.handlers.register(kind, handler);
    }

    fn on_transport_lost(&self, handler: LostHandler) {
        if self.lost.set(handler).is_err() {
            warn!("Transport-lost handler already registered");
        }
    }

    async fn send(&self, signal: ClientSignal) {
        if self.closed.load(Ordering::SeqCst) {
            debug!("Signaling closed, dropping {}", signal.event_name());
            return;
        }

        match signal.to_json() {
            Ok(json) => {
                if let Err(e) = self.tx.send(Message::Text(json.into())) {
                    error!("Failed to queue {} frame: {}", signal.event_name(), e);
                }
            }
            Err(e) => error!("Failed to serialize signal: {}", e),
        }
    }

    async fn disconnect(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        self.shutdown.cancel();
        self.handlers.clear();
        let _ = self.tx.send(Message::Close(None));
        info!("Signaling channel disconnected");
    }
}

impl Drop for WsSignalingChannel {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
