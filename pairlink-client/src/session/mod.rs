mod actor;
mod status;

pub use status::SessionStatus;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::media::MediaBinding;
use crate::negotiation::NegotiationState;
use crate::signaling::SignalingChannel;
use crate::transport::{Connector, PeerConnection};
use actor::{SessionActor, SessionSignal};
use pairlink_core::{RoomId, ServerSignal, SignalKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{OnceCell, mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// One call in one room: owns the signaling channel and the peer connection
/// from join until `leave`. Never reused across rooms.
pub struct ConnectionSession {
    room: RoomId,
    status_tx: Arc<watch::Sender<SessionStatus>>,
    shutdown: CancellationToken,
    teardown: Arc<Teardown>,
}

impl ConnectionSession {
    /// Creates the peer connection, subscribes to the signaling channel and
    /// starts the session task. Media acquisition and the join intent happen
    /// on that task.
    pub async fn join(
        room: RoomId,
        signaling: Arc<dyn SignalingChannel>,
        connector: &dyn Connector,
        media: MediaBinding,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let (transport_tx, transport_rx) = mpsc::channel(256);
        let connection = connector
            .connect(&config.transport, transport_tx)
            .await
            .map_err(|e| {
                warn!("Peer connection setup failed for room {}: {:?}", room, e);
                SessionError::ConnectionUnavailable(e.to_string())
            })?;

        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        for kind in [
            SignalKind::MembershipSnapshot,
            SignalKind::OfferReceived,
            SignalKind::AnswerReceived,
            SignalKind::CandidateReceived,
            SignalKind::RoomFull,
        ] {
            let tx = signal_tx.clone();
            signaling.on(
                kind,
                Arc::new(move |signal: ServerSignal| {
                    let _ = tx.send(SessionSignal::Inbound(signal));
                }),
            );
        }
        signaling.on_transport_lost(Arc::new(move || {
            let _ = signal_tx.send(SessionSignal::TransportLost);
        }));

        let (status_tx, _) = watch::channel(SessionStatus::new());
        let status_tx = Arc::new(status_tx);
        let shutdown = CancellationToken::new();
        let teardown = Arc::new(Teardown::new(signaling.clone(), connection.clone()));

        let actor = SessionActor::new(
            room.clone(),
            signaling,
            connection,
            media,
            &config,
            status_tx.clone(),
            shutdown.clone(),
            teardown.clone(),
            signal_rx,
            transport_rx,
        );
        tokio::spawn(actor.run());

        info!("Session for room {} started", room);
        Ok(Self {
            room,
            status_tx,
            shutdown,
            teardown,
        })
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    pub fn status(&self) -> SessionStatus {
        self.status_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }

    /// Resolves with the first status that satisfies `predicate`.
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&SessionStatus) -> bool,
    ) -> SessionStatus {
        let mut rx = self.status_tx.subscribe();
        match rx.wait_for(|status| predicate(status)).await {
            Ok(status) => status.clone(),
            Err(_) => self.status(),
        }
    }

    /// Disconnects signaling and closes the peer connection before
    /// returning. Continuations still in flight no-op when they resume.
    /// Safe to call any number of times.
    pub async fn leave(&self) {
        self.shutdown.cancel();
        if self.teardown.run().await {
            info!("Left room {}", self.room);
        }
        mark_closed(&self.status_tx);
    }
}

impl Drop for ConnectionSession {
    fn drop(&mut self) {
        // the session task tears down on its way out
        self.shutdown.cancel();
    }
}

pub(crate) fn mark_closed(status_tx: &watch::Sender<SessionStatus>) {
    status_tx.send_if_modified(|status| {
        if status.negotiation.is_closed() {
            return false;
        }
        status.negotiation = NegotiationState::Closed;
        true
    });
}

/// Releases the session's transports exactly once. Concurrent callers all
/// wait for the release to finish.
pub(crate) struct Teardown {
    started: AtomicBool,
    done: OnceCell<()>,
    signaling: Arc<dyn SignalingChannel>,
    connection: Arc<dyn PeerConnection>,
}

impl Teardown {
    fn new(signaling: Arc<dyn SignalingChannel>, connection: Arc<dyn PeerConnection>) -> Self {
        Self {
            started: AtomicBool::new(false),
            done: OnceCell::new(),
            signaling,
            connection,
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Returns `false` if another call got there first.
    pub(crate) async fn run(&self) -> bool {
        let first = !self.started.swap(true, Ordering::SeqCst);
        self.done
            .get_or_init(|| async {
                self.signaling.disconnect().await;
                if let Err(e) = self.connection.close().await {
                    warn!("Failed to close peer connection: {:?}", e);
                }
            })
            .await;
        first
    }
}
