use crate::candidates::{CandidateBuffer, Disposition, Readiness};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::media::{MediaBinding, MediaConstraints, MediaStatus};
use crate::negotiation::{NegotiationState, Negotiator};
use crate::session::{SessionStatus, Teardown, mark_closed};
use crate::signaling::SignalingChannel;
use crate::transport::{PeerConnection, TransportEvent};
use pairlink_core::utils::FIRST_ROUND;
use pairlink_core::{
    ClientSignal, IceCandidate, Participant, Role, RoomId, SdpKind, ServerSignal,
    SessionDescription,
};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub(crate) enum SessionSignal {
    Inbound(ServerSignal),
    TransportLost,
}

/// Runs `fut` unless the session is torn down first. `None` means the
/// caller must not touch session state any more.
async fn guarded<F: Future>(shutdown: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = shutdown.cancelled() => None,
        out = fut => (!shutdown.is_cancelled()).then_some(out),
    }
}

/// Event loop owning all mutable state of one session. Signaling handlers
/// and connection callbacks only enqueue; everything is applied here, one
/// event at a time.
pub(crate) struct SessionActor {
    room: RoomId,
    signaling: Arc<dyn SignalingChannel>,
    connection: Arc<dyn PeerConnection>,
    negotiator: Negotiator,
    candidates: CandidateBuffer,
    media: MediaBinding,
    constraints: MediaConstraints,
    status_tx: Arc<watch::Sender<SessionStatus>>,
    shutdown: CancellationToken,
    teardown: Arc<Teardown>,
    signal_rx: mpsc::UnboundedReceiver<SessionSignal>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    joined: bool,
    remote_description_set: bool,
    early_offer: Option<(SessionDescription, u64)>,
}

impl SessionActor {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        room: RoomId,
        signaling: Arc<dyn SignalingChannel>,
        connection: Arc<dyn PeerConnection>,
        media: MediaBinding,
        config: &SessionConfig,
        status_tx: Arc<watch::Sender<SessionStatus>>,
        shutdown: CancellationToken,
        teardown: Arc<Teardown>,
        signal_rx: mpsc::UnboundedReceiver<SessionSignal>,
        transport_rx: mpsc::Receiver<TransportEvent>,
    ) -> Self {
        Self {
            room,
            signaling,
            connection,
            negotiator: Negotiator::new(),
            candidates: CandidateBuffer::new(config.candidate_queue_limit),
            media,
            constraints: config.constraints,
            status_tx,
            shutdown,
            teardown,
            signal_rx,
            transport_rx,
            joined: false,
            remote_description_set: false,
            early_offer: None,
        }
    }

    pub(crate) async fn run(mut self) {
        info!("Session event loop started for room {}", self.room);

        self.acquire_media().await;

        if !self.shutdown.is_cancelled() && self.advance(NegotiationState::Joining) {
            self.signaling.join(&self.room).await;
        }

        while !self.shutdown.is_cancelled() && !self.negotiator.state().is_closed() {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => break,

                signal = self.signal_rx.recv() => match signal {
                    Some(SessionSignal::Inbound(s)) => self.handle_signal(s).await,
                    Some(SessionSignal::TransportLost) => {
                        self.fail(SessionError::TransportUnavailable(
                            "signaling connection lost".to_owned(),
                        ));
                    }
                    None => {
                        info!("Signaling handlers dropped. Shutting down session.");
                        break;
                    }
                },

                evt = self.transport_rx.recv() => match evt {
                    Some(e) => self.handle_transport_event(e).await,
                    None => {
                        warn!("Transport channel closed unexpectedly");
                        break;
                    }
                }
            }
        }

        self.negotiator.close();
        if self.candidates.dropped() > 0 {
            debug!(
                "{} candidate(s) dropped in room {}",
                self.candidates.dropped(),
                self.room
            );
        }
        self.candidates.clear();
        self.media.release();
        self.teardown.run().await;
        mark_closed(&self.status_tx);
        info!("Session event loop finished for room {}", self.room);
    }

    async fn acquire_media(&mut self) {
        let devices = self.media.devices();
        let Some(result) = guarded(&self.shutdown, devices.acquire(&self.constraints)).await
        else {
            return;
        };

        let status = match result {
            Ok(stream) => {
                let connection = self.connection.clone();
                let bind = self.media.bind_local(stream, connection.as_ref());
                let Some(status) = guarded(&self.shutdown, bind).await else {
                    return;
                };
                status
            }
            Err(e) => {
                warn!(
                    "Local media unavailable in room {}: {}. Negotiating without local tracks.",
                    self.room, e
                );
                MediaStatus::Unavailable(SessionError::from(e))
            }
        };

        self.publish(|s| s.media = status);
    }

    async fn handle_signal(&mut self, signal: ServerSignal) {
        match signal {
            ServerSignal::AllUsers { users, role } => self.handle_snapshot(users, role).await,

            ServerSignal::GetOffer { sdp, round } => {
                if self.negotiator.state() == NegotiationState::Joining {
                    if self.early_offer.is_none() {
                        debug!("Offer arrived before the membership snapshot, holding it");
                        self.early_offer = Some((sdp, round));
                    }
                    return;
                }
                self.handle_offer(sdp, round).await;
            }

            ServerSignal::GetAnswer { sdp, round } => self.handle_answer(sdp, round).await,

            ServerSignal::GetCandidate { candidate } => self.handle_remote_candidate(candidate).await,

            ServerSignal::RoomFull { room } => self.fail(SessionError::RoomFull(room)),
        }
    }

    async fn handle_snapshot(&mut self, users: Vec<Participant>, assigned: Option<Role>) {
        let Some(role) = self.negotiator.determine_role(users.len(), assigned) else {
            warn!(
                "Ignoring membership snapshot in state {:?}",
                self.negotiator.state()
            );
            return;
        };

        self.joined = true;
        info!(
            "Joined room {} as {} ({} other participant(s))",
            self.room,
            role,
            users.len()
        );
        self.publish(|s| {
            s.role = Some(role);
            s.negotiation = NegotiationState::RoleDetermined(role);
        });

        match role {
            Role::Initiator => self.create_offer().await,
            Role::Responder => {
                if let Some((sdp, round)) = self.early_offer.take() {
                    self.handle_offer(sdp, round).await;
                }
            }
        }
    }

    async fn create_offer(&mut self) {
        let round = match self.negotiator.begin_offer() {
            Ok(round) => round,
            Err(e) => {
                warn!("Not creating offer: {}", e);
                return;
            }
        };

        let connection = self.connection.clone();
        let Some(result) = guarded(&self.shutdown, connection.create_offer()).await else {
            return;
        };
        let offer = match result {
            Ok(offer) => offer,
            Err(e) => return self.reject("create offer", e),
        };

        let Some(result) = guarded(&self.shutdown, connection.set_local_description(&offer)).await
        else {
            return;
        };
        if let Err(e) = result {
            return self.reject("set local offer", e);
        }

        info!("Sending offer for room {} (round {})", self.room, round);
        self.send(ClientSignal::Offer {
            sdp: offer,
            room: self.room.clone(),
            round,
        })
        .await;
        self.advance(NegotiationState::OfferSent);
    }

    async fn handle_offer(&mut self, sdp: SessionDescription, round: u64) {
        if sdp.kind() != SdpKind::Offer {
            warn!("Offer event carried a {} description, ignoring", sdp.kind());
            return;
        }
        if let Err(e) = self.negotiator.accept_offer(round) {
            warn!("Ignoring offer in room {}: {}", self.room, e);
            return;
        }
        info!("Received offer for room {} (round {})", self.room, round);

        let connection = self.connection.clone();
        let Some(result) = guarded(&self.shutdown, connection.set_remote_description(&sdp)).await
        else {
            return;
        };
        if let Err(e) = result {
            return self.reject("set remote offer", e);
        }
        self.remote_description_set = true;
        self.advance(NegotiationState::OfferReceived);
        self.flush_candidates().await;

        let Some(result) = guarded(&self.shutdown, connection.create_answer()).await else {
            return;
        };
        let answer = match result {
            Ok(answer) => answer,
            Err(e) => return self.reject("create answer", e),
        };

        let Some(result) =
            guarded(&self.shutdown, connection.set_local_description(&answer)).await
        else {
            return;
        };
        if let Err(e) = result {
            return self.reject("set local answer", e);
        }

        info!("Sending answer for room {} (round {})", self.room, round);
        self.send(ClientSignal::Answer {
            sdp: answer,
            room: self.room.clone(),
            round,
        })
        .await;
        if self.advance(NegotiationState::AnswerSent) {
            self.advance(NegotiationState::Connected);
        }
    }

    async fn handle_answer(&mut self, sdp: SessionDescription, round: u64) {
        if sdp.kind() != SdpKind::Answer {
            warn!("Answer event carried a {} description, ignoring", sdp.kind());
            return;
        }
        if let Err(e) = self.negotiator.accept_answer(round) {
            warn!("Ignoring answer in room {}: {}", self.room, e);
            return;
        }
        info!("Received answer for room {} (round {})", self.room, round);

        let connection = self.connection.clone();
        let Some(result) = guarded(&self.shutdown, connection.set_remote_description(&sdp)).await
        else {
            return;
        };
        if let Err(e) = result {
            return self.reject("set remote answer", e);
        }
        self.remote_description_set = true;
        if self.advance(NegotiationState::AnswerReceived) {
            self.flush_candidates().await;
            self.advance(NegotiationState::Connected);
        }
    }

    async fn handle_remote_candidate(&mut self, candidate: IceCandidate) {
        let readiness = if self.teardown.is_done() {
            Readiness::Closed
        } else if self.remote_description_set {
            Readiness::Ready
        } else {
            Readiness::AwaitingRemoteDescription
        };

        match self.candidates.accept_remote(candidate, readiness) {
            Disposition::Apply(candidate) => self.apply_candidate(candidate).await,
            Disposition::Queued => debug!(
                "Queued remote candidate until remote description ({} pending)",
                self.candidates.len()
            ),
            Disposition::Dropped => {}
        }
    }

    async fn flush_candidates(&mut self) {
        let pending = self.candidates.drain();
        if pending.is_empty() {
            return;
        }
        debug!("Applying {} queued remote candidate(s)", pending.len());
        for candidate in pending {
            self.apply_candidate(candidate).await;
        }
    }

    async fn apply_candidate(&mut self, candidate: IceCandidate) {
        let connection = self.connection.clone();
        let Some(result) = guarded(&self.shutdown, connection.add_ice_candidate(&candidate)).await
        else {
            return;
        };
        if let Err(e) = result {
            let err = SessionError::CandidateApplyFailed(e.to_string());
            warn!("{} ({})", err, candidate.candidate);
        }
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::CandidateGenerated(candidate) => {
                if let Some(candidate) = self.candidates.forward_local(candidate, self.joined) {
                    self.send(ClientSignal::Candidate {
                        candidate,
                        room: self.room.clone(),
                    })
                    .await;
                }
            }

            TransportEvent::RemoteTrack(track) => {
                let round = self.negotiator.round().unwrap_or(FIRST_ROUND);
                if self.media.bind_remote_track(track, round) {
                    info!("Remote stream bound for room {}", self.room);
                }
            }

            TransportEvent::StateChanged(state) => {
                debug!("Transport state for room {}: {:?}", self.room, state);
            }
        }
    }

    /// Outbound messages other than the join intent wait for the snapshot.
    async fn send(&self, signal: ClientSignal) {
        if self.shutdown.is_cancelled() {
            return;
        }
        if !self.joined {
            warn!("Not sending {} before the join succeeded", signal.event_name());
            return;
        }
        self.signaling.send(signal).await;
    }

    fn advance(&mut self, next: NegotiationState) -> bool {
        if let Err(e) = self.negotiator.advance(next) {
            error!("Room {}: {}", self.room, e);
            return false;
        }
        info!("Room {} -> {:?}", self.room, next);
        self.publish(|s| s.negotiation = next);
        true
    }

    fn reject(&self, step: &str, err: anyhow::Error) {
        let err = SessionError::NegotiationRejected(format!("{step}: {err:#}"));
        error!(
            "Room {}: {}. Negotiation abandoned in state {:?}",
            self.room,
            err,
            self.negotiator.state()
        );
    }

    fn fail(&mut self, err: SessionError) {
        error!("Session for room {} failed: {}", self.room, err);
        self.negotiator.close();
        self.status_tx.send_if_modified(|status| {
            if status.negotiation.is_closed() {
                return false;
            }
            status.failure = Some(err);
            status.negotiation = NegotiationState::Closed;
            true
        });
    }

    /// Status updates never land after teardown marked the session closed.
    fn publish(&self, update: impl FnOnce(&mut SessionStatus)) {
        self.status_tx.send_if_modified(|status| {
            if status.negotiation.is_closed() {
                return false;
            }
            update(status);
            true
        });
    }
}
