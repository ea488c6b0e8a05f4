use crate::room::{JoinOutcome, RoomRegistry};
use dashmap::DashMap;
use pairlink_core::{ClientSignal, ParticipantId, RoomId, ServerSignal};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

struct PeerEntry {
    tx: mpsc::UnboundedSender<ServerSignal>,
    room: Option<RoomId>,
}

struct SignalingInner {
    peers: DashMap<ParticipantId, PeerEntry>,
    rooms: RoomRegistry,
}

/// Rendezvous logic shared by every socket: membership, role assignment and
/// relay of negotiation payloads to the other member of a room.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
                rooms: RoomRegistry::new(),
            }),
        }
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.inner.rooms
    }

    pub fn add_peer(&self, id: ParticipantId, tx: mpsc::UnboundedSender<ServerSignal>) {
        self.inner.peers.insert(id, PeerEntry { tx, room: None });
    }

    /// Drops the peer and frees its room slot.
    pub fn remove_peer(&self, id: &ParticipantId) {
        if let Some((_, entry)) = self.inner.peers.remove(id) {
            if let Some(room) = entry.room {
                self.inner.rooms.leave(&room, id);
            }
        }
    }

    pub fn handle(&self, from: ParticipantId, signal: ClientSignal) {
        debug!("{} from {}", signal.event_name(), from);

        match signal {
            ClientSignal::JoinRoom { room } => self.join(from, room),
            ClientSignal::Offer { sdp, room, round } => {
                self.relay(&from, &room, ServerSignal::GetOffer { sdp, round })
            }
            ClientSignal::Answer { sdp, room, round } => {
                self.relay(&from, &room, ServerSignal::GetAnswer { sdp, round })
            }
            ClientSignal::Candidate { candidate, room } => {
                self.relay(&from, &room, ServerSignal::GetCandidate { candidate })
            }
        }
    }

    fn join(&self, from: ParticipantId, room: RoomId) {
        let previous = match self.inner.peers.get(&from) {
            Some(entry) => entry.room.clone(),
            None => {
                warn!("Join from unknown participant {}", from);
                return;
            }
        };
        if let Some(previous) = previous.filter(|r| r != &room) {
            info!("Participant {} moves from room {} to {}", from, previous, room);
            self.inner.rooms.leave(&previous, &from);
        }

        let reply = match self.inner.rooms.join(&room, from) {
            JoinOutcome::Joined { others, role } => {
                if let Some(mut entry) = self.inner.peers.get_mut(&from) {
                    entry.room = Some(room);
                }
                ServerSignal::AllUsers {
                    users: others,
                    role: Some(role),
                }
            }
            JoinOutcome::Full => ServerSignal::RoomFull { room },
        };

        self.send_signal(&from, reply);
    }

    fn relay(&self, from: &ParticipantId, room: &RoomId, signal: ServerSignal) {
        if !self.inner.rooms.is_member(room, from) {
            warn!(
                "Dropping {:?} from {}: not a member of room {}",
                signal.kind(),
                from,
                room
            );
            return;
        }

        for peer in self.inner.rooms.peers_of(room, from) {
            self.send_signal(&peer, signal.clone());
        }
    }

    pub fn send_signal(&self, to: &ParticipantId, signal: ServerSignal) {
        if let Some(peer) = self.inner.peers.get(to) {
            if let Err(e) = peer.tx.send(signal) {
                error!("Failed to queue signal for {}: {}", to, e);
            }
        } else {
            warn!("Attempted to send signal to disconnected participant {}", to);
        }
    }
}

impl Default for SignalingService {
    fn default() -> Self {
        Self::new()
    }
}
