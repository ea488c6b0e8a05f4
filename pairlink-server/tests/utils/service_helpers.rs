use anyhow::{Context, Result};
use pairlink_core::{
    ClientSignal, IceCandidate, ParticipantId, RoomId, ServerSignal, SessionDescription,
};
use pairlink_server::SignalingService;
use std::time::Duration;
use tokio::sync::mpsc;

/// Timeout for a single signal delivery (ms).
pub const SIGNAL_TIMEOUT_MS: u64 = 2000;

/// A participant attached straight to the service, without a socket.
pub struct TestPeer {
    pub id: ParticipantId,
    rx: mpsc::UnboundedReceiver<ServerSignal>,
}

impl TestPeer {
    pub fn attach(service: &SignalingService) -> Self {
        let id = ParticipantId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        service.add_peer(id, tx);
        Self { id, rx }
    }

    pub async fn recv(&mut self) -> Result<ServerSignal> {
        tokio::time::timeout(Duration::from_millis(SIGNAL_TIMEOUT_MS), self.rx.recv())
            .await
            .context("Timeout waiting for signal")?
            .context("Signal channel closed")
    }

    /// Asserts that nothing is pending right now.
    pub fn assert_idle(&mut self) {
        if let Ok(signal) = self.rx.try_recv() {
            panic!("Unexpected signal for {}: {:?}", self.id, signal);
        }
    }
}

pub fn room(name: &str) -> RoomId {
    RoomId::new(name).expect("valid room name")
}

pub fn join(room: &RoomId) -> ClientSignal {
    ClientSignal::JoinRoom { room: room.clone() }
}

pub fn offer(room: &RoomId, round: u64) -> ClientSignal {
    ClientSignal::Offer {
        sdp: SessionDescription::offer(format!("v=0 offer-{round}")),
        room: room.clone(),
        round,
    }
}

pub fn answer(room: &RoomId, round: u64) -> ClientSignal {
    ClientSignal::Answer {
        sdp: SessionDescription::answer(format!("v=0 answer-{round}")),
        room: room.clone(),
        round,
    }
}

pub fn candidate(room: &RoomId, n: u32) -> ClientSignal {
    ClientSignal::Candidate {
        candidate: IceCandidate::new(format!("candidate:{n} 1 udp 1 10.0.0.{n} 5000 typ host")),
        room: room.clone(),
    }
}
