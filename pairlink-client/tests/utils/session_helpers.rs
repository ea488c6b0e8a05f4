use pairlink_client::{
    ConnectionSession, Connector, MediaBinding, MediaConstraints, MediaDevices, SessionConfig,
    SessionStatus, SignalingChannel, SyntheticDevices, TransportConfig,
};
use pairlink_core::{
    ClientSignal, IceCandidate, Participant, ParticipantId, Role, RoomId, ServerSignal,
    SessionDescription,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::{FakeConnection, RecordingTarget};

/// Timeout for a status change or an outbound signal (ms).
pub const STATUS_TIMEOUT_MS: u64 = 3000;

/// How long to wait before asserting that something did not happen (ms).
pub const QUIET_PERIOD_MS: u64 = 150;

pub fn room(name: &str) -> RoomId {
    RoomId::new(name).expect("valid room name")
}

/// Audio only, no STUN.
pub fn test_config() -> SessionConfig {
    SessionConfig {
        transport: TransportConfig::local_only(),
        constraints: MediaConstraints {
            audio: true,
            video: false,
        },
        ..SessionConfig::default()
    }
}

pub fn synthetic_devices() -> Arc<dyn MediaDevices> {
    Arc::new(SyntheticDevices::new("test-local"))
}

pub async fn start_session(
    room: &RoomId,
    signaling: Arc<dyn SignalingChannel>,
    connector: &dyn Connector,
    devices: Arc<dyn MediaDevices>,
    target: Arc<RecordingTarget>,
) -> ConnectionSession {
    ConnectionSession::join(
        room.clone(),
        signaling,
        connector,
        MediaBinding::new(devices, target),
        test_config(),
    )
    .await
    .expect("Failed to start session")
}

pub async fn wait_status(
    session: &ConnectionSession,
    predicate: impl FnMut(&SessionStatus) -> bool,
) -> SessionStatus {
    match tokio::time::timeout(
        Duration::from_millis(STATUS_TIMEOUT_MS),
        session.wait_for(predicate),
    )
    .await
    {
        Ok(status) => status,
        Err(_) => panic!(
            "Timeout waiting for status, last seen {:?}",
            session.status()
        ),
    }
}

pub async fn next_sent(rx: &mut mpsc::UnboundedReceiver<ClientSignal>) -> ClientSignal {
    tokio::time::timeout(Duration::from_millis(STATUS_TIMEOUT_MS), rx.recv())
        .await
        .expect("Timeout waiting for outbound signal")
        .expect("Signaling mock dropped")
}

pub async fn assert_nothing_sent(rx: &mut mpsc::UnboundedReceiver<ClientSignal>) {
    tokio::time::sleep(Duration::from_millis(QUIET_PERIOD_MS)).await;
    if let Ok(signal) = rx.try_recv() {
        panic!("Unexpected outbound signal: {:?}", signal);
    }
}

/// Polls the fake connection until `prefix` shows up `times` times.
pub async fn wait_for_calls(connection: &FakeConnection, prefix: &str, times: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_millis(STATUS_TIMEOUT_MS);
    while connection.count(prefix) < times {
        if tokio::time::Instant::now() > deadline {
            panic!(
                "Timeout waiting for {} x{}, calls: {:?}",
                prefix,
                times,
                connection.calls()
            );
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

pub fn snapshot(others: usize, role: Option<Role>) -> ServerSignal {
    ServerSignal::AllUsers {
        users: (0..others)
            .map(|_| Participant::from(ParticipantId::new()))
            .collect(),
        role,
    }
}

pub fn remote_offer(sdp: &str, round: u64) -> ServerSignal {
    ServerSignal::GetOffer {
        sdp: SessionDescription::offer(sdp),
        round,
    }
}

pub fn remote_answer(sdp: &str, round: u64) -> ServerSignal {
    ServerSignal::GetAnswer {
        sdp: SessionDescription::answer(sdp),
        round,
    }
}

pub fn remote_candidate_text(n: u32) -> String {
    format!("candidate:{n} 1 udp 1 10.0.0.{n} 6000 typ host")
}

pub fn remote_candidate(n: u32) -> ServerSignal {
    ServerSignal::GetCandidate {
        candidate: IceCandidate::new(remote_candidate_text(n)),
    }
}
