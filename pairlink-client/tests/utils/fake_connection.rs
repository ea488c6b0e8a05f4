use anyhow::{Result, bail};
use async_trait::async_trait;
use pairlink_client::{Connector, LocalTrack, PeerConnection, TransportConfig, TransportEvent};
use pairlink_core::{IceCandidate, SessionDescription};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, mpsc};

pub const LOCAL_CANDIDATE: &str = "candidate:1 1 udp 2130706431 192.168.0.2 50000 typ host";

/// PeerConnection without a network. Every call is recorded as a short
/// string such as `set_remote:offer` or `add_candidate:<candidate>`.
///
/// Descriptions containing `malformed` and candidates containing `bogus`
/// are rejected. Setting a local description emits one local candidate.
pub struct FakeConnection {
    calls: Mutex<Vec<String>>,
    events: mpsc::Sender<TransportEvent>,
    offer_gate: Option<Arc<Notify>>,
    track_gate: Option<Arc<Notify>>,
}

impl FakeConnection {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Position of the first call starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls().iter().position(|c| c.starts_with(prefix))
    }

    /// Injects an event as if the network produced it.
    pub async fn emit(&self, event: TransportEvent) {
        self.events.send(event).await.unwrap();
    }
}

#[async_trait]
impl PeerConnection for FakeConnection {
    async fn create_offer(&self) -> Result<SessionDescription> {
        self.record("create_offer");
        if let Some(gate) = &self.offer_gate {
            gate.notified().await;
        }
        Ok(SessionDescription::offer("v=0 fake-offer"))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        self.record("create_answer");
        Ok(SessionDescription::answer("v=0 fake-answer"))
    }

    async fn set_local_description(&self, description: &SessionDescription) -> Result<()> {
        self.record(format!("set_local:{}", description.kind()));
        let _ = self
            .events
            .send(TransportEvent::CandidateGenerated(IceCandidate::new(
                LOCAL_CANDIDATE,
            )))
            .await;
        Ok(())
    }

    async fn set_remote_description(&self, description: &SessionDescription) -> Result<()> {
        if description.sdp().contains("malformed") {
            self.record(format!("set_remote_failed:{}", description.kind()));
            bail!("unparsable session description");
        }
        self.record(format!("set_remote:{}", description.kind()));
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<()> {
        self.record(format!("add_candidate:{}", candidate.candidate));
        if candidate.candidate.contains("bogus") {
            bail!("candidate rejected");
        }
        Ok(())
    }

    async fn add_track(&self, track: LocalTrack) -> Result<()> {
        self.record(format!("add_track:{}", track.id()));
        if let Some(gate) = &self.track_gate {
            gate.notified().await;
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.record("close");
        Ok(())
    }
}

/// Hands out one `FakeConnection` and keeps it for inspection.
#[derive(Default)]
pub struct FakeConnector {
    connection: Mutex<Option<Arc<FakeConnection>>>,
    offer_gate: Option<Arc<Notify>>,
    track_gate: Option<Arc<Notify>>,
    fail: bool,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// `create_offer` blocks until the returned gate is notified.
    pub fn holding_offer() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let connector = Self {
            offer_gate: Some(gate.clone()),
            ..Self::default()
        };
        (connector, gate)
    }

    /// `add_track` blocks until the returned gate is notified.
    pub fn holding_tracks() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let connector = Self {
            track_gate: Some(gate.clone()),
            ..Self::default()
        };
        (connector, gate)
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn connection(&self) -> Arc<FakeConnection> {
        self.connection
            .lock()
            .unwrap()
            .clone()
            .expect("no connection created yet")
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(
        &self,
        _config: &TransportConfig,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn PeerConnection>> {
        if self.fail {
            bail!("peer connection factory unavailable");
        }
        let connection = Arc::new(FakeConnection {
            calls: Mutex::new(Vec::new()),
            events,
            offer_gate: self.offer_gate.clone(),
            track_gate: self.track_gate.clone(),
        });
        *self.connection.lock().unwrap() = Some(connection.clone());
        Ok(connection)
    }
}
