use crate::config::TransportConfig;
use crate::media::LocalTrack;
use crate::transport::TransportEvent;
use anyhow::Result;
use async_trait::async_trait;
use pairlink_core::{IceCandidate, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;

/// The negotiated media channel. Connectivity checks and media transport
/// happen behind this trait.
#[async_trait]
pub trait PeerConnection: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, description: &SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, description: &SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<()>;

    async fn add_track(&self, track: LocalTrack) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Creates the peer connection of a session. Events the connection produces
/// are pushed into `events`.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        config: &TransportConfig,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn PeerConnection>>;
}
