use crate::error::SessionError;
use crate::media::{LocalStream, MediaDevices, RemoteStream, RemoteTrack, RenderTarget};
use crate::transport::PeerConnection;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Observable outcome of local media acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaStatus {
    Pending,
    Ready { tracks: usize },
    Unavailable(SessionError),
}

/// Connects capture devices and rendering surfaces to a session's connection.
pub struct MediaBinding {
    devices: Arc<dyn MediaDevices>,
    target: Arc<dyn RenderTarget>,
    local: Option<LocalStream>,
    remote: Option<RemoteStream>,
    remote_round: Option<u64>,
}

impl MediaBinding {
    pub fn new(devices: Arc<dyn MediaDevices>, target: Arc<dyn RenderTarget>) -> Self {
        Self {
            devices,
            target,
            local: None,
            remote: None,
            remote_round: None,
        }
    }

    pub fn devices(&self) -> Arc<dyn MediaDevices> {
        self.devices.clone()
    }

    /// Shows the stream locally and adds its tracks to `connection`.
    pub async fn bind_local(
        &mut self,
        stream: LocalStream,
        connection: &dyn PeerConnection,
    ) -> MediaStatus {
        self.target.attach_local(&stream);

        let mut attached = 0;
        for track in &stream.tracks {
            match connection.add_track(track.clone()).await {
                Ok(()) => attached += 1,
                Err(e) => warn!("Failed to attach local track {}: {:?}", track.id(), e),
            }
        }

        info!(
            "Local stream {} bound, {} track(s) attached",
            stream.id, attached
        );
        self.local = Some(stream);
        MediaStatus::Ready { tracks: attached }
    }

    /// Collects a remote track. The remote surface is bound at most once per
    /// negotiation round; returns whether this call bound it.
    pub fn bind_remote_track(&mut self, track: RemoteTrack, round: u64) -> bool {
        if self.remote_round == Some(round) {
            if let Some(stream) = &self.remote {
                debug!("Adding track {} to remote stream {}", track.id, stream.id);
                stream.insert(track);
            }
            return false;
        }

        let stream = RemoteStream::new(track.stream_id.clone());
        stream.insert(track);
        self.target.attach_remote(&stream);
        self.remote = Some(stream);
        self.remote_round = Some(round);
        true
    }

    pub fn release(&mut self) {
        if let Some(stream) = self.local.take() {
            debug!("Releasing local stream {}", stream.id);
        }
        self.remote = None;
    }
}
