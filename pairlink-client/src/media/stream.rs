use dashmap::DashMap;
use std::sync::Arc;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

pub type LocalTrack = Arc<dyn TrackLocal + Send + Sync>;

/// What the user asked the capture device for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

/// Captured local media, ready to be attached to a connection.
#[derive(Clone)]
pub struct LocalStream {
    pub id: String,
    pub tracks: Vec<LocalTrack>,
}

impl LocalStream {
    pub fn new(id: impl Into<String>, tracks: Vec<LocalTrack>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl std::fmt::Debug for LocalStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.tracks.iter().map(|t| t.id()).collect();
        f.debug_struct("LocalStream")
            .field("id", &self.id)
            .field("tracks", &ids)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct RemoteTrack {
    pub id: String,
    pub stream_id: String,
    pub kind: RTPCodecType,
}

impl RemoteTrack {
    pub fn new(id: impl Into<String>, stream_id: impl Into<String>, kind: RTPCodecType) -> Self {
        Self {
            id: id.into(),
            stream_id: stream_id.into(),
            kind,
        }
    }

    pub fn from_remote(track: &TrackRemote) -> Self {
        Self {
            id: track.id(),
            stream_id: track.stream_id(),
            kind: track.kind(),
        }
    }
}

/// Media received from the other participant. Cheap to clone; tracks that
/// arrive after the stream was bound show up in every clone.
#[derive(Clone, Debug)]
pub struct RemoteStream {
    pub id: String,
    tracks: Arc<DashMap<String, RemoteTrack>>,
}

impl RemoteStream {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tracks: Arc::new(DashMap::new()),
        }
    }

    pub fn insert(&self, track: RemoteTrack) {
        self.tracks.insert(track.id.clone(), track);
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
