use pairlink_core::{RoomId, RoomIdError};
use thiserror::Error;

/// Why local capture could not be started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("permission to capture media was denied")]
    PermissionDenied,
    #[error("no capture device available: {0}")]
    DeviceUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("signaling transport unavailable: {0}")]
    TransportUnavailable(String),
    #[error("peer connection could not be created: {0}")]
    ConnectionUnavailable(String),
    #[error("media access denied")]
    MediaAccessDenied,
    #[error("media device unavailable: {0}")]
    MediaDeviceUnavailable(String),
    #[error("negotiation rejected: {0}")]
    NegotiationRejected(String),
    #[error("remote candidate rejected: {0}")]
    CandidateApplyFailed(String),
    #[error("room '{0}' already has two participants")]
    RoomFull(RoomId),
    #[error(transparent)]
    InvalidRoom(#[from] RoomIdError),
}

impl From<MediaError> for SessionError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::PermissionDenied => SessionError::MediaAccessDenied,
            MediaError::DeviceUnavailable(reason) => SessionError::MediaDeviceUnavailable(reason),
        }
    }
}
