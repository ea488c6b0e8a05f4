use crate::error::SessionError;
use crate::media::MediaStatus;
use crate::negotiation::NegotiationState;
use pairlink_core::Role;

/// Snapshot of a session as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub negotiation: NegotiationState,
    pub role: Option<Role>,
    pub media: MediaStatus,
    /// Set when the session closed itself (server refused the join, the
    /// signaling transport went away).
    pub failure: Option<SessionError>,
}

impl SessionStatus {
    pub(crate) fn new() -> Self {
        Self {
            negotiation: NegotiationState::Idle,
            role: None,
            media: MediaStatus::Pending,
            failure: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.negotiation == NegotiationState::Connected
    }

    pub fn is_closed(&self) -> bool {
        self.negotiation.is_closed()
    }
}
