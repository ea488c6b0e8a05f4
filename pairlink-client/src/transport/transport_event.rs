use crate::media::RemoteTrack;
use pairlink_core::IceCandidate;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;

/// Events a peer connection reports back to its session.
#[derive(Debug)]
pub enum TransportEvent {
    /// Locally gathered candidate that has to reach the other participant.
    CandidateGenerated(IceCandidate),

    /// Inbound media from the other participant.
    RemoteTrack(RemoteTrack),

    StateChanged(RTCPeerConnectionState),
}
