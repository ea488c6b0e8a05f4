pub mod candidates;
pub mod config;
pub mod error;
pub mod media;
pub mod negotiation;
pub mod session;
pub mod signaling;
pub mod transport;

pub use candidates::{CandidateBuffer, Disposition, Readiness};
pub use config::{SessionConfig, TransportConfig};
pub use error::{MediaError, SessionError};
pub use media::{
    LocalStream, LocalTrack, LogRenderTarget, MediaBinding, MediaConstraints, MediaDevices,
    MediaStatus, NoDevices, RemoteStream, RemoteTrack, RenderTarget, SyntheticDevices,
};
pub use negotiation::{NegotiationFault, NegotiationState, Negotiator};
pub use session::{ConnectionSession, SessionStatus};
pub use signaling::{HandlerTable, LostHandler, SignalHandler, SignalingChannel, WsSignalingChannel};
pub use transport::{Connector, PeerConnection, TransportEvent, WebRtcConnection, WebRtcConnector};
