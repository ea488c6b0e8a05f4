mod candidate;
mod description;
mod participant;
mod role;
mod room;
mod signaling;

pub use candidate::IceCandidate;
pub use description::{SdpKind, SessionDescription};
pub use participant::{Participant, ParticipantId};
pub use role::Role;
pub use room::{RoomId, RoomIdError};
pub use signaling::{ClientSignal, IceServerConfig, ServerSignal, SignalKind};
