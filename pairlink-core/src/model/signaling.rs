use crate::model::candidate::IceCandidate;
use crate::model::description::SessionDescription;
use crate::model::participant::Participant;
use crate::model::role::Role;
use crate::model::room::RoomId;
use crate::utils::first_round;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// Messages a participant sends to the rendezvous server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientSignal {
    #[serde(rename = "join_room")]
    JoinRoom { room: RoomId },
    #[serde(rename = "offer")]
    Offer {
        sdp: SessionDescription,
        room: RoomId,
        #[serde(default = "first_round")]
        round: u64,
    },
    #[serde(rename = "answer")]
    Answer {
        sdp: SessionDescription,
        room: RoomId,
        #[serde(default = "first_round")]
        round: u64,
    },
    #[serde(rename = "candidate")]
    Candidate { candidate: IceCandidate, room: RoomId },
}

impl ClientSignal {
    pub fn event_name(&self) -> &'static str {
        match self {
            ClientSignal::JoinRoom { .. } => "join_room",
            ClientSignal::Offer { .. } => "offer",
            ClientSignal::Answer { .. } => "answer",
            ClientSignal::Candidate { .. } => "candidate",
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Inbound event kinds a signaling channel dispatches to handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    MembershipSnapshot,
    OfferReceived,
    AnswerReceived,
    CandidateReceived,
    RoomFull,
}

/// Messages the rendezvous server delivers to a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerSignal {
    /// Reply to `join_room`: the other participants already present and the
    /// role the server assigned to the joiner.
    #[serde(rename = "all_users")]
    AllUsers {
        users: Vec<Participant>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<Role>,
    },
    #[serde(rename = "getOffer")]
    GetOffer {
        sdp: SessionDescription,
        #[serde(default = "first_round")]
        round: u64,
    },
    #[serde(rename = "getAnswer")]
    GetAnswer {
        sdp: SessionDescription,
        #[serde(default = "first_round")]
        round: u64,
    },
    #[serde(rename = "getCandidate")]
    GetCandidate { candidate: IceCandidate },
    #[serde(rename = "room_full")]
    RoomFull { room: RoomId },
}

impl ServerSignal {
    pub fn kind(&self) -> SignalKind {
        match self {
            ServerSignal::AllUsers { .. } => SignalKind::MembershipSnapshot,
            ServerSignal::GetOffer { .. } => SignalKind::OfferReceived,
            ServerSignal::GetAnswer { .. } => SignalKind::AnswerReceived,
            ServerSignal::GetCandidate { .. } => SignalKind::CandidateReceived,
            ServerSignal::RoomFull { .. } => SignalKind::RoomFull,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
