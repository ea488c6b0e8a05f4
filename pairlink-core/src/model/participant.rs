use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier the rendezvous server assigns to each connected socket.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Entry of a membership snapshot.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
}

impl From<ParticipantId> for Participant {
    fn from(id: ParticipantId) -> Self {
        Self { id }
    }
}
