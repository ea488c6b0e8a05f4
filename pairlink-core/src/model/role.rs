use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the two-party negotiation creates the offer.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Initiator,
    Responder,
}

impl Role {
    /// Whoever finds somebody already in the room initiates.
    pub fn from_snapshot_len(others: usize) -> Self {
        if others > 0 {
            Role::Initiator
        } else {
            Role::Responder
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Initiator => f.write_str("initiator"),
            Role::Responder => f.write_str("responder"),
        }
    }
}
