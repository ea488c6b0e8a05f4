use dashmap::DashMap;
use pairlink_core::utils::ROOM_CAPACITY;
use pairlink_core::{Participant, ParticipantId, Role, RoomId};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// `others` were already in the room when the participant arrived.
    Joined {
        others: Vec<Participant>,
        role: Role,
    },
    Full,
}

/// Room membership. Joins on the same room are serialized by the map's
/// entry lock, so two participants can never both see an empty room.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<DashMap<RoomId, Vec<ParticipantId>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self, room: &RoomId, participant: ParticipantId) -> JoinOutcome {
        let mut members = self.rooms.entry(room.clone()).or_default();

        if members.contains(&participant) {
            let others = others_of(&members, &participant);
            let role = Role::from_snapshot_len(others.len());
            return JoinOutcome::Joined { others, role };
        }

        if members.len() >= ROOM_CAPACITY {
            info!("Room {} is full, refusing {}", room, participant);
            return JoinOutcome::Full;
        }

        let others = others_of(&members, &participant);
        members.push(participant);
        let role = Role::from_snapshot_len(others.len());

        info!(
            "Participant {} joined room {} as {} ({} member(s))",
            participant,
            room,
            role,
            members.len()
        );
        JoinOutcome::Joined { others, role }
    }

    /// Removes the participant; empty rooms are dropped.
    pub fn leave(&self, room: &RoomId, participant: &ParticipantId) {
        let now_empty = match self.rooms.get_mut(room) {
            Some(mut members) => {
                members.retain(|id| id != participant);
                members.is_empty()
            }
            None => return,
        };

        if now_empty {
            self.rooms.remove_if(room, |_, members| members.is_empty());
            info!("Room {} closed", room);
        }
    }

    pub fn peers_of(&self, room: &RoomId, participant: &ParticipantId) -> Vec<ParticipantId> {
        self.rooms
            .get(room)
            .map(|members| {
                members
                    .iter()
                    .filter(|id| *id != participant)
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_member(&self, room: &RoomId, participant: &ParticipantId) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|members| members.contains(participant))
    }

    pub fn member_count(&self, room: &RoomId) -> usize {
        self.rooms.get(room).map(|members| members.len()).unwrap_or(0)
    }
}

fn others_of(members: &[ParticipantId], participant: &ParticipantId) -> Vec<Participant> {
    members
        .iter()
        .filter(|id| *id != participant)
        .map(|id| Participant::from(*id))
        .collect()
}
