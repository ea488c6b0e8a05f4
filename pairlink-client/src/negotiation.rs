use pairlink_core::Role;
use pairlink_core::utils::FIRST_ROUND;
use thiserror::Error;
use tracing::debug;

/// Lifecycle of the single peer connection owned by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Idle,
    Joining,
    RoleDetermined(Role),
    OfferSent,
    OfferReceived,
    AnswerSent,
    AnswerReceived,
    Connected,
    Closed,
}

impl NegotiationState {
    pub fn can_transition_to(self, next: NegotiationState) -> bool {
        use NegotiationState::*;

        match (self, next) {
            (Closed, _) => false,
            (_, Closed) => true,
            (Idle, Joining) => true,
            (Joining, RoleDetermined(_)) => true,
            (RoleDetermined(Role::Initiator), OfferSent) => true,
            (RoleDetermined(Role::Responder), OfferReceived) => true,
            (OfferSent, AnswerReceived) => true,
            (OfferReceived, AnswerSent) => true,
            (AnswerReceived | AnswerSent, Connected) => true,
            _ => false,
        }
    }

    pub fn is_closed(self) -> bool {
        self == NegotiationState::Closed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NegotiationFault {
    #[error("cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        from: NegotiationState,
        to: NegotiationState,
    },
    #[error("only the initiator creates offers (state {0:?})")]
    NotInitiator(NegotiationState),
    #[error("offer for round {0} already created")]
    OfferAlreadyCreated(u64),
    #[error("offer not expected in state {0:?}")]
    UnexpectedOffer(NegotiationState),
    #[error("answer not expected in state {0:?}")]
    UnexpectedAnswer(NegotiationState),
    #[error("answer for round {got} does not match outstanding round {expected}")]
    StaleRound { expected: u64, got: u64 },
}

/// Pure bookkeeping for one negotiation: state, role and round fencing.
/// Performs no I/O; the session drives it around every suspension point.
#[derive(Debug)]
pub struct Negotiator {
    state: NegotiationState,
    role: Option<Role>,
    round: Option<u64>,
    answer_accepted: bool,
}

impl Negotiator {
    pub fn new() -> Self {
        Self {
            state: NegotiationState::Idle,
            role: None,
            round: None,
            answer_accepted: false,
        }
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Round of the offer this side created or accepted, if any.
    pub fn round(&self) -> Option<u64> {
        self.round
    }

    pub fn advance(&mut self, next: NegotiationState) -> Result<(), NegotiationFault> {
        if !self.state.can_transition_to(next) {
            return Err(NegotiationFault::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        debug!("negotiation {:?} -> {:?}", self.state, next);
        self.state = next;
        Ok(())
    }

    pub fn begin_join(&mut self) -> Result<(), NegotiationFault> {
        self.advance(NegotiationState::Joining)
    }

    /// One-shot role decision from the membership snapshot. A role assigned by
    /// the server wins over the inference from the snapshot size. Returns
    /// `None` when the role was already decided (or the session is not
    /// joining), in which case the snapshot is ignored.
    pub fn determine_role(&mut self, others: usize, assigned: Option<Role>) -> Option<Role> {
        if self.state != NegotiationState::Joining {
            return None;
        }
        let role = assigned.unwrap_or_else(|| Role::from_snapshot_len(others));
        self.advance(NegotiationState::RoleDetermined(role)).ok()?;
        self.role = Some(role);
        Some(role)
    }

    /// Reserves the round for the single offer this session may create.
    pub fn begin_offer(&mut self) -> Result<u64, NegotiationFault> {
        if self.state != NegotiationState::RoleDetermined(Role::Initiator) {
            return Err(NegotiationFault::NotInitiator(self.state));
        }
        if let Some(round) = self.round {
            return Err(NegotiationFault::OfferAlreadyCreated(round));
        }
        self.round = Some(FIRST_ROUND);
        Ok(FIRST_ROUND)
    }

    /// Fences incoming offers: only a responder that has not yet taken an
    /// offer accepts one. The offer's round becomes the session round.
    pub fn accept_offer(&mut self, round: u64) -> Result<(), NegotiationFault> {
        if self.state != NegotiationState::RoleDetermined(Role::Responder) || self.round.is_some() {
            return Err(NegotiationFault::UnexpectedOffer(self.state));
        }
        self.round = Some(round);
        Ok(())
    }

    /// Fences incoming answers against the outstanding offer.
    pub fn accept_answer(&mut self, round: u64) -> Result<(), NegotiationFault> {
        if self.state != NegotiationState::OfferSent || self.answer_accepted {
            return Err(NegotiationFault::UnexpectedAnswer(self.state));
        }
        let expected = self.round.unwrap_or(FIRST_ROUND);
        if round != expected {
            return Err(NegotiationFault::StaleRound {
                expected,
                got: round,
            });
        }
        self.answer_accepted = true;
        Ok(())
    }

    /// Returns `false` if the negotiator was already closed.
    pub fn close(&mut self) -> bool {
        if self.state.is_closed() {
            return false;
        }
        self.state = NegotiationState::Closed;
        true
    }
}

impl Default for Negotiator {
    fn default() -> Self {
        Self::new()
    }
}
