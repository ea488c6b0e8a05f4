use pairlink_core::IceCandidate;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// What the session can currently do with a remote candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    NoConnection,
    AwaitingRemoteDescription,
    Ready,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Apply(IceCandidate),
    Queued,
    Dropped,
}

/// Remote candidates that arrived before the remote description.
#[derive(Debug)]
pub struct CandidateBuffer {
    pending: VecDeque<IceCandidate>,
    limit: usize,
    dropped: u64,
}

impl CandidateBuffer {
    pub fn new(limit: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            limit,
            dropped: 0,
        }
    }

    /// Local candidates go straight out once the join succeeded, never before.
    pub fn forward_local(&mut self, candidate: IceCandidate, joined: bool) -> Option<IceCandidate> {
        if joined {
            return Some(candidate);
        }
        debug!("Dropping local candidate discovered before join");
        self.dropped += 1;
        None
    }

    pub fn accept_remote(&mut self, candidate: IceCandidate, readiness: Readiness) -> Disposition {
        match readiness {
            Readiness::Ready => Disposition::Apply(candidate),
            Readiness::AwaitingRemoteDescription => {
                if self.limit == 0 {
                    self.dropped += 1;
                    return Disposition::Dropped;
                }
                if self.pending.len() >= self.limit {
                    warn!(
                        "Remote candidate queue full ({}), dropping oldest",
                        self.limit
                    );
                    self.pending.pop_front();
                    self.dropped += 1;
                }
                self.pending.push_back(candidate);
                Disposition::Queued
            }
            Readiness::NoConnection | Readiness::Closed => {
                debug!("Dropping remote candidate ({:?})", readiness);
                self.dropped += 1;
                Disposition::Dropped
            }
        }
    }

    /// Queued candidates in arrival order.
    pub fn drain(&mut self) -> Vec<IceCandidate> {
        self.pending.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
