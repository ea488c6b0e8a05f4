/// Public STUN endpoint used when no connectivity servers are configured.
pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";

/// Hard cap on participants per room. Only two-party calls are negotiated.
pub const ROOM_CAPACITY: usize = 2;

/// First negotiation round of every session.
pub const FIRST_ROUND: u64 = 1;

pub(crate) fn first_round() -> u64 {
    FIRST_ROUND
}
