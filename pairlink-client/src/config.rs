use crate::media::MediaConstraints;
use pairlink_core::IceServerConfig;
use pairlink_core::utils::DEFAULT_STUN_ADDR;

/// Connectivity bootstrap for the peer connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl TransportConfig {
    /// Host candidates only. Enough for peers on the same machine or LAN.
    pub fn local_only() -> Self {
        Self {
            ice_servers: Vec::new(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig::stun(DEFAULT_STUN_ADDR)],
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub transport: TransportConfig,
    pub constraints: MediaConstraints,
    /// Remote candidates held while no remote description is set.
    pub candidate_queue_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            constraints: MediaConstraints::default(),
            candidate_queue_limit: 64,
        }
    }
}
