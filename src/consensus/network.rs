//! Per-chain network parameter sets
//!
//! Every tracked foreign chain instance carries its own parameter set,
//! chosen at genesis time and persisted with the chain's state. Parameters
//! are always passed as explicit values, never held as process-global state,
//! so several chains with different rule sets can be synced side by side.

use serde::{Deserialize, Serialize};

/// Proof-of-work rule parameters for one foreign chain instance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkParams {
    /// Easiest permitted target, compact form
    pub pow_limit_bits: u32,
    /// Expected wall time of one retarget period, in seconds
    pub target_timespan_secs: u64,
    /// Expected spacing between blocks, in seconds
    pub target_spacing_secs: u64,
    /// Maximum retarget swing per period (clamped both directions)
    pub adjustment_factor: u64,
    /// Regression networks keep the parent's bits forever
    pub no_retargeting: bool,
}

impl NetworkParams {
    /// Main network: 2016-block periods, two-week timespan, 4x clamp
    pub fn mainnet() -> Self {
        Self {
            pow_limit_bits: 0x1d00ffff,
            target_timespan_secs: 14 * 24 * 60 * 60,
            target_spacing_secs: 10 * 60,
            adjustment_factor: 4,
            no_retargeting: false,
        }
    }

    /// Regression network: near-trivial PoW, retargeting disabled
    pub fn regtest() -> Self {
        Self {
            pow_limit_bits: 0x207fffff,
            target_timespan_secs: 14 * 24 * 60 * 60,
            target_spacing_secs: 10 * 60,
            adjustment_factor: 4,
            no_retargeting: true,
        }
    }

    /// Number of blocks between difficulty retargets
    pub fn retarget_interval(&self) -> u32 {
        (self.target_timespan_secs / self.target_spacing_secs) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_interval_is_2016() {
        assert_eq!(NetworkParams::mainnet().retarget_interval(), 2016);
    }

    #[test]
    fn test_regtest_disables_retargeting() {
        let params = NetworkParams::regtest();
        assert!(params.no_retargeting);
        assert_eq!(params.pow_limit_bits, 0x207fffff);
    }
}
