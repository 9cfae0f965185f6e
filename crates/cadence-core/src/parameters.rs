//! Consensus-critical chain parameters

use serde::{Deserialize, Serialize};

/// Default block interval in seconds
pub const DEFAULT_BLOCK_INTERVAL_SEC: u32 = 5;

/// Global chain parameters relevant to the state-transition core.
///
/// Carried in an explicit context value rather than ambient global state
/// so evaluators stay pure and testable in isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParameters {
    /// Target interval between blocks, in seconds. Withdrawal periods
    /// shorter than one block interval are rejected.
    pub block_interval_sec: u32,
}

impl Default for ChainParameters {
    fn default() -> Self {
        Self {
            block_interval_sec: DEFAULT_BLOCK_INTERVAL_SEC,
        }
    }
}
