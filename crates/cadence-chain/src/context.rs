//! Evaluation context
//!
//! Chain time and global parameters are passed explicitly into every
//! evaluate/apply call instead of living in ambient global state, keeping
//! the state machine pure and testable in isolation.

use cadence_core::{ChainParameters, ChainTime};

/// The slice of chain state an evaluator may read besides the object
/// store: the head block's timestamp and the global parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainContext {
    /// Timestamp of the current head block
    pub head_block_time: ChainTime,
    /// Global consensus parameters
    pub parameters: ChainParameters,
}

impl ChainContext {
    /// Build a context for evaluating at `head_block_time`
    pub fn new(head_block_time: ChainTime, parameters: ChainParameters) -> Self {
        Self {
            head_block_time,
            parameters,
        }
    }

    /// Shortest withdrawal period the chain accepts, in seconds. Periods
    /// shorter than one block interval could never be claimed precisely.
    pub fn min_withdrawal_period_sec(&self) -> u64 {
        u64::from(self.parameters.block_interval_sec)
    }
}
