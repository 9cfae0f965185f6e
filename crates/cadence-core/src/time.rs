//! Chain timestamps
//!
//! Consensus time is whole seconds since the Unix epoch. Period and
//! expiration arithmetic must be identical on every node, so all
//! operations are checked: overflow is surfaced to the caller instead of
//! wrapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A chain timestamp in whole seconds since the Unix epoch
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct ChainTime(u64);

impl ChainTime {
    /// Construct from seconds since the Unix epoch
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Seconds since the Unix epoch
    pub const fn secs(self) -> u64 {
        self.0
    }

    /// Advance by `secs`, or `None` on overflow
    pub fn checked_add_secs(self, secs: u64) -> Option<Self> {
        self.0.checked_add(secs).map(Self)
    }

    /// Whole seconds elapsed since `earlier`, saturating to zero when
    /// `earlier` lies in the future.
    pub fn secs_since(self, earlier: ChainTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for ChainTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
