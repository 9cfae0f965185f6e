//! Unified error type for ledger operations
//!
//! The taxonomy separates recoverable validation failures (reject the
//! transaction, nothing changed) from internal invariant violations
//! (caller contract breach, abort the apply).

use serde::{Deserialize, Serialize};

/// Unified error type for all Cadence operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    /// An evaluate-phase predicate failed. Carries the violated predicate
    /// and the offending operation payload for diagnostics. Always
    /// recoverable: no state was mutated and the operation may be retried
    /// against a later chain state.
    #[error("validation failed: {predicate} (operation: {operation})")]
    Validation {
        /// Human-readable description of the violated predicate
        predicate: String,
        /// The offending operation payload, serialized for diagnostics
        operation: String,
    },

    /// A referenced object id did not resolve. Same recovery path as a
    /// validation failure.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Object kind, e.g. `account` or `withdraw_permission`
        kind: String,
        /// Per-type sequence number that failed to resolve
        id: u64,
    },

    /// An internal invariant was violated, e.g. apply invoked without a
    /// prior successful evaluate, or overflow in period arithmetic. Not
    /// user input; the enclosing operation must abort with no partial
    /// mutation visible.
    #[error("internal invariant violated: {message}")]
    Internal {
        /// Description of the violated invariant
        message: String,
    },
}

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a validation error from a predicate description and the
    /// offending operation payload.
    pub fn validation(predicate: impl Into<String>, operation: &impl Serialize) -> Self {
        let operation = serde_json::to_string(operation)
            .unwrap_or_else(|_| "<unserializable operation>".to_string());
        Self::Validation {
            predicate: predicate.into(),
            operation,
        }
    }

    /// Create a not-found error for an object kind and sequence id
    pub fn not_found(kind: impl Into<String>, id: u64) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id,
        }
    }

    /// Create an internal invariant-violation error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the caller may recover by rejecting the transaction and
    /// retrying later. True for validation and not-found errors.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NotFound { .. })
    }
}

/// Assert an evaluate-phase predicate, returning [`Error::Validation`]
/// with the predicate text and the serialized operation on failure.
///
/// ```
/// use cadence_core::{ensure, Result};
///
/// fn check(limit: i64, op: &serde_json::Value) -> Result<()> {
///     ensure!(limit > 0, "withdrawal_limit.amount > 0", op);
///     Ok(())
/// }
/// assert!(check(0, &serde_json::json!({})).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $predicate:expr, $op:expr) => {
        if !$cond {
            return Err($crate::Error::validation($predicate, $op));
        }
    };
}
