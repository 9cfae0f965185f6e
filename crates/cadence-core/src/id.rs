//! Typed object identifiers
//!
//! Every persisted object type occupies its own identifier namespace with
//! monotonically increasing sequence numbers. Identifiers are plain `u64`
//! newtypes so they can be stored, compared, and followed as on-disk
//! references without raw pointers.

use std::fmt;

/// A per-type monotone sequence identifier.
///
/// Implementations are newtypes over a `u64` sequence number assigned by
/// the object store. Sequence numbers are never reused, so ids are stable
/// across the lifetime of a chain.
pub trait ObjectId: Copy + Eq + Ord + fmt::Debug + fmt::Display {
    /// Object kind name, used in diagnostics and not-found errors
    const KIND: &'static str;

    /// Construct an id from a raw sequence number
    fn from_sequence(seq: u64) -> Self;

    /// The raw sequence number
    fn sequence(self) -> u64;
}

/// Define an [`ObjectId`] newtype with serde, ordering, and `Display`
/// (`kind.sequence`, e.g. `account.12`).
#[macro_export]
macro_rules! define_object_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(u64);

        impl $crate::id::ObjectId for $name {
            const KIND: &'static str = $kind;

            fn from_sequence(seq: u64) -> Self {
                Self(seq)
            }

            fn sequence(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($kind, ".{}"), self.0)
            }
        }
    };
}

define_object_id!(
    /// Identifier of an account object
    AccountId,
    "account"
);

define_object_id!(
    /// Identifier of an asset object
    AssetId,
    "asset"
);

define_object_id!(
    /// Identifier of a recurring withdrawal permission
    WithdrawPermissionId,
    "withdraw_permission"
);

define_object_id!(
    /// Identifier of an immutable operation history record
    OperationHistoryId,
    "operation_history"
);

define_object_id!(
    /// Identifier of a node in an account's history chain
    AccountHistoryNodeId,
    "account_history_node"
);
