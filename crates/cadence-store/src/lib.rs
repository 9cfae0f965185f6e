//! # Cadence Store - Typed Object Tables
//!
//! The object store underneath the state-transition core: one [`Table`]
//! per object type, addressed by per-type monotone sequence ids.
//!
//! The store is strictly single-writer. All mutation goes through three
//! primitives: `create` with an initializer, `modify` with a scoped
//! mutator closure, and `remove`. Reads never observe a partial write
//! because operations are applied sequentially in block order.
//!
//! Sequence numbers are never reused, so ids stay stable after removals
//! and newly created objects always sort after everything that existed
//! before them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use cadence_core::{Error, ObjectId, Result};
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// A typed, ID-addressed object table.
///
/// Rows are owned by value; callers hold ids, never references, across
/// operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<K: ObjectId, V> {
    rows: BTreeMap<u64, V>,
    next_seq: u64,
    _key: PhantomData<K>,
}

impl<K: ObjectId, V> Table<K, V> {
    /// Create an empty table. The first assigned id has sequence 0.
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_seq: 0,
            _key: PhantomData,
        }
    }

    /// The id the next `create` call will assign
    pub fn next_id(&self) -> K {
        K::from_sequence(self.next_seq)
    }

    /// Allocate the next sequence id, build the row with `init`, and
    /// store it. Returns the new row's id.
    pub fn create(&mut self, init: impl FnOnce(K) -> V) -> K {
        let id = K::from_sequence(self.next_seq);
        self.next_seq += 1;
        self.rows.insert(id.sequence(), init(id));
        id
    }

    /// Look up a row, failing with [`Error::NotFound`] on a miss
    pub fn get(&self, id: K) -> Result<&V> {
        self.rows
            .get(&id.sequence())
            .ok_or_else(|| Error::not_found(K::KIND, id.sequence()))
    }

    /// Look up a row that may not exist
    pub fn find(&self, id: K) -> Option<&V> {
        self.rows.get(&id.sequence())
    }

    /// Apply `mutator` to the row under exclusive scoped access.
    ///
    /// This is the single in-place write path; the mutation commits when
    /// the closure returns.
    pub fn modify<R>(&mut self, id: K, mutator: impl FnOnce(&mut V) -> R) -> Result<R> {
        let row = self
            .rows
            .get_mut(&id.sequence())
            .ok_or_else(|| Error::not_found(K::KIND, id.sequence()))?;
        Ok(mutator(row))
    }

    /// Remove and return the row. The id is retired, never reassigned.
    pub fn remove(&mut self, id: K) -> Result<V> {
        self.rows
            .remove(&id.sequence())
            .ok_or_else(|| Error::not_found(K::KIND, id.sequence()))
    }

    /// Iterate rows in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> {
        self.rows
            .iter()
            .map(|(seq, row)| (K::from_sequence(*seq), row))
    }

    /// Number of live rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<K: ObjectId, V> Default for Table<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
