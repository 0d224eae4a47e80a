//! Core identifiers and newtypes shared across the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two diffed buffers a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The buffer before the change.
    Original,
    /// The buffer after the change.
    Modified,
}

impl Side {
    /// Both sides, original first.
    pub const BOTH: [Side; 2] = [Side::Original, Side::Modified];

    /// The opposite side.
    pub fn other(self) -> Self {
        match self {
            Side::Original => Side::Modified,
            Side::Modified => Side::Original,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Original => f.write_str("original"),
            Side::Modified => f.write_str("modified"),
        }
    }
}

/// A value held once per side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerSide<T> {
    /// Value for the original side.
    pub original: T,
    /// Value for the modified side.
    pub modified: T,
}

impl<T> PerSide<T> {
    /// Create from both values.
    pub fn new(original: T, modified: T) -> Self {
        Self { original, modified }
    }

    /// Borrow the value for `side`.
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Original => &self.original,
            Side::Modified => &self.modified,
        }
    }

    /// Mutably borrow the value for `side`.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Original => &mut self.original,
            Side::Modified => &mut self.modified,
        }
    }
}

/// Host-allocated identifier of an installed view zone or whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u64);

/// Opaque host handle standing in for rendered content (deleted-code blocks,
/// revert affordances). The engine threads it through descriptors and hands
/// it back for release; it never looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayloadHandle(pub u64);

/// Milliseconds on a host-defined monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from raw milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Raw milliseconds.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// This timestamp moved forward by `millis`, saturating.
    pub fn saturating_add(&self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is later.
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}
