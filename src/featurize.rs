//! State featurization: snapshots into canonical table keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::Snapshot;

/// A canonical, hashable key for a board state.
///
/// The key has two components serialized in row-major order: an occupancy
/// signature (one character per cell) and an age signature (decimal ages,
/// comma-separated so multi-digit ages cannot collide). Two snapshots
/// produce the same key iff their occupancy and ages are identical, so the
/// key is safe as a lookup index with no floating-point comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateKey(String);

impl StateKey {
    /// Build the key for a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut key = String::with_capacity(snapshot.cells.len() * 3);
        for cell in &snapshot.cells {
            key.push(cell.to_char());
        }
        key.push('|');
        for (i, age) in snapshot.ages.iter().enumerate() {
            if i > 0 {
                key.push(',');
            }
            key.push_str(&age.to_string());
        }
        StateKey(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Construct a key from a raw string (tests only).
    #[cfg(test)]
    pub(crate) fn raw(s: &str) -> Self {
        StateKey(s.to_string())
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
