// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AURUM (AUR) — VOTING-WEIGHT CHECKPOINT STORE
//
// Append-only per-account history of voting weight, indexed by block height.
// Heights are strictly increasing across distinct entries; a write at the
// tail's height coalesces with it instead of appending a duplicate.
// Historical lookup is an upper-bound binary search.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::u128_str;
use crate::Address;

/// A single `(height, weight)` entry in an account's voting history.
/// Immutable once a later height has been recorded after it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub height: u64,
    #[serde(with = "u128_str")]
    pub weight: u128,
}

/// Per-account growable arrays of checkpoints.
/// Histories are created lazily on first write and never deleted.
/// MAINNET: BTreeMap for deterministic iteration and serialization.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CheckpointStore {
    histories: BTreeMap<Address, Vec<Checkpoint>>,
}

impl CheckpointStore {
    pub fn new() -> Self {
        Self {
            histories: BTreeMap::new(),
        }
    }

    /// Record `weight` for `account` at `height`.
    ///
    /// If the tail entry is already at `height`, it is overwritten in place
    /// (several weight changes inside one block collapse to one entry).
    /// Heights below the tail are a caller bug — the clock only moves forward.
    pub fn record(&mut self, account: Address, height: u64, weight: u128) {
        let history = self.histories.entry(account).or_default();
        match history.last_mut() {
            Some(tail) if tail.height == height => tail.weight = weight,
            Some(tail) => {
                debug_assert!(tail.height < height, "checkpoint heights must increase");
                history.push(Checkpoint { height, weight });
            }
            None => history.push(Checkpoint { height, weight }),
        }
    }

    /// Latest recorded weight for `account`, or 0 if no checkpoint exists.
    pub fn latest(&self, account: Address) -> u128 {
        self.histories
            .get(&account)
            .and_then(|h| h.last())
            .map(|c| c.weight)
            .unwrap_or(0)
    }

    /// Weight of `account` as of `height`: the weight of the latest
    /// checkpoint with height ≤ `height`, or 0 if none exists.
    /// Binary search — O(log n) over the account's history.
    pub fn weight_at(&self, account: Address, height: u64) -> u128 {
        let history = match self.histories.get(&account) {
            Some(h) => h,
            None => return 0,
        };
        match history.binary_search_by(|c| c.height.cmp(&height)) {
            Ok(i) => history[i].weight,
            Err(0) => 0,
            Err(i) => history[i - 1].weight,
        }
    }

    /// Number of distinct checkpoints recorded for `account`.
    pub fn history_len(&self, account: Address) -> usize {
        self.histories.get(&account).map(Vec::len).unwrap_or(0)
    }
}

// ─────────────────────────────────────────────────────────────────
// TESTS
// ─────────────────────────────────────────────────────────────────
