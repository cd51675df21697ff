// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AURUM (AUR) — VOTE DELEGATION GRAPH
//
// Maps each account to at most one delegate and keeps the delegates'
// checkpointed voting weight in sync with balance and delegation changes.
// Weight flows exactly one hop: an account's balance counts toward its
// delegate, never toward itself unless self-delegated. Until the first
// delegate() call an account's balance counts toward no one — the zero
// address is "no delegate" and accrues nothing. Cycles need no special
// handling because weight is never followed transitively.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::checkpoint::CheckpointStore;
use crate::{Address, LedgerError, LedgerEvent};

/// Delegation state plus the checkpoint histories it maintains.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DelegationGraph {
    /// account → delegate. Absent entries and `Address::ZERO` both mean
    /// "no delegate". MAINNET: BTreeMap for deterministic serialization.
    delegates: BTreeMap<Address, Address>,
    checkpoints: CheckpointStore,
}

impl DelegationGraph {
    pub fn new() -> Self {
        Self {
            delegates: BTreeMap::new(),
            checkpoints: CheckpointStore::new(),
        }
    }

    /// The current delegate of `account` (`Address::ZERO` if none).
    pub fn delegate_of(&self, account: Address) -> Address {
        self.delegates.get(&account).copied().unwrap_or(Address::ZERO)
    }

    /// Latest checkpointed voting weight of `account`.
    pub fn current_weight(&self, account: Address) -> u128 {
        self.checkpoints.latest(account)
    }

    /// Voting weight of `account` as of `height`.
    /// Only completed heights are queryable: `height` must be strictly
    /// below `current_height` or the call fails with `FutureHeight`.
    pub fn weight_at_height(
        &self,
        account: Address,
        height: u64,
        current_height: u64,
    ) -> Result<u128, LedgerError> {
        if height >= current_height {
            return Err(LedgerError::FutureHeight);
        }
        Ok(self.checkpoints.weight_at(account, height))
    }

    /// Re-point `account` at `new_delegate`, moving weight equal to
    /// `balance` from the old delegate to the new one at `height`.
    ///
    /// Always emits DelegateChanged. Weight-change events are emitted only
    /// for non-zero delegates whose weight actually moved — re-delegating
    /// with a zero balance records nothing.
    pub fn set_delegate(
        &mut self,
        account: Address,
        balance: u128,
        new_delegate: Address,
        height: u64,
    ) -> Vec<LedgerEvent> {
        let old_delegate = self.delegate_of(account);
        self.delegates.insert(account, new_delegate);

        let mut events = vec![LedgerEvent::DelegateChanged {
            account,
            old_delegate,
            new_delegate,
        }];
        if old_delegate != new_delegate {
            events.extend(self.move_weight(old_delegate, new_delegate, balance, height));
        }
        events
    }

    /// Balance-change hook invoked by the ledger for every account whose
    /// balance moved. Applies the delta to the account's current delegate.
    pub fn on_balance_change(
        &mut self,
        account: Address,
        old_balance: u128,
        new_balance: u128,
        height: u64,
    ) -> Vec<LedgerEvent> {
        if old_balance == new_balance {
            return Vec::new();
        }
        let delegate = self.delegate_of(account);
        if new_balance > old_balance {
            self.move_weight(Address::ZERO, delegate, new_balance - old_balance, height)
        } else {
            self.move_weight(delegate, Address::ZERO, old_balance - new_balance, height)
        }
    }

    /// Move `amount` of weight from `from`'s tally to `to`'s tally,
    /// writing one checkpoint per affected delegate at `height`.
    /// The zero address is a sink/source with no tally of its own.
    fn move_weight(
        &mut self,
        from: Address,
        to: Address,
        amount: u128,
        height: u64,
    ) -> Vec<LedgerEvent> {
        let mut events = Vec::new();
        if amount == 0 || from == to {
            return events;
        }
        if from != Address::ZERO {
            let old_weight = self.checkpoints.latest(from);
            // Weight removed never exceeds weight previously added for the
            // same balance; saturating_sub only as underflow containment.
            let new_weight = old_weight.saturating_sub(amount);
            self.checkpoints.record(from, height, new_weight);
            events.push(LedgerEvent::DelegateWeightChanged {
                delegate: from,
                old_weight,
                new_weight,
            });
        }
        if to != Address::ZERO {
            let old_weight = self.checkpoints.latest(to);
            let new_weight = old_weight.saturating_add(amount);
            self.checkpoints.record(to, height, new_weight);
            events.push(LedgerEvent::DelegateWeightChanged {
                delegate: to,
                old_weight,
                new_weight,
            });
        }
        events
    }
}

// ─────────────────────────────────────────────────────────────────
// TESTS
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address([b; 20])
    }

    #[test]
    fn test_undelegated_accrues_nothing() {
        let mut graph = DelegationGraph::new();
        // Balance changes before any delegation leave every tally at zero.
        let events = graph.on_balance_change(addr(1), 0, 1_000, 5);
        assert!(events.is_empty());
        assert_eq!(graph.current_weight(addr(1)), 0);
    }

    #[test]
    fn test_self_delegation_picks_up_balance() {
        let mut graph = DelegationGraph::new();
        let events = graph.set_delegate(addr(1), 1_000, addr(1), 5);
        assert_eq!(graph.current_weight(addr(1)), 1_000);
        assert_eq!(
            events[0],
            LedgerEvent::DelegateChanged {
                account: addr(1),
                old_delegate: Address::ZERO,
                new_delegate: addr(1),
            }
        );
        assert_eq!(
            events[1],
            LedgerEvent::DelegateWeightChanged {
                delegate: addr(1),
                old_weight: 0,
                new_weight: 1_000,
            }
        );
    }

    #[test]
    fn test_redelegation_moves_weight() {
        let mut graph = DelegationGraph::new();
        graph.set_delegate(addr(1), 1_000, addr(2), 5);
        assert_eq!(graph.current_weight(addr(2)), 1_000);

        let events = graph.set_delegate(addr(1), 1_000, addr(3), 6);
        assert_eq!(graph.current_weight(addr(2)), 0);
        assert_eq!(graph.current_weight(addr(3)), 1_000);
        // DelegateChanged + two weight events (old delegate down, new up).
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_zero_balance_delegation_emits_no_weight_event() {
        let mut graph = DelegationGraph::new();
        let events = graph.set_delegate(addr(1), 0, addr(2), 5);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], LedgerEvent::DelegateChanged { .. }));
        assert_eq!(graph.current_weight(addr(2)), 0);
    }

    #[test]
    fn test_delegate_to_zero_drops_accrual() {
        let mut graph = DelegationGraph::new();
        graph.set_delegate(addr(1), 500, addr(1), 5);
        let events = graph.set_delegate(addr(1), 500, Address::ZERO, 6);
        assert_eq!(graph.current_weight(addr(1)), 0);
        // Only the old delegate's tally moves; the zero address has none.
        assert_eq!(events.len(), 2);
        // Further balance changes accrue to no one.
        let events = graph.on_balance_change(addr(1), 500, 900, 7);
        assert!(events.is_empty());
    }

    #[test]
    fn test_balance_change_tracks_delegate() {
        let mut graph = DelegationGraph::new();
        graph.set_delegate(addr(1), 1_000, addr(2), 5);
        graph.on_balance_change(addr(1), 1_000, 1_600, 6);
        assert_eq!(graph.current_weight(addr(2)), 1_600);
        graph.on_balance_change(addr(1), 1_600, 400, 7);
        assert_eq!(graph.current_weight(addr(2)), 400);
    }

    #[test]
    fn test_weight_at_height_is_historical() {
        let mut graph = DelegationGraph::new();
        graph.set_delegate(addr(1), 1_000, addr(2), 5);
        graph.on_balance_change(addr(1), 1_000, 2_000, 10);

        assert_eq!(graph.weight_at_height(addr(2), 4, 20).unwrap(), 0);
        assert_eq!(graph.weight_at_height(addr(2), 5, 20).unwrap(), 1_000);
        assert_eq!(graph.weight_at_height(addr(2), 9, 20).unwrap(), 1_000);
        assert_eq!(graph.weight_at_height(addr(2), 10, 20).unwrap(), 2_000);
    }

    #[test]
    fn test_weight_at_unfinalized_height_fails() {
        let graph = DelegationGraph::new();
        assert_eq!(
            graph.weight_at_height(addr(1), 20, 20),
            Err(LedgerError::FutureHeight)
        );
        assert_eq!(
            graph.weight_at_height(addr(1), 21, 20),
            Err(LedgerError::FutureHeight)
        );
        assert!(graph.weight_at_height(addr(1), 19, 20).is_ok());
    }

    #[test]
    fn test_same_height_changes_coalesce() {
        let mut graph = DelegationGraph::new();
        graph.set_delegate(addr(1), 100, addr(2), 5);
        graph.on_balance_change(addr(1), 100, 300, 5);
        graph.on_balance_change(addr(1), 300, 250, 5);
        assert_eq!(graph.current_weight(addr(2)), 250);
        // Three writes at one height leave a single checkpoint.
        assert_eq!(graph.weight_at_height(addr(2), 5, 10).unwrap(), 250);
        assert_eq!(graph.weight_at_height(addr(2), 4, 10).unwrap(), 0);
    }
}
