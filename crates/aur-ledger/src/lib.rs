// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AURUM (AUR) - GOVERNANCE LEDGER
//
// Fungible-asset ledger with a time-gated issuance cap and checkpointed
// vote delegation. Balances, allowances, and transfer semantics live here;
// every balance change feeds the delegation graph, and every mint passes
// through the issuance controller first.
// All financial arithmetic uses u128 atomic units (no floating-point).
// The block-height clock is supplied by the host on every call — the
// ledger reads it and never sets it.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod checkpoint;
pub mod config;
pub mod delegation;
pub mod issuance;

use crate::delegation::DelegationGraph;
use crate::issuance::{IssuanceController, MintOutcome, MintPolicy};

/// 1 AUR = 10^18 atomic units (18 decimals, DeFi-standard precision).
pub const ATTO_PER_AUR: u128 = 1_000_000_000_000_000_000;

/// Display decimals matching `ATTO_PER_AUR`.
pub const AUR_DECIMALS: u8 = 18;

// ─────────────────────────────────────────────────────────────
// u128 ↔ String serialization (JSON/TOML don't support 128-bit integers)
// ─────────────────────────────────────────────────────────────

pub mod u128_str {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(val: &u128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&val.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u128, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        struct U128Visitor;

        impl<'de> Visitor<'de> for U128Visitor {
            type Value = u128;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a u128 as a string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
                Ok(v as u128)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
                u128::try_from(v).map_err(|_| E::custom("negative value for u128"))
            }
        }

        deserializer.deserialize_any(U128Visitor)
    }
}

// ─────────────────────────────────────────────────────────────
// ACCOUNT IDENTITY
// ─────────────────────────────────────────────────────────────

/// Fixed-width opaque account identifier (20 bytes).
/// The all-zero address is reserved: it means "no account / no delegate"
/// and never holds a balance of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|e| format!("invalid address hex: {}", e))?;
        let bytes: [u8; 20] = bytes
            .try_into()
            .map_err(|_| "address must be exactly 20 bytes".to_string())?;
        Ok(Address(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────────
// ERRORS
// ─────────────────────────────────────────────────────────────

/// Machine-readable failure tags for every ledger operation.
/// All failures are atomic: a failed call commits no state change.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance")]
    InsufficientBalance,
    #[error("insufficient allowance")]
    InsufficientAllowance,
    #[error("mint amount exceeds the supply cap")]
    MintTooMuch,
    #[error("mint cooldown window has not elapsed")]
    MintTooEarly,
    #[error("caller is not the owner")]
    Unauthorized,
    #[error("queried height is not finalized yet")]
    FutureHeight,
    #[error("operation not supported by the configured mint policy")]
    MintPolicyMismatch,
}

// ─────────────────────────────────────────────────────────────
// EVENTS
// ─────────────────────────────────────────────────────────────

/// Events emitted by ledger operations, returned to the caller for
/// indexing. The ledger itself never consumes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    Transfer {
        from: Address,
        to: Address,
        #[serde(with = "u128_str")]
        amount: u128,
    },
    Approval {
        owner: Address,
        spender: Address,
        #[serde(with = "u128_str")]
        amount: u128,
    },
    Minted {
        to: Address,
        #[serde(with = "u128_str")]
        amount: u128,
    },
    DelegateChanged {
        account: Address,
        old_delegate: Address,
        new_delegate: Address,
    },
    DelegateWeightChanged {
        delegate: Address,
        #[serde(with = "u128_str")]
        old_weight: u128,
        #[serde(with = "u128_str")]
        new_weight: u128,
    },
    /// Emitted by a permissionless claim that landed inside the cooldown
    /// window: the claim is a no-op, this notice is its only effect.
    MintCooldownNotice {
        account: Address,
        next_eligible_height: u64,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

// ─────────────────────────────────────────────────────────────
// MINIMAL FUNGIBLE-ASSET CONTRACT
// ─────────────────────────────────────────────────────────────

/// The minimal fungible-asset surface shared by the ledger asset and any
/// legacy asset: balances, direct transfer, allowance-gated transfer.
/// `caller` is always explicit — there is no ambient transaction sender.
pub trait FungibleAsset {
    fn balance_of(&self, account: Address) -> u128;

    fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: u128,
        height: u64,
    ) -> Result<(), LedgerError>;

    fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: u128,
        height: u64,
    ) -> Result<(), LedgerError>;

    fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: u128,
    ) -> Result<(), LedgerError>;
}

// ─────────────────────────────────────────────────────────────
// LEDGER
// ─────────────────────────────────────────────────────────────

/// The governance ledger: balances, allowances, delegation, issuance.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Ledger {
    name: String,
    symbol: String,
    decimals: u8,
    #[serde(with = "u128_str")]
    total_supply: u128,
    owner: Address,
    /// MAINNET: BTreeMap for deterministic iteration and serialization.
    balances: BTreeMap<Address, u128>,
    /// (owner, spender) → allowance.
    allowances: BTreeMap<(Address, Address), u128>,
    delegation: DelegationGraph,
    issuance: IssuanceController,
}

impl Ledger {
    /// Create the ledger at deployment `height`, crediting `initial_supply`
    /// to `owner`. The owner starts undelegated, so no checkpoint is
    /// written until the first `delegate` call.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        initial_supply: u128,
        owner: Address,
        policy: MintPolicy,
        height: u64,
    ) -> Self {
        let mut balances = BTreeMap::new();
        balances.insert(owner, initial_supply);
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            total_supply: initial_supply,
            owner,
            balances,
            allowances: BTreeMap::new(),
            delegation: DelegationGraph::new(),
            issuance: IssuanceController::new(policy, height),
        }
    }

    // ── Metadata & queries ──

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn mint_policy(&self) -> &MintPolicy {
        self.issuance.policy()
    }

    /// Current owner-gated mint cap (`None` under the permissionless
    /// policy). Grows with the supply.
    pub fn mint_cap(&self) -> Option<u128> {
        self.issuance.mint_cap(self.total_supply)
    }

    pub fn balance_of(&self, account: Address) -> u128 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> u128 {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(0)
    }

    /// The account `account` currently delegates to (ZERO if none).
    pub fn delegate_of(&self, account: Address) -> Address {
        self.delegation.delegate_of(account)
    }

    /// Latest checkpointed voting weight of `account`.
    /// Zero until somebody delegates to it — an undelegated balance
    /// contributes weight to no one.
    pub fn current_weight(&self, account: Address) -> u128 {
        self.delegation.current_weight(account)
    }

    /// Voting weight of `account` as of `height`. Fails with `FutureHeight`
    /// unless `height < current_height` — only completed heights are
    /// queryable.
    pub fn weight_at_height(
        &self,
        account: Address,
        height: u64,
        current_height: u64,
    ) -> Result<u128, LedgerError> {
        self.delegation
            .weight_at_height(account, height, current_height)
    }

    // ── Transfers ──

    /// Move `amount` from `caller` to `to`.
    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: u128,
        height: u64,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.move_balance(caller, to, amount, height)
    }

    /// Grant `spender` the right to move up to `amount` of `caller`'s
    /// balance. Overwrites any previous allowance.
    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: u128,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.allowances.insert((caller, spender), amount);
        Ok(vec![LedgerEvent::Approval {
            owner: caller,
            spender,
            amount,
        }])
    }

    /// Move `amount` from `from` to `to`, spending `caller`'s allowance.
    /// The allowance is checked before the balance.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: u128,
        height: u64,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        let allowance = self.allowance(from, caller);
        if allowance < amount {
            return Err(LedgerError::InsufficientAllowance);
        }
        let events = self.move_balance(from, to, amount, height)?;
        self.allowances.insert((from, caller), allowance - amount);
        Ok(events)
    }

    /// Balance move shared by transfer / transfer_from / the asset trait.
    /// Validates first, then updates both balances and runs the delegation
    /// hook for each side — all or nothing.
    fn move_balance(
        &mut self,
        from: Address,
        to: Address,
        amount: u128,
        height: u64,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance);
        }

        let mut events = vec![LedgerEvent::Transfer { from, to, amount }];
        if from != to && amount > 0 {
            let to_balance = self.balance_of(to);
            let new_from = from_balance - amount;
            // Cannot overflow: both sides are bounded by total_supply.
            let new_to = to_balance + amount;
            self.balances.insert(from, new_from);
            self.balances.insert(to, new_to);
            events.extend(
                self.delegation
                    .on_balance_change(from, from_balance, new_from, height),
            );
            events.extend(
                self.delegation
                    .on_balance_change(to, to_balance, new_to, height),
            );
        }
        Ok(events)
    }

    // ── Delegation ──

    /// Set `caller`'s delegate to `to` (self-delegation and the zero
    /// address are both valid targets). Moves `caller`'s balance-weight
    /// from the old delegate to the new one, checkpointed at `height`.
    pub fn delegate(&mut self, caller: Address, to: Address, height: u64) -> Vec<LedgerEvent> {
        let balance = self.balance_of(caller);
        self.delegation.set_delegate(caller, balance, to, height)
    }

    // ── Issuance ──

    /// Owner-gated mint of `amount` to `to` at `height`.
    /// Fails with `Unauthorized` / `MintTooMuch` / `MintTooEarly`, or
    /// `MintPolicyMismatch` under the permissionless policy.
    pub fn mint(
        &mut self,
        caller: Address,
        to: Address,
        amount: u128,
        height: u64,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.ensure_owner(caller)?;
        self.issuance
            .check_owner_mint(amount, self.total_supply, height)?;
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::MintTooMuch)?;

        // All checks passed — commit.
        self.total_supply = new_supply;
        let events = self.credit(to, amount, height);
        self.issuance.record_owner_mint(height);
        Ok(events)
    }

    /// Permissionless fixed-amount claim by `caller` at `height`.
    /// Inside the cooldown window this is a documented no-op: the call
    /// succeeds, changes nothing, and only re-emits the cooldown notice.
    pub fn claim_mint(
        &mut self,
        caller: Address,
        height: u64,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        match self.issuance.check_claim(caller, height)? {
            MintOutcome::CoolingDown(next_eligible_height) => {
                Ok(vec![LedgerEvent::MintCooldownNotice {
                    account: caller,
                    next_eligible_height,
                }])
            }
            MintOutcome::Minted(amount) => {
                let new_supply = self
                    .total_supply
                    .checked_add(amount)
                    .ok_or(LedgerError::MintTooMuch)?;
                self.total_supply = new_supply;
                let events = self.credit(caller, amount, height);
                self.issuance.record_claim(caller, height);
                Ok(events)
            }
        }
    }

    /// Owner-only: adjust the mint-cap numerator (denominator is fixed at
    /// `issuance::MINT_CAP_DENOMINATOR`).
    pub fn set_mint_cap_numerator(
        &mut self,
        caller: Address,
        value: u128,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        self.issuance.set_cap_numerator(value)
    }

    fn credit(&mut self, to: Address, amount: u128, height: u64) -> Vec<LedgerEvent> {
        let old_balance = self.balance_of(to);
        let new_balance = old_balance + amount;
        self.balances.insert(to, new_balance);
        let mut events = vec![LedgerEvent::Minted { to, amount }];
        events.extend(
            self.delegation
                .on_balance_change(to, old_balance, new_balance, height),
        );
        events
    }

    // ── Ownership ──

    /// Single-step ownership transfer.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.ensure_owner(caller)?;
        let previous_owner = self.owner;
        self.owner = new_owner;
        Ok(vec![LedgerEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        }])
    }

    fn ensure_owner(&self, caller: Address) -> Result<(), LedgerError> {
        if caller != self.owner {
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }

    // ── Auditing ──

    /// Deterministic state root over all (address, balance) pairs.
    /// SHA3-256; BTreeMap guarantees sorted iteration, so every node with
    /// the same state produces the same root.
    pub fn state_root(&self) -> String {
        let mut hasher = Sha3_256::new();
        for (addr, balance) in &self.balances {
            hasher.update(addr.0);
            hasher.update(balance.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Supply conservation audit: sum of all balances must equal
    /// total_supply after every successful operation.
    ///
    /// Diagnostic tool — a failure indicates a ledger bug, not a caller
    /// error, so the message carries the delta rather than a reason tag.
    pub fn audit_supply(&self) -> Result<(), String> {
        let balance_sum: u128 = self.balances.values().sum();
        if balance_sum == self.total_supply {
            Ok(())
        } else {
            Err(format!(
                "supply audit FAILED: sum(balances) {} != total_supply {}",
                balance_sum, self.total_supply
            ))
        }
    }
}

impl FungibleAsset for Ledger {
    fn balance_of(&self, account: Address) -> u128 {
        Ledger::balance_of(self, account)
    }

    fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: u128,
        height: u64,
    ) -> Result<(), LedgerError> {
        Ledger::transfer(self, caller, to, amount, height).map(|_| ())
    }

    fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: u128,
        height: u64,
    ) -> Result<(), LedgerError> {
        Ledger::transfer_from(self, caller, from, to, amount, height).map(|_| ())
    }

    fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        Ledger::approve(self, caller, spender, amount).map(|_| ())
    }
}

// ─────────────────────────────────────────────────────────────
// TESTS
// ─────────────────────────────────────────────────────────────
