// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AURUM (AUR) — ISSUANCE CONTROLLER
//
// Gates every supply-increasing operation. Two mutually exclusive policies,
// selected at deployment, behind one controller:
//
//   OwnerGated      — only the owner mints, at most cap-fraction of the
//                     current supply per cooldown window.
//   Permissionless  — anyone claims a fixed amount, one claim per account
//                     per cooldown window; an early claim is a deliberate
//                     no-op that only re-announces the next eligible height.
//
// Checks and state writes are split (check_* / record_*) so the ledger can
// validate everything before committing any state.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::u128_str;
use crate::{Address, LedgerError};

// ─────────────────────────────────────────────────────────────────
// CONSTANTS
// ─────────────────────────────────────────────────────────────────

/// Fixed denominator of the mint-cap fraction.
/// cap = total_supply * mint_cap_numerator / MINT_CAP_DENOMINATOR
pub const MINT_CAP_DENOMINATOR: u128 = 10_000;

/// Default owner-gated cooldown: ≈365 days of 12-second blocks.
pub const DEFAULT_MINT_INTERVAL_BLOCKS: u64 = 2_628_000;

/// Default permissionless cooldown between claims, in blocks.
pub const DEFAULT_CLAIM_COOLDOWN_BLOCKS: u64 = 1_000;

// ─────────────────────────────────────────────────────────────────
// POLICY
// ─────────────────────────────────────────────────────────────────

/// Deployment-selected issuance policy. One per ledger instance; invoking
/// the other variant's entry point fails with `MintPolicyMismatch`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "policy")]
pub enum MintPolicy {
    /// Only the ledger owner mints, any amount up to the cap fraction of
    /// current supply, at most once per cooldown window (global clock).
    OwnerGated {
        #[serde(with = "u128_str")]
        mint_cap_numerator: u128,
        cooldown_blocks: u64,
    },
    /// Anyone mints a fixed amount, at most once per cooldown window
    /// (per-account clock).
    Permissionless {
        #[serde(with = "u128_str")]
        mint_amount: u128,
        cooldown_blocks: u64,
    },
}

/// Result of a permissionless claim check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintOutcome {
    /// Claim is eligible: credit this amount.
    Minted(u128),
    /// Still cooling down: no state change, announce the recorded height.
    CoolingDown(u64),
}

// ─────────────────────────────────────────────────────────────────
// CONTROLLER
// ─────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IssuanceController {
    policy: MintPolicy,
    /// Height of the last owner-gated mint. Stamped at construction so the
    /// first post-deployment mint must also wait a full window.
    last_mint_block: u64,
    /// Permissionless variant: account → next height at which a claim is
    /// eligible again. Absent entry = never claimed.
    /// MAINNET: BTreeMap for deterministic serialization.
    next_eligible: BTreeMap<Address, u64>,
}

impl IssuanceController {
    /// `height` is the deployment height; it seeds the owner-gated cooldown.
    pub fn new(policy: MintPolicy, height: u64) -> Self {
        Self {
            policy,
            last_mint_block: height,
            next_eligible: BTreeMap::new(),
        }
    }

    pub fn policy(&self) -> &MintPolicy {
        &self.policy
    }

    /// Height of the last owner-gated mint (deployment height if none yet).
    pub fn last_mint_block(&self) -> u64 {
        self.last_mint_block
    }

    /// Current owner-gated mint cap for the given supply.
    /// `None` under the permissionless policy.
    pub fn mint_cap(&self, total_supply: u128) -> Option<u128> {
        match self.policy {
            MintPolicy::OwnerGated {
                mint_cap_numerator, ..
            } => Some(cap_for(total_supply, mint_cap_numerator)),
            MintPolicy::Permissionless { .. } => None,
        }
    }

    /// Validate an owner-gated mint of `amount` at `height`.
    /// The cap is checked before the cooldown — an over-cap request is
    /// rejected as too much even while the window is still closed.
    pub fn check_owner_mint(
        &self,
        amount: u128,
        total_supply: u128,
        height: u64,
    ) -> Result<(), LedgerError> {
        let (numerator, cooldown_blocks) = match self.policy {
            MintPolicy::OwnerGated {
                mint_cap_numerator,
                cooldown_blocks,
            } => (mint_cap_numerator, cooldown_blocks),
            MintPolicy::Permissionless { .. } => return Err(LedgerError::MintPolicyMismatch),
        };
        if amount > cap_for(total_supply, numerator) {
            return Err(LedgerError::MintTooMuch);
        }
        if height < self.last_mint_block.saturating_add(cooldown_blocks) {
            return Err(LedgerError::MintTooEarly);
        }
        Ok(())
    }

    /// Commit an owner-gated mint that passed `check_owner_mint`.
    pub fn record_owner_mint(&mut self, height: u64) {
        self.last_mint_block = height;
    }

    /// Evaluate a permissionless claim by `caller` at `height`.
    /// Never fails on cooldown — an early claim resolves to `CoolingDown`,
    /// which the ledger surfaces as a notice event with no state change.
    pub fn check_claim(&self, caller: Address, height: u64) -> Result<MintOutcome, LedgerError> {
        let mint_amount = match self.policy {
            MintPolicy::Permissionless { mint_amount, .. } => mint_amount,
            MintPolicy::OwnerGated { .. } => return Err(LedgerError::MintPolicyMismatch),
        };
        match self.next_eligible.get(&caller) {
            Some(&next) if height < next => Ok(MintOutcome::CoolingDown(next)),
            _ => Ok(MintOutcome::Minted(mint_amount)),
        }
    }

    /// Commit a claim that resolved to `Minted`: advance the caller's window.
    pub fn record_claim(&mut self, caller: Address, height: u64) {
        let cooldown_blocks = match self.policy {
            MintPolicy::Permissionless {
                cooldown_blocks, ..
            } => cooldown_blocks,
            MintPolicy::OwnerGated { .. } => return,
        };
        self.next_eligible
            .insert(caller, height.saturating_add(cooldown_blocks));
    }

    /// Adjust the owner-gated cap numerator. Unrestricted range.
    pub fn set_cap_numerator(&mut self, value: u128) -> Result<(), LedgerError> {
        match &mut self.policy {
            MintPolicy::OwnerGated {
                mint_cap_numerator, ..
            } => {
                *mint_cap_numerator = value;
                Ok(())
            }
            MintPolicy::Permissionless { .. } => Err(LedgerError::MintPolicyMismatch),
        }
    }
}

/// cap = total_supply * numerator / MINT_CAP_DENOMINATOR.
/// Saturates high on u128 overflow: a cap beyond u128 bounds nothing the
/// supply-add check doesn't already reject.
fn cap_for(total_supply: u128, numerator: u128) -> u128 {
    total_supply
        .checked_mul(numerator)
        .map(|product| product / MINT_CAP_DENOMINATOR)
        .unwrap_or(u128::MAX)
}

// ─────────────────────────────────────────────────────────────────
// TESTS
// ─────────────────────────────────────────────────────────────────
