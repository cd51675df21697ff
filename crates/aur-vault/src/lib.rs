// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AURUM (AUR) — MIGRATION VAULT
//
// One-way, fixed-ratio swap of a legacy asset for the ledger asset.
// Holders surrender legacy units (stranded in the vault forever) and
// receive ledger units scaled by numerator/denominator from the vault's
// pre-funded float.
//
// Lifecycle: constructed paused with the ledger asset unbound. Binding
// the ledger asset is a one-shot owner operation; migration requires
// bound + unpaused. Pausing is reversible at any time.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use thiserror::Error;

use aur_ledger::u128_str;
use aur_ledger::{Address, FungibleAsset, LedgerError};

// ─────────────────────────────────────────────────────────────
// ERRORS
// ─────────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultError {
    #[error("caller is not the owner")]
    Unauthorized,
    #[error("ledger asset already bound, only can be set once")]
    AlreadySet,
    #[error("migration is not enabled")]
    MigrationDisabled,
    #[error("vault holds too little of the ledger asset")]
    InsufficientVaultBalance,
    #[error("the legacy asset cannot be withdrawn")]
    CannotWithdrawLegacyAsset,
    #[error("migration ratio terms must be non-zero")]
    InvalidRatio,
    #[error("asset operation failed: {0}")]
    Asset(#[from] LedgerError),
}

// ─────────────────────────────────────────────────────────────
// EVENTS
// ─────────────────────────────────────────────────────────────

/// Events returned by vault operations for indexing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum VaultEvent {
    LedgerAssetBound {
        asset: Address,
    },
    PauseSet {
        paused: bool,
    },
    Migrated {
        account: Address,
        #[serde(with = "u128_str")]
        legacy_in: u128,
        #[serde(with = "u128_str")]
        ledger_out: u128,
    },
    Withdrawal {
        token: Address,
        #[serde(with = "u128_str")]
        amount: u128,
        recipient: Address,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

// ─────────────────────────────────────────────────────────────
// VAULT
// ─────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MigrationVault {
    owner: Address,
    /// The vault's own account on every asset it touches.
    address: Address,
    treasury: Address,
    legacy_asset: Address,
    /// Unset until `bind_ledger_asset`; migration is impossible before.
    ledger_asset: Option<Address>,
    #[serde(with = "u128_str")]
    ratio_numerator: u128,
    #[serde(with = "u128_str")]
    ratio_denominator: u128,
    paused: bool,
}

impl MigrationVault {
    /// Construct the vault in the paused state with no ledger asset bound.
    pub fn new(
        owner: Address,
        address: Address,
        treasury: Address,
        legacy_asset: Address,
        ratio_numerator: u128,
        ratio_denominator: u128,
    ) -> Result<Self, VaultError> {
        if ratio_numerator == 0 || ratio_denominator == 0 {
            return Err(VaultError::InvalidRatio);
        }
        Ok(Self {
            owner,
            address,
            treasury,
            legacy_asset,
            ledger_asset: None,
            ratio_numerator,
            ratio_denominator,
            paused: true,
        })
    }

    // ── Queries ──

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn treasury(&self) -> Address {
        self.treasury
    }

    pub fn legacy_asset(&self) -> Address {
        self.legacy_asset
    }

    pub fn ledger_asset(&self) -> Option<Address> {
        self.ledger_asset
    }

    pub fn ratio(&self) -> (u128, u128) {
        (self.ratio_numerator, self.ratio_denominator)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Migration is live only when the ledger asset is bound and the vault
    /// is unpaused.
    pub fn is_active(&self) -> bool {
        self.ledger_asset.is_some() && !self.paused
    }

    /// Ledger units paid out for `amount` legacy units.
    /// `None` when the scaled product exceeds u128.
    pub fn quote(&self, amount: u128) -> Option<u128> {
        amount
            .checked_mul(self.ratio_numerator)
            .map(|product| product / self.ratio_denominator)
    }

    // ── Administration ──

    /// Bind the ledger asset the vault pays out. One-shot: a second call
    /// fails with `AlreadySet` regardless of the argument.
    pub fn bind_ledger_asset(
        &mut self,
        caller: Address,
        asset: Address,
    ) -> Result<Vec<VaultEvent>, VaultError> {
        self.ensure_owner(caller)?;
        if self.ledger_asset.is_some() {
            return Err(VaultError::AlreadySet);
        }
        self.ledger_asset = Some(asset);
        Ok(vec![VaultEvent::LedgerAssetBound { asset }])
    }

    pub fn pause(&mut self, caller: Address) -> Result<Vec<VaultEvent>, VaultError> {
        self.set_paused(caller, true)
    }

    pub fn unpause(&mut self, caller: Address) -> Result<Vec<VaultEvent>, VaultError> {
        self.set_paused(caller, false)
    }

    fn set_paused(&mut self, caller: Address, paused: bool) -> Result<Vec<VaultEvent>, VaultError> {
        self.ensure_owner(caller)?;
        self.paused = paused;
        Ok(vec![VaultEvent::PauseSet { paused }])
    }

    /// Single-step ownership transfer.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<Vec<VaultEvent>, VaultError> {
        self.ensure_owner(caller)?;
        let previous_owner = self.owner;
        self.owner = new_owner;
        Ok(vec![VaultEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        }])
    }

    // ── Migration ──

    /// Swap `amount` of the caller's legacy asset for the scaled ledger
    /// amount at `height`. The caller must have approved the vault on the
    /// legacy asset beforehand.
    ///
    /// All checks run before either transfer, so a failure moves nothing:
    /// active state, payout quote, and the vault's ledger float are
    /// verified first, then legacy units are pulled in and ledger units
    /// pushed out.
    pub fn migrate<L, M>(
        &self,
        caller: Address,
        amount: u128,
        height: u64,
        legacy: &mut L,
        ledger: &mut M,
    ) -> Result<Vec<VaultEvent>, VaultError>
    where
        L: FungibleAsset,
        M: FungibleAsset,
    {
        if !self.is_active() {
            return Err(VaultError::MigrationDisabled);
        }
        // Overflow quote: the payout would exceed any possible float.
        let ledger_out = self
            .quote(amount)
            .ok_or(VaultError::InsufficientVaultBalance)?;
        if ledger.balance_of(self.address) < ledger_out {
            return Err(VaultError::InsufficientVaultBalance);
        }

        // Legacy units land in the vault and stay there: no operation
        // releases the legacy asset again.
        legacy.transfer_from(self.address, caller, self.address, amount, height)?;
        ledger.transfer(self.address, caller, ledger_out, height)?;

        Ok(vec![VaultEvent::Migrated {
            account: caller,
            legacy_in: amount,
            ledger_out,
        }])
    }

    // ── Recovery ──

    /// Owner-only recovery of non-legacy holdings (surplus float, stray
    /// deposits). The legacy asset is permanently stranded and refuses to
    /// leave.
    pub fn withdraw_token<A>(
        &self,
        caller: Address,
        token: Address,
        amount: u128,
        recipient: Address,
        asset: &mut A,
        height: u64,
    ) -> Result<Vec<VaultEvent>, VaultError>
    where
        A: FungibleAsset,
    {
        self.ensure_owner(caller)?;
        if token == self.legacy_asset {
            return Err(VaultError::CannotWithdrawLegacyAsset);
        }
        asset.transfer(self.address, recipient, amount, height)?;
        Ok(vec![VaultEvent::Withdrawal {
            token,
            amount,
            recipient,
        }])
    }

    fn ensure_owner(&self, caller: Address) -> Result<(), VaultError> {
        if caller != self.owner {
            return Err(VaultError::Unauthorized);
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
// TESTS
// ─────────────────────────────────────────────────────────────
