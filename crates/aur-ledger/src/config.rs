// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AURUM (AUR) — DEPLOYMENT CONFIGURATION
//
// TOML-backed deployment parameters for the ledger and the migration
// vault. Each deployment environment carries its own file; containerized
// deployments can supply everything through AUR_* environment variables.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::issuance::{MintPolicy, DEFAULT_MINT_INTERVAL_BLOCKS};
use crate::{u128_str, Address};

/// Full deployment profile: one ledger and one migration vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub ledger: LedgerConfig,
    pub vault: VaultConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Atomic units credited to `owner` at deployment.
    #[serde(with = "u128_str")]
    pub initial_supply: u128,
    pub owner: Address,
    pub mint_policy: MintPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    pub owner: Address,
    /// The vault's own account on both assets (holds the swap float).
    pub vault_address: Address,
    pub treasury: Address,
    pub legacy_asset: Address,
    #[serde(with = "u128_str")]
    pub ratio_numerator: u128,
    #[serde(with = "u128_str")]
    pub ratio_denominator: u128,
}

impl DeploymentConfig {
    /// Load deployment config from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: DeploymentConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load deployment config from environment variables
    /// Useful for containerized deployments
    pub fn load_from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let name = std::env::var("AUR_LEDGER_NAME").unwrap_or_else(|_| "Aurum".to_string());
        let symbol = std::env::var("AUR_LEDGER_SYMBOL").unwrap_or_else(|_| "AUR".to_string());

        let decimals: u8 = std::env::var("AUR_LEDGER_DECIMALS")
            .unwrap_or_else(|_| "18".to_string())
            .parse()?;

        let initial_supply: u128 = std::env::var("AUR_INITIAL_SUPPLY")
            .map_err(|_| "AUR_INITIAL_SUPPLY not set")?
            .parse()?;

        let owner: Address = std::env::var("AUR_OWNER")
            .map_err(|_| "AUR_OWNER not set")?
            .parse()?;

        let mint_cap_numerator: u128 = std::env::var("AUR_MINT_CAP_NUMERATOR")
            .unwrap_or_else(|_| "200".to_string())
            .parse()?;

        let cooldown_blocks: u64 = std::env::var("AUR_MINT_COOLDOWN_BLOCKS")
            .unwrap_or_else(|_| DEFAULT_MINT_INTERVAL_BLOCKS.to_string())
            .parse()?;

        let vault_owner: Address = std::env::var("AUR_VAULT_OWNER")
            .unwrap_or_else(|_| owner.to_string())
            .parse()?;

        let vault_address: Address = std::env::var("AUR_VAULT_ADDRESS")
            .map_err(|_| "AUR_VAULT_ADDRESS not set")?
            .parse()?;

        let treasury: Address = std::env::var("AUR_TREASURY")
            .map_err(|_| "AUR_TREASURY not set")?
            .parse()?;

        let legacy_asset: Address = std::env::var("AUR_LEGACY_ASSET")
            .map_err(|_| "AUR_LEGACY_ASSET not set")?
            .parse()?;

        let ratio_numerator: u128 = std::env::var("AUR_RATIO_NUMERATOR")
            .unwrap_or_else(|_| "314".to_string())
            .parse()?;

        let ratio_denominator: u128 = std::env::var("AUR_RATIO_DENOMINATOR")
            .unwrap_or_else(|_| "100".to_string())
            .parse()?;

        Ok(Self {
            ledger: LedgerConfig {
                name,
                symbol,
                decimals,
                initial_supply,
                owner,
                mint_policy: MintPolicy::OwnerGated {
                    mint_cap_numerator,
                    cooldown_blocks,
                },
            },
            vault: VaultConfig {
                owner: vault_owner,
                vault_address,
                treasury,
                legacy_asset,
                ratio_numerator,
                ratio_denominator,
            },
        })
    }

    /// Save deployment config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.ledger.name.is_empty() {
            return Err("ledger name cannot be empty".to_string());
        }

        if self.ledger.symbol.is_empty() || self.ledger.symbol.len() > 11 {
            return Err("ledger symbol must be 1-11 characters".to_string());
        }

        if self.ledger.owner.is_zero() {
            return Err("ledger owner cannot be the zero address".to_string());
        }

        match self.ledger.mint_policy {
            MintPolicy::OwnerGated {
                cooldown_blocks, ..
            }
            | MintPolicy::Permissionless {
                cooldown_blocks, ..
            } => {
                if cooldown_blocks == 0 {
                    return Err("mint cooldown must be at least one block".to_string());
                }
            }
        }

        if self.vault.owner.is_zero() {
            return Err("vault owner cannot be the zero address".to_string());
        }

        if self.vault.vault_address.is_zero() {
            return Err("vault address cannot be the zero address".to_string());
        }

        if self.vault.legacy_asset.is_zero() {
            return Err("legacy asset cannot be the zero address".to_string());
        }

        if self.vault.ratio_numerator == 0 || self.vault.ratio_denominator == 0 {
            return Err("migration ratio terms must be non-zero".to_string());
        }

        Ok(())
    }
}
