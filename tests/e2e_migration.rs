// ========================================
// E2E MIGRATION TESTS FOR AURUM (AUR)
// ========================================
//
// Test Scenarios:
// 1. Full Deployment & Migration Flow (legacy → AUR at 314/100)
// 2. Vault Lifecycle Gating (bind-once, pause, activation)
// 3. Legacy Asset Stranding & Recovery Rules
//
// Usage:
//   cargo test --test e2e_migration -- --nocapture
//
// ========================================

use aur_ledger::issuance::MintPolicy;
use aur_ledger::{Address, Ledger, LedgerError};
use aur_vault::{MigrationVault, VaultError, VaultEvent};

const DEPLOY_HEIGHT: u64 = 1_000;

fn addr(b: u8) -> Address {
    Address([b; 20])
}

fn deployer() -> Address {
    addr(0xA1)
}

fn vault_account() -> Address {
    addr(0xBB)
}

fn asset(holder: Address, supply: u128) -> Ledger {
    Ledger::new(
        "Asset",
        "AST",
        18,
        supply,
        holder,
        MintPolicy::OwnerGated {
            mint_cap_numerator: 200,
            cooldown_blocks: 2_628_000,
        },
        DEPLOY_HEIGHT,
    )
}

// ========================================
// TEST 1: FULL DEPLOYMENT & MIGRATION FLOW
// ========================================
#[test]
fn test_full_migration_flow() {
    println!("\n🧪 TEST 1: Full Deployment & Migration Flow");
    println!("================================================\n");

    let holder = addr(2);

    // Deployment: legacy asset in circulation, AUR float in the vault,
    // vault constructed paused with the AUR side unbound.
    let mut legacy = asset(holder, 1_000);
    let mut aur = asset(vault_account(), 10_000);
    let mut vault = MigrationVault::new(
        deployer(),
        vault_account(),
        addr(0xCC),
        addr(0xDD),
        314,
        100,
    )
    .unwrap();
    println!("✅ Deployed: 1000 legacy in circulation, 10000 AUR float");

    // Activation ceremony: bind the AUR side, then unpause.
    vault.bind_ledger_asset(deployer(), addr(0xEE)).unwrap();
    vault.unpause(deployer()).unwrap();
    assert!(vault.is_active());
    println!("✅ Vault activated (bound + unpaused)");

    // Holder approves the vault and swaps everything.
    legacy.approve(holder, vault_account(), 1_000).unwrap();
    let events = vault
        .migrate(holder, 1_000, DEPLOY_HEIGHT + 1, &mut legacy, &mut aur)
        .unwrap();

    assert_eq!(aur.balance_of(holder), 3_140);
    assert_eq!(aur.balance_of(vault_account()), 6_860);
    assert_eq!(legacy.balance_of(holder), 0);
    assert_eq!(legacy.balance_of(vault_account()), 1_000);
    assert_eq!(
        events,
        vec![VaultEvent::Migrated {
            account: holder,
            legacy_in: 1_000,
            ledger_out: 3_140,
        }]
    );
    println!("✅ Migrated 1000 legacy → 3140 AUR, float left 6860");

    legacy.audit_supply().unwrap();
    aur.audit_supply().unwrap();
    println!("✅ Both assets conserve supply");
}

// ========================================
// TEST 2: VAULT LIFECYCLE GATING
// ========================================
#[test]
fn test_vault_lifecycle_gating() {
    println!("\n🧪 TEST 2: Vault Lifecycle Gating");
    println!("================================================\n");

    let holder = addr(2);
    let mut legacy = asset(holder, 1_000);
    let mut aur = asset(vault_account(), 10_000);
    legacy.approve(holder, vault_account(), 1_000).unwrap();

    let mut vault = MigrationVault::new(
        deployer(),
        vault_account(),
        addr(0xCC),
        addr(0xDD),
        314,
        100,
    )
    .unwrap();

    // Paused + unbound: migration impossible.
    assert_eq!(
        vault.migrate(holder, 100, DEPLOY_HEIGHT, &mut legacy, &mut aur),
        Err(VaultError::MigrationDisabled)
    );
    println!("✅ Fresh vault refuses migration");

    // Unpaused but still unbound: still impossible.
    vault.unpause(deployer()).unwrap();
    assert_eq!(
        vault.migrate(holder, 100, DEPLOY_HEIGHT, &mut legacy, &mut aur),
        Err(VaultError::MigrationDisabled)
    );
    println!("✅ Unbound vault refuses migration");

    // Binding is owner-only and one-shot.
    assert_eq!(
        vault.bind_ledger_asset(addr(9), addr(0xEE)),
        Err(VaultError::Unauthorized)
    );
    vault.bind_ledger_asset(deployer(), addr(0xEE)).unwrap();
    assert_eq!(
        vault.bind_ledger_asset(deployer(), addr(0xEF)),
        Err(VaultError::AlreadySet)
    );
    println!("✅ AUR side bound exactly once");

    // Now live; re-pausing closes it again reversibly.
    vault
        .migrate(holder, 100, DEPLOY_HEIGHT + 1, &mut legacy, &mut aur)
        .unwrap();
    vault.pause(deployer()).unwrap();
    assert_eq!(
        vault.migrate(holder, 100, DEPLOY_HEIGHT + 2, &mut legacy, &mut aur),
        Err(VaultError::MigrationDisabled)
    );
    vault.unpause(deployer()).unwrap();
    vault
        .migrate(holder, 100, DEPLOY_HEIGHT + 3, &mut legacy, &mut aur)
        .unwrap();
    assert_eq!(aur.balance_of(holder), 314 * 2);
    println!("✅ Pause gate closes and reopens migration");
}

// ========================================
// TEST 3: LEGACY STRANDING & RECOVERY RULES
// ========================================
#[test]
fn test_legacy_stranding_and_recovery() {
    println!("\n🧪 TEST 3: Legacy Stranding & Recovery Rules");
    println!("================================================\n");

    let holder = addr(2);
    let treasury = addr(0xCC);
    let legacy_token = addr(0xDD);
    let aur_token = addr(0xEE);

    let mut legacy = asset(holder, 1_000);
    let mut aur = asset(vault_account(), 10_000);
    legacy.approve(holder, vault_account(), 1_000).unwrap();

    let mut vault = MigrationVault::new(
        deployer(),
        vault_account(),
        treasury,
        legacy_token,
        314,
        100,
    )
    .unwrap();
    vault.bind_ledger_asset(deployer(), aur_token).unwrap();
    vault.unpause(deployer()).unwrap();

    vault
        .migrate(holder, 1_000, DEPLOY_HEIGHT, &mut legacy, &mut aur)
        .unwrap();

    // The swallowed legacy units never leave, even for the owner.
    assert_eq!(
        vault.withdraw_token(
            deployer(),
            legacy_token,
            1,
            treasury,
            &mut legacy,
            DEPLOY_HEIGHT + 1
        ),
        Err(VaultError::CannotWithdrawLegacyAsset)
    );
    println!("✅ Legacy units are stranded forever");

    // Fully-migrated holders have nothing left to swap.
    legacy.approve(holder, vault_account(), 1).unwrap();
    assert_eq!(
        vault.migrate(holder, 1, DEPLOY_HEIGHT + 1, &mut legacy, &mut aur),
        Err(VaultError::Asset(LedgerError::InsufficientBalance))
    );
    println!("✅ Exhausted holder cannot migrate again");

    // Surplus AUR float is recoverable to the treasury, owner-only.
    assert_eq!(
        vault.withdraw_token(
            addr(9),
            aur_token,
            1_000,
            treasury,
            &mut aur,
            DEPLOY_HEIGHT + 1
        ),
        Err(VaultError::Unauthorized)
    );
    vault
        .withdraw_token(
            deployer(),
            aur_token,
            6_860,
            treasury,
            &mut aur,
            DEPLOY_HEIGHT + 2,
        )
        .unwrap();
    assert_eq!(aur.balance_of(treasury), 6_860);
    assert_eq!(aur.balance_of(vault_account()), 0);
    println!("✅ Surplus float recovered to the treasury");

    aur.audit_supply().unwrap();
    legacy.audit_supply().unwrap();
}
