//! Reward Token Tests
//!
//! CEP-18 behaviour of STP and the admin-gated minter role

use odra::casper_types::account::AccountHash;
use odra::casper_types::U256;
use odra::host::{Deployer, HostEnv, HostRef, NoArgs};
use odra::prelude::Address;

use super_staking::access::events::{RoleGranted, RoleRevoked};
use super_staking::access::{AccessError, Role};
use super_staking::tokens::{RewardToken, RewardTokenHostRef, TokenError, REWARD_DECIMALS};

fn deploy_token(env: &HostEnv) -> RewardTokenHostRef {
    env.set_caller(env.get_account(0));
    RewardToken::deploy(env, NoArgs)
}

#[test]
fn test_metadata() {
    let env = odra_test::env();
    let token = deploy_token(&env);

    assert_eq!(token.name(), "Super Token");
    assert_eq!(token.symbol(), "STP");
    assert_eq!(token.decimals(), REWARD_DECIMALS);
    assert_eq!(token.decimals(), 18);
    assert_eq!(token.total_supply(), U256::zero());
    assert_eq!(token.admin(), Some(env.get_account(0)));
}

#[test]
#[should_panic(expected = "Unauthorized")]
fn test_mint_without_role_reverts() {
    let env = odra_test::env();
    let mut token = deploy_token(&env);

    // even the admin needs the role
    token.mint(env.get_account(1), U256::from(100u64));
}

#[test]
fn test_grant_role_enables_mint() {
    let env = odra_test::env();
    let mut token = deploy_token(&env);
    let admin = env.get_account(0);
    let minter = env.get_account(1);
    let holder = env.get_account(2);

    token.grant_role(Role::Minter, minter);
    assert!(token.has_role(Role::Minter, minter));
    assert!(!token.has_role(Role::Minter, admin));

    let event: RoleGranted = env.get_event(&token, -1).expect("RoleGranted event");
    assert_eq!(
        event,
        RoleGranted {
            role: Role::Minter,
            account: minter,
            sender: admin,
        }
    );

    env.set_caller(minter);
    token.mint(holder, U256::from(500u64));
    assert_eq!(token.balance_of(holder), U256::from(500u64));
    assert_eq!(token.total_supply(), U256::from(500u64));
}

#[test]
fn test_revoke_role_disables_mint() {
    let env = odra_test::env();
    let mut token = deploy_token(&env);
    let admin = env.get_account(0);
    let minter = env.get_account(1);

    token.grant_role(Role::Minter, minter);
    token.revoke_role(Role::Minter, minter);
    assert!(!token.has_role(Role::Minter, minter));

    let event: RoleRevoked = env.get_event(&token, -1).expect("RoleRevoked event");
    assert_eq!(
        event,
        RoleRevoked {
            role: Role::Minter,
            account: minter,
            sender: admin,
        }
    );

    env.set_caller(minter);
    assert_eq!(
        token.try_mint(minter, U256::from(1u64)),
        Err(TokenError::Unauthorized.into())
    );
}

#[test]
fn test_role_changes_restricted_to_admin() {
    let env = odra_test::env();
    let mut token = deploy_token(&env);
    let minter = env.get_account(1);
    let intruder = env.get_account(2);

    token.grant_role(Role::Minter, minter);

    env.set_caller(intruder);
    assert_eq!(
        token.try_grant_role(Role::Minter, intruder),
        Err(AccessError::Unauthorized.into())
    );
    assert_eq!(
        token.try_revoke_role(Role::Minter, minter),
        Err(AccessError::Unauthorized.into())
    );

    // a minter is not an admin either
    env.set_caller(minter);
    assert_eq!(
        token.try_grant_role(Role::Minter, intruder),
        Err(AccessError::Unauthorized.into())
    );

    assert!(token.has_role(Role::Minter, minter));
    assert!(!token.has_role(Role::Minter, intruder));
}

#[test]
fn test_repeated_grant_and_revoke_are_noops() {
    let env = odra_test::env();
    let mut token = deploy_token(&env);
    let minter = env.get_account(1);

    token.grant_role(Role::Minter, minter);
    token.grant_role(Role::Minter, minter);
    assert!(token.has_role(Role::Minter, minter));

    token.revoke_role(Role::Minter, minter);
    token.revoke_role(Role::Minter, minter);
    assert!(!token.has_role(Role::Minter, minter));
}

#[test]
fn test_role_matches_package_hash_under_either_address_kind() {
    let env = odra_test::env();
    let mut token = deploy_token(&env);
    let other = deploy_token(&env);

    let package = other.contract_address();
    let package_hash = *package
        .as_contract_package_hash()
        .expect("deployed contracts are addressed by package");
    let entity = Address::Account(AccountHash::new(package_hash.value()));

    token.grant_role(Role::Minter, entity);
    assert!(token.has_role(Role::Minter, package));

    // granting the other form again is a no-op
    token.grant_role(Role::Minter, package);
    let event: RoleGranted = env.get_event(&token, -1).expect("RoleGranted event");
    assert_eq!(event.account, entity);

    token.revoke_role(Role::Minter, package);
    assert!(!token.has_role(Role::Minter, package));
    assert!(!token.has_role(Role::Minter, entity));
}

#[test]
fn test_transfer_approve_transfer_from() {
    let env = odra_test::env();
    let mut token = deploy_token(&env);
    let admin = env.get_account(0);
    let alice = env.get_account(1);
    let bob = env.get_account(2);
    let carol = env.get_account(3);

    token.grant_role(Role::Minter, admin);
    token.mint(alice, U256::from(1_000u64));

    env.set_caller(alice);
    token.transfer(bob, U256::from(300u64));
    assert_eq!(token.balance_of(alice), U256::from(700u64));
    assert_eq!(token.balance_of(bob), U256::from(300u64));

    token.approve(carol, U256::from(200u64));
    assert_eq!(token.allowance(alice, carol), U256::from(200u64));
    token.increase_allowance(carol, U256::from(50u64));
    token.decrease_allowance(carol, U256::from(100u64));
    assert_eq!(token.allowance(alice, carol), U256::from(150u64));

    env.set_caller(carol);
    token.transfer_from(alice, carol, U256::from(150u64));
    assert_eq!(token.balance_of(carol), U256::from(150u64));
    assert_eq!(token.balance_of(alice), U256::from(550u64));
    assert_eq!(token.allowance(alice, carol), U256::zero());
    assert_eq!(token.total_supply(), U256::from(1_000u64));
}

#[test]
fn test_transfer_from_over_allowance_reverts() {
    let env = odra_test::env();
    let mut token = deploy_token(&env);
    let admin = env.get_account(0);
    let alice = env.get_account(1);
    let bob = env.get_account(2);

    token.grant_role(Role::Minter, admin);
    token.mint(alice, U256::from(1_000u64));

    env.set_caller(alice);
    token.approve(bob, U256::from(10u64));

    env.set_caller(bob);
    assert!(token.try_transfer_from(alice, bob, U256::from(11u64)).is_err());
    assert_eq!(token.balance_of(alice), U256::from(1_000u64));
}
