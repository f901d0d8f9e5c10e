//! STP reward token (CEP-18)
//!
//! Minting is restricted to accounts holding [`Role::Minter`] in the token's
//! [`RoleRegistry`]; the deployer administers that registry.

use alloc::string::String;
use odra::casper_types::U256;
use odra::prelude::*;
use odra_modules::cep18::events::{
    DecreaseAllowance, IncreaseAllowance, Mint, SetAllowance, Transfer, TransferFrom,
};
use odra_modules::cep18_token::Cep18;

use crate::access::{events::RoleGranted, events::RoleRevoked, Role, RoleRegistry};

/// Decimal scale of the reward token. Staking rewards are normalized to it.
pub const REWARD_DECIMALS: u8 = 18;

pub const REWARD_TOKEN_NAME: &str = "Super Token";
pub const REWARD_TOKEN_SYMBOL: &str = "STP";

/// Token errors. Balance and allowance failures come from the CEP-18 submodule.
#[odra::odra_error]
pub enum TokenError {
    Unauthorized = 60004,
}

#[odra::module(
    events = [
        Mint,
        SetAllowance,
        IncreaseAllowance,
        DecreaseAllowance,
        Transfer,
        TransferFrom,
        RoleGranted,
        RoleRevoked
    ],
    errors = TokenError
)]
pub struct RewardToken {
    token: SubModule<Cep18>,
    roles: SubModule<RoleRegistry>,
}

#[odra::module]
impl RewardToken {
    /// Initialize the token. The deployer becomes the role administrator.
    pub fn init(&mut self) {
        self.token.init(
            REWARD_TOKEN_SYMBOL.to_string(),
            REWARD_TOKEN_NAME.to_string(),
            REWARD_DECIMALS,
            U256::zero(),
        );
        let admin = self.env().caller();
        self.roles.init(admin);
    }

    pub fn name(&self) -> String {
        self.token.name()
    }

    pub fn symbol(&self) -> String {
        self.token.symbol()
    }

    pub fn decimals(&self) -> u8 {
        self.token.decimals()
    }

    pub fn total_supply(&self) -> U256 {
        self.token.total_supply()
    }

    pub fn balance_of(&self, owner: Address) -> U256 {
        self.token.balance_of(&owner)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.token.allowance(&owner, &spender)
    }

    pub fn transfer(&mut self, recipient: Address, amount: U256) {
        self.token.transfer(&recipient, &amount);
    }

    pub fn approve(&mut self, spender: Address, amount: U256) {
        self.token.approve(&spender, &amount);
    }

    pub fn increase_allowance(&mut self, spender: Address, amount: U256) {
        self.token.increase_allowance(&spender, &amount);
    }

    pub fn decrease_allowance(&mut self, spender: Address, amount: U256) {
        self.token.decrease_allowance(&spender, &amount);
    }

    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) {
        self.token.transfer_from(&owner, &recipient, &amount);
    }

    /// Mint tokens (minter role only)
    pub fn mint(&mut self, to: Address, amount: U256) {
        let caller = self.env().caller();
        if !self.roles.has_role(Role::Minter, caller) {
            self.env().revert(TokenError::Unauthorized);
        }
        self.token.raw_mint(&to, &amount);
    }

    /// Role administrator set at deployment
    pub fn admin(&self) -> Option<Address> {
        self.roles.admin()
    }

    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.roles.has_role(role, account)
    }

    /// Grant `role` to `account` (admin only)
    pub fn grant_role(&mut self, role: Role, account: Address) {
        self.roles.grant_role(role, account);
    }

    /// Revoke `role` from `account` (admin only)
    pub fn revoke_role(&mut self, role: Role, account: Address) {
        self.roles.revoke_role(role, account);
    }
}
