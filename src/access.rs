//! Role registry for privileged token operations.
//!
//! A single administrator, fixed at creation, decides which accounts hold
//! which [`Role`]. Holders are kept in a `(Role, Address) -> bool` mapping.
//!
//! Lookups also match the same 32-byte hash under the other address kind: on
//! Casper 2.0 a contract granted by package hash can surface as an entity
//! account when it calls in.

use odra::casper_types::account::AccountHash;
use odra::casper_types::contracts::ContractPackageHash;
use odra::prelude::*;

/// Capabilities that can be granted on the reward token
#[odra::odra_type]
#[derive(Copy)]
pub enum Role {
    /// May call `mint` on the reward token
    Minter = 0,
}

pub mod events {
    use super::Role;
    use odra::prelude::*;

    #[odra::event]
    pub struct RoleGranted {
        pub role: Role,
        pub account: Address,
        pub sender: Address,
    }

    #[odra::event]
    pub struct RoleRevoked {
        pub role: Role,
        pub account: Address,
        pub sender: Address,
    }
}

#[odra::odra_error]
pub enum AccessError {
    Unauthorized = 61001,
}

/// Administrator-gated mapping from role to authorized accounts
#[odra::module(events = [events::RoleGranted, events::RoleRevoked], errors = AccessError)]
pub struct RoleRegistry {
    admin: Var<Address>,
    members: Mapping<(Role, Address), bool>,
}

#[odra::module]
impl RoleRegistry {
    /// Set the administrator. Called once by the owning contract's `init`.
    pub fn init(&mut self, admin: Address) {
        self.admin.set(admin);
    }

    pub fn admin(&self) -> Option<Address> {
        self.admin.get()
    }

    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.is_member(role, account) || self.is_member(role, counterpart(&account))
    }

    /// Add `account` to `role` (admin only)
    pub fn grant_role(&mut self, role: Role, account: Address) {
        let sender = self.require_admin();
        if self.has_role(role, account) {
            return;
        }
        self.members.set(&(role, account), true);
        self.env().emit_event(events::RoleGranted {
            role,
            account,
            sender,
        });
    }

    /// Remove `account` from `role` (admin only)
    pub fn revoke_role(&mut self, role: Role, account: Address) {
        let sender = self.require_admin();
        if !self.has_role(role, account) {
            return;
        }
        self.members.set(&(role, account), false);
        self.members.set(&(role, counterpart(&account)), false);
        self.env().emit_event(events::RoleRevoked {
            role,
            account,
            sender,
        });
    }

    fn is_member(&self, role: Role, account: Address) -> bool {
        self.members.get(&(role, account)).unwrap_or_default()
    }

    fn require_admin(&self) -> Address {
        let caller = self.env().caller();
        if self.admin.get() != Some(caller) {
            self.env().revert(AccessError::Unauthorized);
        }
        caller
    }
}

/// `account`'s hash under the other address kind
fn counterpart(account: &Address) -> Address {
    match account {
        Address::Account(hash) => Address::Contract(ContractPackageHash::new(hash.value())),
        Address::Contract(hash) => Address::Account(AccountHash::new(hash.value())),
    }
}
