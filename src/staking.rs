//! Super Staking Ledger
//!
//! Time-locked CSPR staking that pays out STP reward tokens.
//! - A depositor locks CSPR for at least six months (one position at a time)
//! - The reward is priced from an oracle quote and minted when the position opens
//! - After the lock elapses the full principal is returned and the slot can be reused
//!
//! A deferred variant (`stake_deferred` / `withdraw_amount`) prices the reward
//! at withdrawal time instead and lets the principal be taken out in pieces.
//! Positions remember which variant opened them; the two withdraw entry points
//! do not accept each other's positions.
//!
//! ## Units
//! - CSPR: motes (U512)
//! - STP: 18 decimals (U256)
//! - Time: block time in milliseconds, lock durations in seconds
//!
//! ## Reward
//! `reward = principal_motes * quote.value * 10^(18 - quote.decimals)`,
//! truncated when the exponent is negative.

use odra::casper_types::{U256, U512};
use odra::prelude::*;
use odra::ContractRef;

use crate::price_feed::{PriceOracleContractRef, PriceQuote};
use crate::tokens::{RewardTokenContractRef, REWARD_DECIMALS};

// ==========================================
// Constants
// ==========================================

/// Minimum lock = six 30-day months
pub const MIN_LOCK_SECS: u64 = 15_552_000;

const MILLIS_PER_SEC: u64 = 1_000;

// ==========================================
// Events
// ==========================================

pub mod events {
    use odra::casper_types::{U256, U512};
    use odra::prelude::*;

    #[odra::event]
    pub struct Staked {
        pub depositor: Address,
        pub amount_motes: U512,
        pub lock_duration_secs: u64,
        pub price: U256,
    }

    #[odra::event]
    pub struct Withdrawn {
        pub depositor: Address,
        pub amount_motes: U512,
        /// Set only for deferred positions, which are priced at withdrawal
        pub price_at_withdraw: Option<U256>,
    }
}

// ==========================================
// Types
// ==========================================

#[odra::odra_type]
#[derive(Default)]
pub enum PositionStatus {
    #[default]
    None = 0,
    Active = 1,
    Settled = 2,
}

/// When the reward of a position is priced and minted
#[odra::odra_type]
#[derive(Default, Copy)]
pub enum RewardPricing {
    /// Priced with the quote read at open, minted at open
    #[default]
    AtOpen = 0,
    /// Priced with the quote read at each withdrawal, minted then
    AtSettlement = 1,
}

/// Per-depositor staking record
#[odra::odra_type]
pub struct Position {
    pub principal_motes: U512,
    pub withdrawn_motes: U512,
    pub lock_duration_secs: u64,
    pub start_time_ms: u64,
    pub price_at_open: PriceQuote,
    pub reward_pricing: RewardPricing,
    pub reward_minted: U256,
    pub status: PositionStatus,
}

impl Position {
    pub fn unlock_time_ms(&self) -> u64 {
        self.start_time_ms
            .saturating_add(self.lock_duration_secs.saturating_mul(MILLIS_PER_SEC))
    }

    pub fn remaining_motes(&self) -> U512 {
        self.principal_motes - self.withdrawn_motes
    }

    pub fn is_active(&self) -> bool {
        self.status == PositionStatus::Active
    }
}

// ==========================================
// Errors
// ==========================================

#[odra::odra_error]
pub enum StakingError {
    LockTooShort = 1,
    ZeroDeposit = 2,
    PositionAlreadyOpen = 3,
    NothingStaked = 4,
    LockNotElapsed = 5,
    ExcessiveWithdrawal = 6,
    ZeroWithdrawal = 7,
    PricingMismatch = 8,
    RewardOverflow = 9,
    NotInitialized = 10,
}

// ==========================================
// Reward Math
// ==========================================

/// Reward for `principal_motes` at `quote`, scaled to `reward_decimals`.
///
/// Computed in U512 and narrowed at the end, so a large intermediate product
/// that truncates back into range is still paid. Returns `None` if the
/// result does not fit in U256.
pub fn reward_for(principal_motes: U512, quote: &PriceQuote, reward_decimals: u8) -> Option<U256> {
    let gross = principal_motes.checked_mul(widen(quote.value))?;

    let reward = if reward_decimals >= quote.decimals {
        gross.checked_mul(pow10(reward_decimals - quote.decimals)?)?
    } else {
        match pow10(quote.decimals - reward_decimals) {
            Some(divisor) => gross / divisor,
            // divisor exceeds U512, every gross value truncates to zero
            None => U512::zero(),
        }
    };
    narrow(reward)
}

fn pow10(exp: u8) -> Option<U512> {
    U512::from(10u8).checked_pow(U512::from(exp))
}

fn widen(value: U256) -> U512 {
    let mut bytes = [0u8; 32];
    value.to_little_endian(&mut bytes);
    U512::from_little_endian(&bytes)
}

fn narrow(value: U512) -> Option<U256> {
    if value > widen(U256::MAX) {
        return None;
    }
    let mut bytes = [0u8; 64];
    value.to_little_endian(&mut bytes);
    Some(U256::from_little_endian(&bytes[..32]))
}

// ==========================================
// Contract
// ==========================================

#[odra::module(events = [events::Staked, events::Withdrawn], errors = StakingError)]
pub struct StakingLedger {
    reward_token: Var<Address>,
    price_oracle: Var<Address>,

    positions: Mapping<Address, Position>,

    /// Principal currently held in custody
    total_staked: Var<U512>,
}

#[odra::module]
impl StakingLedger {
    /// Initialize the ledger with its reward token and price oracle.
    /// The ledger must be granted the minter role on the token before staking.
    pub fn init(&mut self, reward_token: Address, price_oracle: Address) {
        self.reward_token.set(reward_token);
        self.price_oracle.set(price_oracle);
        self.total_staked.set(U512::zero());
    }

    // ==========================================
    // User Functions
    // ==========================================

    /// Lock the attached CSPR for `lock_duration_secs` and receive the
    /// reward immediately, priced at the current quote.
    #[odra(payable)]
    pub fn stake(&mut self, lock_duration_secs: u64) {
        self.open_position(lock_duration_secs, RewardPricing::AtOpen);
    }

    /// Return the full principal once the lock has elapsed.
    pub fn withdraw(&mut self) {
        let caller = self.env().caller();
        let mut position = self.require_active(caller);
        if position.reward_pricing != RewardPricing::AtOpen {
            self.env().revert(StakingError::PricingMismatch);
        }
        self.require_unlocked(&position);

        let amount = position.remaining_motes();
        position.withdrawn_motes = position.principal_motes;
        position.status = PositionStatus::Settled;
        self.positions.set(&caller, position);
        self.release_custody(amount);

        self.env().transfer_tokens(&caller, &amount);

        self.env().emit_event(events::Withdrawn {
            depositor: caller,
            amount_motes: amount,
            price_at_withdraw: None,
        });
    }

    /// Lock the attached CSPR without minting. The reward is priced and
    /// minted on each `withdraw_amount`.
    #[odra(payable)]
    pub fn stake_deferred(&mut self, lock_duration_secs: u64) {
        self.open_position(lock_duration_secs, RewardPricing::AtSettlement);
    }

    /// Withdraw part of a deferred position once the lock has elapsed.
    /// Mints the reward for `amount_motes` at the current quote. The position
    /// settles when nothing remains.
    pub fn withdraw_amount(&mut self, amount_motes: U512) {
        let caller = self.env().caller();
        let mut position = self.require_active(caller);
        if position.reward_pricing != RewardPricing::AtSettlement {
            self.env().revert(StakingError::PricingMismatch);
        }
        self.require_unlocked(&position);
        if amount_motes.is_zero() {
            self.env().revert(StakingError::ZeroWithdrawal);
        }
        if amount_motes > position.remaining_motes() {
            self.env().revert(StakingError::ExcessiveWithdrawal);
        }

        let quote = self.read_quote();
        let reward = self.reward_or_revert(amount_motes, &quote);

        position.withdrawn_motes = position.withdrawn_motes + amount_motes;
        position.reward_minted = position.reward_minted.saturating_add(reward);
        if position.remaining_motes().is_zero() {
            position.status = PositionStatus::Settled;
        }
        self.positions.set(&caller, position);
        self.release_custody(amount_motes);

        self.env().transfer_tokens(&caller, &amount_motes);
        self.reward_token_ref().mint(caller, reward);

        self.env().emit_event(events::Withdrawn {
            depositor: caller,
            amount_motes,
            price_at_withdraw: Some(quote.value),
        });
    }

    // ==========================================
    // View Functions
    // ==========================================

    /// Latest position of `depositor`, settled ones included
    pub fn position_of(&self, depositor: Address) -> Option<Position> {
        self.positions.get(&depositor)
    }

    pub fn total_staked(&self) -> U512 {
        self.total_staked.get_or_default()
    }

    pub fn reward_token(&self) -> Option<Address> {
        self.reward_token.get()
    }

    pub fn price_oracle(&self) -> Option<Address> {
        self.price_oracle.get()
    }

    pub fn min_lock_secs(&self) -> u64 {
        MIN_LOCK_SECS
    }

    // ==========================================
    // Internal Functions
    // ==========================================

    fn open_position(&mut self, lock_duration_secs: u64, reward_pricing: RewardPricing) {
        let caller = self.env().caller();
        let amount = self.env().attached_value();

        if lock_duration_secs < MIN_LOCK_SECS {
            self.env().revert(StakingError::LockTooShort);
        }
        if amount.is_zero() {
            self.env().revert(StakingError::ZeroDeposit);
        }
        if let Some(existing) = self.positions.get(&caller) {
            if existing.is_active() {
                self.env().revert(StakingError::PositionAlreadyOpen);
            }
        }

        let quote = self.read_quote();
        let reward = match reward_pricing {
            RewardPricing::AtOpen => self.reward_or_revert(amount, &quote),
            RewardPricing::AtSettlement => U256::zero(),
        };
        let price = quote.value;
        let start_time_ms = self.env().get_block_time();

        self.positions.set(
            &caller,
            Position {
                principal_motes: amount,
                withdrawn_motes: U512::zero(),
                lock_duration_secs,
                start_time_ms,
                price_at_open: quote,
                reward_pricing,
                reward_minted: reward,
                status: PositionStatus::Active,
            },
        );
        let total = self.total_staked.get_or_default();
        self.total_staked.set(total + amount);

        if reward_pricing == RewardPricing::AtOpen {
            self.reward_token_ref().mint(caller, reward);
        }

        self.env().emit_event(events::Staked {
            depositor: caller,
            amount_motes: amount,
            lock_duration_secs,
            price,
        });
    }

    fn require_active(&self, depositor: Address) -> Position {
        match self.positions.get(&depositor) {
            Some(position) if position.is_active() => position,
            _ => self.env().revert(StakingError::NothingStaked),
        }
    }

    fn require_unlocked(&self, position: &Position) {
        if self.env().get_block_time() < position.unlock_time_ms() {
            self.env().revert(StakingError::LockNotElapsed);
        }
    }

    fn release_custody(&mut self, amount: U512) {
        let total = self.total_staked.get_or_default();
        self.total_staked.set(total.saturating_sub(amount));
    }

    fn read_quote(&self) -> PriceQuote {
        let oracle = self
            .price_oracle
            .get_or_revert_with(StakingError::NotInitialized);
        PriceOracleContractRef::new(self.env().clone(), oracle).latest_quote()
    }

    fn reward_token_ref(&self) -> RewardTokenContractRef {
        let token = self
            .reward_token
            .get_or_revert_with(StakingError::NotInitialized);
        RewardTokenContractRef::new(self.env().clone(), token)
    }

    fn reward_or_revert(&self, principal_motes: U512, quote: &PriceQuote) -> U256 {
        reward_for(principal_motes, quote, REWARD_DECIMALS)
            .unwrap_or_else(|| self.env().revert(StakingError::RewardOverflow))
    }
}
