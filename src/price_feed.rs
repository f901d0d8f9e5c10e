//! Price Oracle Interface
//!
//! The staking ledger reads quotes through the [`PriceOracle`] external
//! contract interface, addressed by package hash at init time. Any contract
//! exposing a compatible `latest_quote` entry point can back it.
//!
//! [`ManualPriceFeed`] is an operator-published feed implementing the same
//! entry point. It is used by the tests, the livenet demo and on testnets
//! without an aggregator.

use odra::casper_types::U256;
use odra::prelude::*;

/// A price observation: `value / 10^decimals`, observed at `observed_at`
/// (block time, milliseconds)
#[odra::odra_type]
pub struct PriceQuote {
    pub value: U256,
    pub decimals: u8,
    pub observed_at: u64,
}

/// Price Oracle External Contract Interface
#[odra::external_contract]
pub trait PriceOracle {
    /// Latest quote of the feed. No freshness guarantee is implied.
    fn latest_quote(&self) -> PriceQuote;
}

pub mod events {
    use odra::casper_types::U256;
    use odra::prelude::*;

    #[odra::event]
    pub struct QuotePublished {
        pub value: U256,
        pub decimals: u8,
        pub observed_at: u64,
    }
}

#[odra::odra_error]
pub enum PriceFeedError {
    Unauthorized = 62001,
}

/// Operator-published price feed
#[odra::module(events = [events::QuotePublished], errors = PriceFeedError)]
pub struct ManualPriceFeed {
    operator: Var<Address>,
    value: Var<U256>,
    decimals: Var<u8>,
    observed_at: Var<u64>,
}

#[odra::module]
impl ManualPriceFeed {
    /// Initialize with a first quote. The deployer becomes the operator.
    pub fn init(&mut self, value: U256, decimals: u8) {
        self.operator.set(self.env().caller());
        self.store_quote(value, decimals);
    }

    /// Publish a new quote (operator only)
    pub fn publish(&mut self, value: U256, decimals: u8) {
        if self.operator.get() != Some(self.env().caller()) {
            self.env().revert(PriceFeedError::Unauthorized);
        }
        self.store_quote(value, decimals);
    }

    pub fn latest_quote(&self) -> PriceQuote {
        PriceQuote {
            value: self.value.get_or_default(),
            decimals: self.decimals.get_or_default(),
            observed_at: self.observed_at.get_or_default(),
        }
    }

    pub fn operator(&self) -> Option<Address> {
        self.operator.get()
    }

    fn store_quote(&mut self, value: U256, decimals: u8) {
        let observed_at = self.env().get_block_time();
        self.value.set(value);
        self.decimals.set(decimals);
        self.observed_at.set(observed_at);
        self.env().emit_event(events::QuotePublished {
            value,
            decimals,
            observed_at,
        });
    }
}
