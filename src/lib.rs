//! Super Staking — time-locked CSPR staking with oracle-priced rewards (Odra)
//!
//! This crate implements a staking/reward ledger on Casper using Odra framework.
//! - STP: CEP-18 reward token, mintable only by holders of the minter role
//! - PriceOracle: external quote source, with an operator-published feed
//! - StakingLedger: one time-locked position per depositor, rewarded in STP

#![cfg_attr(target_arch = "wasm32", no_std)]

extern crate alloc;

pub mod access;
pub mod tokens;
pub mod price_feed;
pub mod staking;
