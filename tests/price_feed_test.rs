//! Price Feed Tests

use odra::casper_types::U256;
use odra::host::Deployer;

use super_staking::price_feed::events::QuotePublished;
use super_staking::price_feed::{
    ManualPriceFeed, ManualPriceFeedInitArgs, PriceFeedError, PriceQuote,
};

#[test]
fn test_initial_quote() {
    let env = odra_test::env();
    let operator = env.get_account(0);
    env.set_caller(operator);

    let feed = ManualPriceFeed::deploy(
        &env,
        ManualPriceFeedInitArgs {
            value: U256::from(200_000_000_000u64),
            decimals: 8,
        },
    );

    let quote = feed.latest_quote();
    assert_eq!(quote.value, U256::from(200_000_000_000u64));
    assert_eq!(quote.decimals, 8);
    assert_eq!(feed.operator(), Some(operator));
}

#[test]
fn test_publish_stamps_block_time() {
    let env = odra_test::env();
    env.set_caller(env.get_account(0));

    let mut feed = ManualPriceFeed::deploy(
        &env,
        ManualPriceFeedInitArgs {
            value: U256::from(1u64),
            decimals: 8,
        },
    );
    let first = feed.latest_quote();

    env.advance_block_time(60_000);
    feed.publish(U256::from(123_456u64), 6);

    let quote = feed.latest_quote();
    assert_eq!(
        quote,
        PriceQuote {
            value: U256::from(123_456u64),
            decimals: 6,
            observed_at: first.observed_at + 60_000,
        }
    );

    let event: QuotePublished = env.get_event(&feed, -1).expect("QuotePublished event");
    assert_eq!(event.value, quote.value);
    assert_eq!(event.decimals, quote.decimals);
    assert_eq!(event.observed_at, quote.observed_at);
}

#[test]
fn test_publish_restricted_to_operator() {
    let env = odra_test::env();
    env.set_caller(env.get_account(0));

    let mut feed = ManualPriceFeed::deploy(
        &env,
        ManualPriceFeedInitArgs {
            value: U256::from(42u64),
            decimals: 8,
        },
    );

    env.set_caller(env.get_account(1));
    assert_eq!(
        feed.try_publish(U256::from(1u64), 8),
        Err(PriceFeedError::Unauthorized.into())
    );
    assert_eq!(feed.latest_quote().value, U256::from(42u64));
}
