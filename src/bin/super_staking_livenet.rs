//! Livenet deploy and demo binary for Super Staking.
//!
//! Run with:
//! - Deploy only:       SUPER_STAKING_MODE=deploy cargo run --bin super_staking_livenet --features=livenet
//! - Deploy + demo:     SUPER_STAKING_MODE=deploy_and_demo cargo run ...
//! - Demo on existing:  SUPER_STAKING_MODE=demo SUPER_STAKING_EXISTING_TOKEN=... SUPER_STAKING_EXISTING_ORACLE=... SUPER_STAKING_EXISTING_LEDGER=... cargo run ...
//! - Withdraw:          SUPER_STAKING_MODE=withdraw (same EXISTING_* variables, after the lock elapsed)
//! - Query position:    SUPER_STAKING_MODE=query (same EXISTING_* variables)
//!
//! Required environment variables (Odra livenet):
//! - ODRA_CASPER_LIVENET_SECRET_KEY_PATH
//! - ODRA_CASPER_LIVENET_NODE_ADDRESS
//! - ODRA_CASPER_LIVENET_EVENTS_URL
//! - ODRA_CASPER_LIVENET_CHAIN_NAME
//!
//! Optional:
//! - ODRA_CASPER_LIVENET_DEPLOY_GAS          (motes)
//! - ODRA_CASPER_LIVENET_CALL_GAS            (motes)
//! - SUPER_STAKING_EXISTING_TOKEN            (64-hex or formatted "hash-..."/"contract-package-...")
//! - SUPER_STAKING_EXISTING_ORACLE           (any contract exposing `latest_quote`)
//! - SUPER_STAKING_EXISTING_LEDGER
//! - SUPER_STAKING_PRICE                     (initial feed value, default: 200000000000)
//! - SUPER_STAKING_PRICE_DECIMALS            (initial feed decimals, default: 8)
//! - SUPER_STAKING_DEMO_STAKE_CSPR           (default: 10)
//! - SUPER_STAKING_DEMO_LOCK_SECS            (default: 15552000)

use odra::casper_types::{U256, U512};
use odra::host::{Deployer, HostRef, HostRefLoader, NoArgs};
use odra::prelude::*;

use super_staking::access::Role;
use super_staking::price_feed::{ManualPriceFeed, ManualPriceFeedInitArgs};
use super_staking::staking::{
    PositionStatus, StakingLedger, StakingLedgerHostRef, StakingLedgerInitArgs, MIN_LOCK_SECS,
};
use super_staking::tokens::{RewardToken, RewardTokenHostRef};

const MOTES_PER_CSPR: u64 = 1_000_000_000;

const DEFAULT_PRICE: u64 = 200_000_000_000;
const DEFAULT_PRICE_DECIMALS: u8 = 8;

const DEFAULT_DEPLOY_GAS_MOTES: u64 = 450_000_000_000; // 450 CSPR
const DEFAULT_CALL_GAS_MOTES: u64 = 50_000_000_000; // 50 CSPR

fn main() {
    println!("============================================");
    println!("  Super Staking — Livenet");
    println!("============================================\n");

    let env = odra_casper_livenet_env::env();

    let mode = std::env::var("SUPER_STAKING_MODE").unwrap_or_else(|_| "deploy".to_string());
    let should_deploy = mode == "deploy" || mode == "deploy_and_demo";
    let should_demo = mode == "demo" || mode == "deploy_and_demo";
    let should_withdraw = mode == "withdraw";
    let should_query = mode == "query";

    let deploy_gas = read_u64_env("ODRA_CASPER_LIVENET_DEPLOY_GAS", DEFAULT_DEPLOY_GAS_MOTES);
    let call_gas = read_u64_env("ODRA_CASPER_LIVENET_CALL_GAS", DEFAULT_CALL_GAS_MOTES);

    let price = read_u64_env("SUPER_STAKING_PRICE", DEFAULT_PRICE);
    let price_decimals = read_u8_env("SUPER_STAKING_PRICE_DECIMALS", DEFAULT_PRICE_DECIMALS);
    let stake_cspr = read_u64_env("SUPER_STAKING_DEMO_STAKE_CSPR", 10);
    let lock_secs = read_u64_env("SUPER_STAKING_DEMO_LOCK_SECS", MIN_LOCK_SECS);
    let stake_motes = U512::from(stake_cspr) * U512::from(MOTES_PER_CSPR);

    println!("[INFO] Mode: {}", mode);
    println!("[INFO] Caller: {:?}", env.caller());
    println!(
        "[INFO] Gas (motes): deploy={} ({} CSPR), calls={} ({} CSPR)",
        deploy_gas,
        deploy_gas / MOTES_PER_CSPR,
        call_gas,
        call_gas / MOTES_PER_CSPR
    );
    println!(
        "[INFO] Demo params: stake={} CSPR, lock={} s, feed price={} ({} decimals)",
        stake_cspr, lock_secs, price, price_decimals
    );
    println!();

    // ==========================================
    // Step 1: Deploy (or reuse) STP reward token
    // ==========================================
    let mut token = if should_deploy {
        println!("[STEP 1] Deploying STP reward token...");
        env.set_gas(deploy_gas);
        let token = RewardToken::deploy(&env, NoArgs);
        println!("[OK] STP deployed at: {:?}", token.address());
        println!("     Name: {}", token.name());
        println!("     Symbol: {}", token.symbol());
        println!("     Admin: {:?}", token.admin());
        println!();
        token
    } else {
        println!("[STEP 1] Reusing existing STP reward token...");
        let addr = existing_address("SUPER_STAKING_EXISTING_TOKEN", &mode);
        println!("[OK] STP: {:?}", addr);
        println!();
        RewardToken::load(&env, addr)
    };
    let token_addr = token.address();

    // ==========================================
    // Step 2: Deploy (or reuse) the price feed
    // ==========================================
    let oracle_addr = if should_deploy && std::env::var("SUPER_STAKING_EXISTING_ORACLE").is_err() {
        println!("[STEP 2] Deploying operator price feed...");
        env.set_gas(deploy_gas);
        let feed = ManualPriceFeed::deploy(
            &env,
            ManualPriceFeedInitArgs {
                value: U256::from(price),
                decimals: price_decimals,
            },
        );
        let quote = feed.latest_quote();
        println!("[OK] Price feed deployed at: {:?}", feed.address());
        println!("     Quote: {} ({} decimals)", quote.value, quote.decimals);
        println!();
        feed.address()
    } else {
        println!("[STEP 2] Reusing existing price oracle...");
        let addr = existing_address("SUPER_STAKING_EXISTING_ORACLE", &mode);
        println!("[OK] Oracle: {:?}", addr);
        println!();
        addr
    };

    // ==========================================
    // Step 3: Deploy (or reuse) the staking ledger
    // ==========================================
    let mut ledger = if should_deploy {
        println!("[STEP 3] Deploying staking ledger...");
        env.set_gas(deploy_gas);
        let ledger = StakingLedger::deploy(
            &env,
            StakingLedgerInitArgs {
                reward_token: token_addr,
                price_oracle: oracle_addr,
            },
        );
        println!("[OK] Ledger deployed at: {:?}", ledger.address());
        println!("     Minimum lock: {} s", ledger.min_lock_secs());
        println!();
        ledger
    } else {
        println!("[STEP 3] Reusing existing staking ledger...");
        let addr = existing_address("SUPER_STAKING_EXISTING_LEDGER", &mode);
        println!("[OK] Ledger: {:?}", addr);
        println!();
        StakingLedger::load(&env, addr)
    };
    let ledger_addr = ledger.address();

    // ==========================================
    // Step 4: Grant the ledger the minter role (must succeed for stake to work)
    // ==========================================
    if should_query || should_withdraw {
        println!("[STEP 4] Skipping minter check (mode={})...", mode);
    } else {
        println!("[STEP 4] Granting minter role to the ledger...");
        if token.has_role(Role::Minter, ledger_addr) {
            println!("[OK] Ledger already holds the minter role.");
        } else {
            env.set_gas(call_gas);
            token.grant_role(Role::Minter, ledger_addr);
            if !token.has_role(Role::Minter, ledger_addr) {
                panic!("[FATAL] grant_role succeeded but the ledger is not a minter!");
            }
            println!("[OK] Minter role granted to {:?}", ledger_addr);
        }
    }
    println!();

    let caller = env.caller();

    if should_demo {
        println!("[DEMO 1] Staking {} CSPR for {} s...", stake_cspr, lock_secs);
        env.set_gas(call_gas);
        ledger.with_tokens(stake_motes).stake(lock_secs);
        println!("[OK] Stake complete.");
        print_position_info(&ledger, caller, &token);
    }

    if should_withdraw {
        println!("[DEMO] Withdrawing principal...");
        match ledger.position_of(caller) {
            Some(position) if position.status == PositionStatus::Active => {
                env.set_gas(call_gas);
                ledger.withdraw();
                println!("[OK] Withdrawal complete.");
                print_position_info(&ledger, caller, &token);
            }
            _ => println!("[WARN] No active position for caller. Skipping."),
        }
    }

    if should_query {
        let token_balance = token.balance_of(caller);
        match ledger.position_of(caller) {
            Some(pos) => println!(
                "SUPER_STAKING_POSITION_JSON={{\"principal_motes\":\"{}\",\"withdrawn_motes\":\"{}\",\"lock_duration_secs\":{},\"start_time_ms\":{},\"unlock_time_ms\":{},\"price_at_open\":\"{}\",\"price_decimals\":{},\"reward_minted\":\"{}\",\"status\":\"{:?}\",\"stp_balance\":\"{}\",\"user\":\"{:?}\"}}",
                pos.principal_motes,
                pos.withdrawn_motes,
                pos.lock_duration_secs,
                pos.start_time_ms,
                pos.unlock_time_ms(),
                pos.price_at_open.value,
                pos.price_at_open.decimals,
                pos.reward_minted,
                pos.status,
                token_balance,
                caller
            ),
            None => println!(
                "SUPER_STAKING_POSITION_JSON={{\"status\":\"None\",\"stp_balance\":\"{}\",\"user\":\"{:?}\"}}",
                token_balance, caller
            ),
        }
        return;
    }

    output_deploy_json(token_addr, oracle_addr, ledger_addr);
}

fn print_position_info(ledger: &StakingLedgerHostRef, user: Address, token: &RewardTokenHostRef) {
    match ledger.position_of(user) {
        Some(pos) => {
            println!("     principal: {} motes", pos.principal_motes);
            println!("     withdrawn: {} motes", pos.withdrawn_motes);
            println!("     lock: {} s", pos.lock_duration_secs);
            println!("     unlock_time_ms: {}", pos.unlock_time_ms());
            println!(
                "     price_at_open: {} ({} decimals)",
                pos.price_at_open.value, pos.price_at_open.decimals
            );
            println!("     reward_minted: {}", pos.reward_minted);
            println!("     status: {:?}", pos.status);
        }
        None => println!("     no position"),
    }
    println!("     total_staked: {}", ledger.total_staked());
    println!("     user STP balance: {}", token.balance_of(user));
    println!();
}

fn read_u64_env(name: &str, default_value: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => {
            let cleaned = raw.trim().replace('_', "");
            cleaned.parse::<u64>().unwrap_or(default_value)
        }
        Err(_) => default_value,
    }
}

fn read_u8_env(name: &str, default_value: u8) -> u8 {
    let value = read_u64_env(name, u64::from(default_value));
    u8::try_from(value)
        .unwrap_or_else(|_| panic!("{} must be at most {}, got {}", name, u8::MAX, value))
}

fn existing_address(var: &str, mode: &str) -> Address {
    let raw = std::env::var(var)
        .unwrap_or_else(|_| panic!("{} must be set for mode={}", var, mode));
    parse_contract_address(&raw)
}

fn output_deploy_json(token_addr: Address, oracle_addr: Address, ledger_addr: Address) {
    let chain_name =
        std::env::var("ODRA_CASPER_LIVENET_CHAIN_NAME").unwrap_or_else(|_| "casper-test".to_string());
    let node_url = std::env::var("ODRA_CASPER_LIVENET_NODE_ADDRESS")
        .unwrap_or_else(|_| "https://node.testnet.casper.network".to_string());

    println!(
        r#"SUPER_STAKING_DEPLOY_JSON={{"chain_name":"{}","node_url":"{}","token_contract_hash":"{}","oracle_contract_hash":"{}","ledger_contract_hash":"{}","deployed_at":"{}"}}"#,
        chain_name,
        node_url,
        format_address_hash(&token_addr),
        format_address_hash(&oracle_addr),
        format_address_hash(&ledger_addr),
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );
}

fn format_address_hash(addr: &Address) -> String {
    let debug_str = format!("{:?}", addr);
    if let Some(start) = debug_str.find('[') {
        if let Some(end) = debug_str.rfind(']') {
            let bytes_str = &debug_str[start + 1..end];
            let mut result = String::new();
            for part in bytes_str.split(", ") {
                if let Some(hex) = part.strip_prefix("0x").or_else(|| part.strip_prefix("0X")) {
                    result.push_str(hex);
                }
            }
            return result;
        }
    }
    debug_str
}

fn parse_contract_address(raw: &str) -> Address {
    use odra::casper_types::account::AccountHash;
    use odra::casper_types::contracts::ContractPackageHash;

    fn decode_hex_32(s: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        if s.len() != 64 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            panic!("Invalid address hash (expected 64 hex): {}", s);
        }
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .unwrap_or_else(|_| panic!("Invalid hex in address: {}", s));
        }
        out
    }

    let trimmed = raw.trim();
    if let Some(hex) = trimmed.strip_prefix("account-hash-") {
        return Address::Account(AccountHash::new(decode_hex_32(hex)));
    }
    for prefix in ["contract-package-", "package-", "hash-"] {
        if let Some(hex) = trimmed.strip_prefix(prefix) {
            return Address::Contract(ContractPackageHash::new(decode_hex_32(hex)));
        }
    }
    if trimmed.len() == 64 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        return Address::Contract(ContractPackageHash::new(decode_hex_32(trimmed)));
    }

    panic!("Invalid address format: {}", trimmed);
}
