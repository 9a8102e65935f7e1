//! AuraSwap service binary
//!
//! Thin orchestration over the exchange core: provisions a pool from
//! configuration, persists state as JSON between invocations, and maps each
//! exchange operation to one subcommand. Receipts and errors print as JSON
//! so callers can render them directly.

mod state;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::ExchangeConfig;
use exchange_core::Custody;
use serde_json::json;
use state::ExchangeState;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use types::{AccountId, AssetSide, DisplayAmount, RawAmount};

#[derive(Parser)]
#[command(name = "auraswap", about = "Constant-product AMM exchange", version)]
struct Cli {
    /// Configuration file (defaults to config/auraswap.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the state file from configuration
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SwapDirection {
    EthToToken,
    TokenToEth,
}

#[derive(Subcommand)]
enum Command {
    /// Create a fresh exchange instance and write its state file
    Provision {
        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },
    /// Seed an account with balances (demo faucet)
    Fund {
        account: AccountId,
        #[arg(long, default_value_t = 0)]
        base: RawAmount,
        #[arg(long, default_value_t = 0)]
        token: RawAmount,
    },
    /// Deposit liquidity at the current ratio
    AddLiquidity {
        account: AccountId,
        /// Base amount to deposit, in smallest units
        base: RawAmount,
        /// Token ceiling: initial ratio on an empty pool, caller bound otherwise
        #[arg(long)]
        max_token: RawAmount,
    },
    /// Burn shares and withdraw both assets proportionally
    RemoveLiquidity {
        account: AccountId,
        shares: RawAmount,
    },
    /// Swap base for token
    EthToToken {
        account: AccountId,
        amount: RawAmount,
        #[arg(long, default_value_t = 0)]
        min_out: RawAmount,
    },
    /// Swap token for base
    TokenToEth {
        account: AccountId,
        amount: RawAmount,
        #[arg(long, default_value_t = 0)]
        min_out: RawAmount,
    },
    /// Show reserves, share supply and spot price
    Reserves,
    /// Price a swap without executing it
    Quote {
        direction: SwapDirection,
        amount: RawAmount,
    },
    /// Show an account's custody balances and pool position
    Balance { account: AccountId },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ExchangeConfig::load(cli.config.as_deref())?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let state_path = cli
        .state
        .clone()
        .unwrap_or_else(|| config.pool.state_file.clone());

    match cli.command {
        Command::Provision { force } => {
            if state_path.exists() && !force {
                bail!(
                    "State file {} already exists; pass --force to overwrite",
                    state_path.display()
                );
            }
            let state = ExchangeState::provision(&config);
            state.save(&state_path)?;
            let pair = format!("{}/{}", state.base_symbol, state.token_symbol);
            info!(%pair, fee_bps = config.fee_bps, "Exchange provisioned");
            print_json(&json!({
                "provisioned": {
                    "pair": pair,
                    "fee_bps": config.fee_bps,
                    "state_file": state_path,
                }
            }))
        }
        Command::Fund { account, base, token } => {
            let mut state = ExchangeState::load(&state_path)?;
            state.custody.fund(account, AssetSide::Base, base);
            state.custody.fund(account, AssetSide::Token, token);
            state.save(&state_path)?;
            print_balances(&state, &config, &account)
        }
        Command::AddLiquidity {
            account,
            base,
            max_token,
        } => {
            let mut state = ExchangeState::load(&state_path)?;
            let receipt = state
                .pool
                .add_liquidity(&mut state.custody, account, base, max_token)
                .context("add_liquidity failed")?;
            state.save(&state_path)?;
            print_json(&receipt)
        }
        Command::RemoveLiquidity { account, shares } => {
            let mut state = ExchangeState::load(&state_path)?;
            let receipt = state
                .pool
                .remove_liquidity(&mut state.custody, account, shares)
                .context("remove_liquidity failed")?;
            state.save(&state_path)?;
            print_json(&receipt)
        }
        Command::EthToToken {
            account,
            amount,
            min_out,
        } => {
            let mut state = ExchangeState::load(&state_path)?;
            let executed = state
                .pool
                .eth_to_token_swap(&mut state.custody, account, amount, min_out)
                .context("eth_to_token_swap failed")?;
            state.save(&state_path)?;
            print_json(&executed)
        }
        Command::TokenToEth {
            account,
            amount,
            min_out,
        } => {
            let mut state = ExchangeState::load(&state_path)?;
            let executed = state
                .pool
                .token_to_eth_swap(&mut state.custody, account, amount, min_out)
                .context("token_to_eth_swap failed")?;
            state.save(&state_path)?;
            print_json(&executed)
        }
        Command::Reserves => {
            let state = ExchangeState::load(&state_path)?;
            let (base, token) = state.pool.reserves();
            print_json(&json!({
                "base_reserve": base,
                "token_reserve": token,
                "base_display": DisplayAmount::new(base, config.pool.base_decimals).to_string(),
                "token_display": DisplayAmount::new(token, config.pool.token_decimals).to_string(),
                "total_shares": state.pool.total_shares(),
                "spot_price": state.pool.spot_price().map(|p| p.to_string()),
            }))
        }
        Command::Quote { direction, amount } => {
            let state = ExchangeState::load(&state_path)?;
            let quote = match direction {
                SwapDirection::EthToToken => state.pool.quote_eth_to_token(amount),
                SwapDirection::TokenToEth => state.pool.quote_token_to_eth(amount),
            }
            .context("quote failed")?;
            print_json(&quote)
        }
        Command::Balance { account } => {
            let state = ExchangeState::load(&state_path)?;
            print_balances(&state, &config, &account)
        }
    }
}

fn print_balances(
    state: &ExchangeState,
    config: &ExchangeConfig,
    account: &AccountId,
) -> Result<()> {
    let base = state.custody.balance_of(account, AssetSide::Base);
    let token = state.custody.balance_of(account, AssetSide::Token);
    print_json(&json!({
        "account": account,
        "base": base,
        "token": token,
        "base_display": DisplayAmount::new(base, config.pool.base_decimals).to_string(),
        "token_display": DisplayAmount::new(token, config.pool.token_decimals).to_string(),
        "pool_shares": state.pool.position_of(account),
    }))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
