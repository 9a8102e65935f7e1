//! Pool state and the five public operations
//!
//! A `Pool` is a plain owned value: reserves, fee rate, share ledger and a
//! sticky activation flag. Operations stage their deltas on a copy of the
//! accounting book, validate guards and invariants, instruct custody, and
//! only then commit. Any failure along the way leaves both the pool and
//! the ledger exactly as they were.

use crate::custody::{Custody, Transfer};
use crate::error::ExchangeError;
use crate::ledger::ShareLedger;
use auraswap_amm::{price, CpmmMath, BPS_DENOMINATOR};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use types::{
    AccountId, AssetSide, LiquidityAdded, LiquidityRemoved, RawAmount, SwapExecuted, SwapQuote,
};

/// Conventional 0.3% swap fee.
pub const DEFAULT_FEE_BPS: u32 = 30;

/// Accounting book snapshot used for staged commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Book {
    base: RawAmount,
    token: RawAmount,
    shares: RawAmount,
}

impl Book {
    /// The pool is either fully uninitialized or fully active: reserves and
    /// shares are all zero or all positive.
    fn is_consistent(&self) -> bool {
        let zeros = [self.base, self.token, self.shares];
        zeros.iter().all(|v| *v == 0) || zeros.iter().all(|v| *v > 0)
    }

    fn product(&self) -> Result<u128, ExchangeError> {
        self.base
            .checked_mul(self.token)
            .ok_or(ExchangeError::Overflow(auraswap_amm::MathError::Overflow))
    }
}

/// Which invariant applies to a staged mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpKind {
    Swap,
    Liquidity,
}

/// Constant-product pool for one base/token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    fee_bps: u32,
    base_reserve: RawAmount,
    token_reserve: RawAmount,
    shares: ShareLedger,
    /// Sticky: flips on first successful deposit and never reverts, even if
    /// a full withdrawal drains the pool back to zero.
    activated: bool,
}

impl Pool {
    /// Create an uninitialized pool. `fee_bps` must be below 10000;
    /// configuration validates this before construction.
    pub fn new(fee_bps: u32) -> Self {
        Self {
            fee_bps,
            base_reserve: 0,
            token_reserve: 0,
            shares: ShareLedger::new(),
            activated: false,
        }
    }

    // --- read-only surface ---

    pub fn reserves(&self) -> (RawAmount, RawAmount) {
        (self.base_reserve, self.token_reserve)
    }

    pub fn total_shares(&self) -> RawAmount {
        self.shares.total_shares()
    }

    pub fn position_of(&self, owner: &AccountId) -> RawAmount {
        self.shares.position_of(owner)
    }

    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    pub fn is_active(&self) -> bool {
        self.activated
    }

    /// Spot price as token-per-base, `None` while the pool is empty.
    pub fn spot_price(&self) -> Option<Decimal> {
        price::spot_price(self.base_reserve, self.token_reserve)
    }

    /// Price a base-for-token swap without executing it.
    pub fn quote_eth_to_token(&self, base_amount_in: RawAmount) -> Result<SwapQuote, ExchangeError> {
        self.require_liquidity()?;
        let amount_out = CpmmMath::amount_out(
            base_amount_in,
            self.base_reserve,
            self.token_reserve,
            self.fee_bps,
        )?;
        let fee_amount = CpmmMath::fee_amount(base_amount_in, self.fee_bps)?;
        Ok(SwapQuote {
            amount_in: base_amount_in,
            fee_amount,
            amount_out,
        })
    }

    /// Price a token-for-base swap without executing it.
    pub fn quote_token_to_eth(
        &self,
        token_amount_in: RawAmount,
    ) -> Result<SwapQuote, ExchangeError> {
        self.require_liquidity()?;
        let amount_out = CpmmMath::amount_out(
            token_amount_in,
            self.token_reserve,
            self.base_reserve,
            self.fee_bps,
        )?;
        let fee_amount = CpmmMath::fee_amount(token_amount_in, self.fee_bps)?;
        Ok(SwapQuote {
            amount_in: token_amount_in,
            fee_amount,
            amount_out,
        })
    }

    // --- mutating operations ---

    /// Deposit liquidity.
    ///
    /// On an empty pool the deposit fixes the initial price: `max_token_in`
    /// is taken literally as the token leg and `base_amount_in` shares are
    /// minted. On an active pool the token leg is ratio-derived (rounded
    /// up) and `max_token_in` bounds what the caller is willing to pay.
    pub fn add_liquidity(
        &mut self,
        custody: &mut dyn Custody,
        owner: AccountId,
        base_amount_in: RawAmount,
        max_token_in: RawAmount,
    ) -> Result<LiquidityAdded, ExchangeError> {
        if base_amount_in == 0 {
            return Err(ExchangeError::InsufficientInput {
                reason: "base deposit must be positive".to_string(),
            });
        }

        let initializing = self.total_shares() == 0;
        let (token_in, shares_minted) = if initializing {
            if max_token_in == 0 {
                return Err(ExchangeError::InsufficientInput {
                    reason: "initial deposit must supply both assets".to_string(),
                });
            }
            (max_token_in, base_amount_in)
        } else {
            let token_in = CpmmMath::token_in_for_base_deposit(
                base_amount_in,
                self.base_reserve,
                self.token_reserve,
            )?;
            let shares = CpmmMath::shares_for_base_deposit(
                base_amount_in,
                self.base_reserve,
                self.total_shares(),
            )?;
            if token_in == 0 || shares == 0 {
                return Err(ExchangeError::InsufficientInput {
                    reason: format!(
                        "deposit of {base_amount_in} base rounds to zero shares or tokens"
                    ),
                });
            }
            if token_in > max_token_in {
                return Err(ExchangeError::InsufficientInput {
                    reason: format!(
                        "ratio requires {token_in} tokens, caller allows at most {max_token_in}"
                    ),
                });
            }
            (token_in, shares)
        };

        let before = self.book();
        let staged = Book {
            base: checked_add(before.base, base_amount_in)?,
            token: checked_add(before.token, token_in)?,
            shares: checked_add(before.shares, shares_minted)?,
        };
        self.enforce_invariant(before, staged, OpKind::Liquidity)?;

        custody.apply(&[
            Transfer::debit(owner, AssetSide::Base, base_amount_in),
            Transfer::debit(owner, AssetSide::Token, token_in),
        ])?;

        self.base_reserve = staged.base;
        self.token_reserve = staged.token;
        // Infallible here: staged.shares was already checked above
        self.shares.mint(owner, shares_minted)?;

        if !self.activated {
            self.activated = true;
            info!(
                base = base_amount_in,
                token = token_in,
                %owner,
                "Pool activated with initial liquidity"
            );
        } else {
            debug!(base = base_amount_in, token = token_in, shares = shares_minted, %owner, "Liquidity added");
        }

        Ok(LiquidityAdded {
            shares_minted,
            base_in: base_amount_in,
            token_in,
        })
    }

    /// Burn shares and withdraw the proportional slice of both reserves.
    pub fn remove_liquidity(
        &mut self,
        custody: &mut dyn Custody,
        owner: AccountId,
        share_amount_in: RawAmount,
    ) -> Result<LiquidityRemoved, ExchangeError> {
        let position = self.position_of(&owner);
        if share_amount_in == 0 || share_amount_in > position {
            return Err(ExchangeError::InsufficientLiquidity {
                reason: format!(
                    "cannot withdraw {share_amount_in} shares, {owner} holds {position}"
                ),
            });
        }

        let (base_out, token_out) = CpmmMath::withdrawal_amounts(
            share_amount_in,
            self.base_reserve,
            self.token_reserve,
            self.total_shares(),
        )?;

        let before = self.book();
        let staged = Book {
            base: checked_sub(before.base, base_out)?,
            token: checked_sub(before.token, token_out)?,
            shares: checked_sub(before.shares, share_amount_in)?,
        };
        self.enforce_invariant(before, staged, OpKind::Liquidity)?;

        custody.apply(&[
            Transfer::credit(owner, AssetSide::Base, base_out),
            Transfer::credit(owner, AssetSide::Token, token_out),
        ])?;

        self.base_reserve = staged.base;
        self.token_reserve = staged.token;
        self.shares.burn(&owner, share_amount_in)?;

        debug!(base = base_out, token = token_out, shares = share_amount_in, %owner, "Liquidity removed");

        Ok(LiquidityRemoved {
            base_out,
            token_out,
        })
    }

    /// Swap base for token at the constant-product price.
    pub fn eth_to_token_swap(
        &mut self,
        custody: &mut dyn Custody,
        owner: AccountId,
        base_amount_in: RawAmount,
        min_token_out: RawAmount,
    ) -> Result<SwapExecuted, ExchangeError> {
        let quote = self.quote_eth_to_token(base_amount_in)?;
        self.require_nonzero_output(&quote)?;
        if quote.amount_out < min_token_out {
            return Err(ExchangeError::SlippageExceeded {
                computed: quote.amount_out,
                minimum: min_token_out,
            });
        }

        let before = self.book();
        let staged = Book {
            base: checked_add(before.base, base_amount_in)?,
            token: checked_sub(before.token, quote.amount_out)?,
            shares: before.shares,
        };
        self.enforce_invariant(before, staged, OpKind::Swap)?;

        custody.apply(&[
            Transfer::debit(owner, AssetSide::Base, base_amount_in),
            Transfer::credit(owner, AssetSide::Token, quote.amount_out),
        ])?;

        self.base_reserve = staged.base;
        self.token_reserve = staged.token;

        debug!(
            amount_in = quote.amount_in,
            amount_out = quote.amount_out,
            fee = quote.fee_amount,
            %owner,
            "Swap executed: base -> token"
        );

        Ok(SwapExecuted { quote })
    }

    /// Swap token for base; mirror of [`Pool::eth_to_token_swap`].
    pub fn token_to_eth_swap(
        &mut self,
        custody: &mut dyn Custody,
        owner: AccountId,
        token_amount_in: RawAmount,
        min_base_out: RawAmount,
    ) -> Result<SwapExecuted, ExchangeError> {
        let quote = self.quote_token_to_eth(token_amount_in)?;
        self.require_nonzero_output(&quote)?;
        if quote.amount_out < min_base_out {
            return Err(ExchangeError::SlippageExceeded {
                computed: quote.amount_out,
                minimum: min_base_out,
            });
        }

        let before = self.book();
        let staged = Book {
            base: checked_sub(before.base, quote.amount_out)?,
            token: checked_add(before.token, token_amount_in)?,
            shares: before.shares,
        };
        self.enforce_invariant(before, staged, OpKind::Swap)?;

        custody.apply(&[
            Transfer::debit(owner, AssetSide::Token, token_amount_in),
            Transfer::credit(owner, AssetSide::Base, quote.amount_out),
        ])?;

        self.base_reserve = staged.base;
        self.token_reserve = staged.token;

        debug!(
            amount_in = quote.amount_in,
            amount_out = quote.amount_out,
            fee = quote.fee_amount,
            %owner,
            "Swap executed: token -> base"
        );

        Ok(SwapExecuted { quote })
    }

    // --- internals ---

    fn book(&self) -> Book {
        Book {
            base: self.base_reserve,
            token: self.token_reserve,
            shares: self.total_shares(),
        }
    }

    /// A swap whose output floors to zero would debit the trader for
    /// nothing; reject it even when the caller set no minimum.
    fn require_nonzero_output(&self, quote: &SwapQuote) -> Result<(), ExchangeError> {
        if quote.amount_out == 0 {
            return Err(ExchangeError::InsufficientInput {
                reason: format!(
                    "input of {} buys zero output at current reserves",
                    quote.amount_in
                ),
            });
        }
        Ok(())
    }

    fn require_liquidity(&self) -> Result<(), ExchangeError> {
        if self.total_shares() == 0 {
            return Err(ExchangeError::InsufficientLiquidity {
                reason: "pool holds no liquidity".to_string(),
            });
        }
        Ok(())
    }

    /// Last-resort safety net over staged mutations. Should never fire if
    /// the arithmetic above is correct.
    ///
    /// Swaps must not decrease the raw reserve product. Liquidity changes
    /// scale both reserves and shares together, so the raw product moves;
    /// for those the per-share value of each reserve must not decrease,
    /// which is the same monotonicity property net of share supply.
    fn enforce_invariant(
        &self,
        before: Book,
        staged: Book,
        kind: OpKind,
    ) -> Result<(), ExchangeError> {
        if !staged.is_consistent() {
            return Err(ExchangeError::InvariantViolation {
                before: before.product()?,
                after: staged.product()?,
            });
        }

        match kind {
            OpKind::Swap => {
                let product_before = before.product()?;
                let product_after = staged.product()?;
                if product_after < product_before {
                    return Err(ExchangeError::InvariantViolation {
                        before: product_before,
                        after: product_after,
                    });
                }
            }
            OpKind::Liquidity => {
                if before.shares == 0 || staged.shares == 0 {
                    // Initial deposit or full withdrawal: nothing to compare.
                    return Ok(());
                }
                let base_ok = cross_ge(staged.base, before.shares, before.base, staged.shares)?;
                let token_ok = cross_ge(staged.token, before.shares, before.token, staged.shares)?;
                if !base_ok || !token_ok {
                    return Err(ExchangeError::InvariantViolation {
                        before: before.product()?,
                        after: staged.product()?,
                    });
                }
            }
        }
        Ok(())
    }
}

/// `a * b >= c * d` with overflow checking.
fn cross_ge(a: u128, b: u128, c: u128, d: u128) -> Result<bool, ExchangeError> {
    let lhs = a
        .checked_mul(b)
        .ok_or(ExchangeError::Overflow(auraswap_amm::MathError::Overflow))?;
    let rhs = c
        .checked_mul(d)
        .ok_or(ExchangeError::Overflow(auraswap_amm::MathError::Overflow))?;
    Ok(lhs >= rhs)
}

fn checked_add(a: RawAmount, b: RawAmount) -> Result<RawAmount, ExchangeError> {
    a.checked_add(b)
        .ok_or(ExchangeError::Overflow(auraswap_amm::MathError::Overflow))
}

fn checked_sub(a: RawAmount, b: RawAmount) -> Result<RawAmount, ExchangeError> {
    a.checked_sub(b)
        .ok_or(ExchangeError::Overflow(auraswap_amm::MathError::Overflow))
}

impl Pool {
    pub fn with_default_fee() -> Self {
        Self::new(DEFAULT_FEE_BPS)
    }
}

const _: () = assert!(DEFAULT_FEE_BPS < BPS_DENOMINATOR as u32);
