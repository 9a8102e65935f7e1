//! Asset custody boundary
//!
//! The core never moves balances itself; it hands the ledger one batch of
//! transfers per operation and the ledger applies the whole batch or none
//! of it. Pool state commits only after the batch succeeds, so reserves and
//! custody can never disagree.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use types::{AccountId, AssetSide, RawAmount};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CustodyError {
    #[error("Insufficient balance for {account}: need {needed} {asset}, have {available}")]
    InsufficientBalance {
        account: AccountId,
        asset: AssetSide,
        needed: RawAmount,
        available: RawAmount,
    },

    #[error("Balance overflow for {account} ({asset})")]
    BalanceOverflow { account: AccountId, asset: AssetSide },
}

/// Direction of a transfer, from the pool's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferKind {
    /// Pull funds from the account into the pool.
    Debit,
    /// Push funds from the pool to the account.
    Credit,
}

/// One balance movement instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub account: AccountId,
    pub asset: AssetSide,
    pub kind: TransferKind,
    pub amount: RawAmount,
}

impl Transfer {
    pub fn debit(account: AccountId, asset: AssetSide, amount: RawAmount) -> Self {
        Self {
            account,
            asset,
            kind: TransferKind::Debit,
            amount,
        }
    }

    pub fn credit(account: AccountId, asset: AssetSide, amount: RawAmount) -> Self {
        Self {
            account,
            asset,
            kind: TransferKind::Credit,
            amount,
        }
    }
}

/// Opaque ledger that atomically moves balances when instructed.
///
/// `apply` must be all-or-nothing: either every transfer in the batch takes
/// effect or the ledger is left untouched and an error is returned.
pub trait Custody {
    fn apply(&mut self, transfers: &[Transfer]) -> Result<(), CustodyError>;

    /// Read-only balance lookup, for rendering and tests.
    fn balance_of(&self, account: &AccountId, asset: AssetSide) -> RawAmount;
}

/// Per-account balances on both sides of the pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalances {
    pub base: RawAmount,
    pub token: RawAmount,
}

impl AccountBalances {
    fn side(&self, asset: AssetSide) -> RawAmount {
        match asset {
            AssetSide::Base => self.base,
            AssetSide::Token => self.token,
        }
    }

    fn side_mut(&mut self, asset: AssetSide) -> &mut RawAmount {
        match asset {
            AssetSide::Base => &mut self.base,
            AssetSide::Token => &mut self.token,
        }
    }
}

/// In-memory custody ledger for tests and the demo service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryCustody {
    balances: HashMap<AccountId, AccountBalances>,
}

impl InMemoryCustody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account with funds (the faucet the demo deployment uses).
    pub fn fund(&mut self, account: AccountId, asset: AssetSide, amount: RawAmount) {
        let entry = self.balances.entry(account).or_default();
        let side = entry.side_mut(asset);
        *side = side.saturating_add(amount);
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&AccountId, &AccountBalances)> {
        self.balances.iter()
    }

    /// Validate the whole batch against current balances. Called before any
    /// mutation so a failure leaves the ledger untouched.
    fn check(&self, transfers: &[Transfer]) -> Result<(), CustodyError> {
        // Net the batch per (account, asset) so two debits of the same
        // balance can't both pass individually.
        let mut staged: HashMap<(AccountId, AssetSide), RawAmount> = HashMap::new();
        for transfer in transfers {
            let key = (transfer.account, transfer.asset);
            let current = *staged.entry(key).or_insert_with(|| {
                self.balances
                    .get(&transfer.account)
                    .map(|b| b.side(transfer.asset))
                    .unwrap_or(0)
            });
            let next = match transfer.kind {
                TransferKind::Debit => {
                    current
                        .checked_sub(transfer.amount)
                        .ok_or(CustodyError::InsufficientBalance {
                            account: transfer.account,
                            asset: transfer.asset,
                            needed: transfer.amount,
                            available: current,
                        })?
                }
                TransferKind::Credit => {
                    current
                        .checked_add(transfer.amount)
                        .ok_or(CustodyError::BalanceOverflow {
                            account: transfer.account,
                            asset: transfer.asset,
                        })?
                }
            };
            staged.insert(key, next);
        }
        Ok(())
    }
}

impl Custody for InMemoryCustody {
    fn apply(&mut self, transfers: &[Transfer]) -> Result<(), CustodyError> {
        self.check(transfers)?;
        for transfer in transfers {
            let entry = self.balances.entry(transfer.account).or_default();
            let side = entry.side_mut(transfer.asset);
            match transfer.kind {
                // check() proved these cannot underflow or overflow
                TransferKind::Debit => *side -= transfer.amount,
                TransferKind::Credit => *side += transfer.amount,
            }
        }
        Ok(())
    }

    fn balance_of(&self, account: &AccountId, asset: AssetSide) -> RawAmount {
        self.balances
            .get(account)
            .map(|b| b.side(asset))
            .unwrap_or(0)
    }
}
