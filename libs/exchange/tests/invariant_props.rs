//! Property tests for the accounting invariants
//!
//! Drive a pool through arbitrary operation sequences and check the
//! properties that must hold regardless of ordering: the reserve product
//! never decreases across a swap, reserves and shares hit zero together,
//! and withdrawals are exact floor proportions.

use exchange_core::{Custody, InMemoryCustody, Pool};
use proptest::prelude::*;
use types::{AccountId, AssetSide};

#[derive(Debug, Clone)]
enum Op {
    AddLiquidity { base: u128 },
    RemoveLiquidity { share_pct: u8 },
    EthToToken { base: u128 },
    TokenToEth { token: u128 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u128..50_000).prop_map(|base| Op::AddLiquidity { base }),
        (1u8..=100).prop_map(|share_pct| Op::RemoveLiquidity { share_pct }),
        (1u128..20_000).prop_map(|base| Op::EthToToken { base }),
        (1u128..20_000).prop_map(|token| Op::TokenToEth { token }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn invariants_hold_across_arbitrary_sequences(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let owner = AccountId::from_seed(1);
        let mut custody = InMemoryCustody::new();
        custody.fund(owner, AssetSide::Base, u128::MAX / 4);
        custody.fund(owner, AssetSide::Token, u128::MAX / 4);

        let mut pool = Pool::with_default_fee();
        pool.add_liquidity(&mut custody, owner, 10_000, 20_000).unwrap();

        for op in ops {
            let (base_before, token_before) = pool.reserves();
            let product_before = base_before * token_before;

            match op {
                Op::AddLiquidity { base } => {
                    // Unbounded token leg; only rounding-to-zero may fail
                    let _ = pool.add_liquidity(&mut custody, owner, base, u128::MAX);
                }
                Op::RemoveLiquidity { share_pct } => {
                    let shares = pool.position_of(&owner) * share_pct as u128 / 100;
                    if shares > 0 {
                        let (base_r, token_r) = pool.reserves();
                        let total = pool.total_shares();
                        let removed = pool.remove_liquidity(&mut custody, owner, shares).unwrap();
                        // Exact floor proportions
                        prop_assert_eq!(removed.base_out, base_r * shares / total);
                        prop_assert_eq!(removed.token_out, token_r * shares / total);
                    }
                }
                Op::EthToToken { base } => {
                    if pool.eth_to_token_swap(&mut custody, owner, base, 0).is_ok() {
                        let (b, t) = pool.reserves();
                        prop_assert!(b * t >= product_before, "swap shrank the product");
                    }
                }
                Op::TokenToEth { token } => {
                    if pool.token_to_eth_swap(&mut custody, owner, token, 0).is_ok() {
                        let (b, t) = pool.reserves();
                        prop_assert!(b * t >= product_before, "swap shrank the product");
                    }
                }
            }

            // Zero-consistency after every step
            let (base, token) = pool.reserves();
            let shares = pool.total_shares();
            let all_zero = base == 0 && token == 0 && shares == 0;
            let all_positive = base > 0 && token > 0 && shares > 0;
            prop_assert!(all_zero || all_positive, "pool left half-initialized: ({base}, {token}, {shares})");

            if all_zero {
                // Re-seed so later ops keep exercising an active pool
                pool.add_liquidity(&mut custody, owner, 10_000, 20_000).unwrap();
            }
        }
    }

    /// A swap whose minimum-out is one above the computable output always
    /// fails and changes nothing.
    #[test]
    fn slippage_bound_is_exact(base_in in 1u128..50_000) {
        let owner = AccountId::from_seed(1);
        let mut custody = InMemoryCustody::new();
        custody.fund(owner, AssetSide::Base, u128::MAX / 4);
        custody.fund(owner, AssetSide::Token, u128::MAX / 4);

        let mut pool = Pool::with_default_fee();
        pool.add_liquidity(&mut custody, owner, 100_000, 200_000).unwrap();

        let quote = pool.quote_eth_to_token(base_in).unwrap();
        let balance_before = custody.balance_of(&owner, AssetSide::Base);

        // One above the quote must fail...
        prop_assert!(pool
            .eth_to_token_swap(&mut custody, owner, base_in, quote.amount_out + 1)
            .is_err());
        prop_assert_eq!(pool.reserves(), (100_000, 200_000));
        prop_assert_eq!(custody.balance_of(&owner, AssetSide::Base), balance_before);

        // ...and exactly the quote must succeed.
        let executed = pool
            .eth_to_token_swap(&mut custody, owner, base_in, quote.amount_out)
            .unwrap();
        prop_assert_eq!(executed.quote.amount_out, quote.amount_out);
    }
}
