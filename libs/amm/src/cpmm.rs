//! Constant-product swap and liquidity math with exact integer arithmetic
//!
//! The swap formula keeps the fee-scaled input in units of 1/10000 all the
//! way to the final floor division, so no precision is lost before the
//! output is computed. Liquidity math floors share mints and withdrawals
//! and ceils the ratio-derived token deposit; every rounding direction
//! favors the pool.

use crate::{MathError, Result};

/// Fee denominator: fees are expressed in basis points (30 = 0.3%).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Constant-product math over raw `u128` amounts.
pub struct CpmmMath;

impl CpmmMath {
    /// Calculate exact swap output using the x*y=k formula.
    ///
    /// `amount_out = floor(in_after_fee * reserve_out / (reserve_in + in_after_fee))`
    /// with `in_after_fee = amount_in * (10000 - fee_bps) / 10000` held scaled
    /// by 10000 so the division happens once, at the end.
    pub fn amount_out(
        amount_in: u128,
        reserve_in: u128,
        reserve_out: u128,
        fee_bps: u32,
    ) -> Result<u128> {
        if amount_in == 0 {
            return Err(MathError::ZeroInput);
        }
        if reserve_in == 0 || reserve_out == 0 {
            return Err(MathError::EmptyReserves);
        }

        let fee_multiplier = BPS_DENOMINATOR - fee_bps as u128;
        let in_scaled = amount_in
            .checked_mul(fee_multiplier)
            .ok_or(MathError::Overflow)?;
        let numerator = in_scaled.checked_mul(reserve_out).ok_or(MathError::Overflow)?;
        let denominator = reserve_in
            .checked_mul(BPS_DENOMINATOR)
            .and_then(|scaled| scaled.checked_add(in_scaled))
            .ok_or(MathError::Overflow)?;

        Ok(numerator / denominator)
    }

    /// Calculate the input required for a desired output (reverse quote).
    ///
    /// Rounds up by one unit so the returned input is always sufficient.
    pub fn amount_in_for(
        amount_out: u128,
        reserve_in: u128,
        reserve_out: u128,
        fee_bps: u32,
    ) -> Result<u128> {
        if amount_out == 0 {
            return Err(MathError::ZeroInput);
        }
        if reserve_in == 0 || reserve_out == 0 {
            return Err(MathError::EmptyReserves);
        }
        if amount_out >= reserve_out {
            return Err(MathError::OutputExceedsReserves {
                requested: amount_out,
                reserve: reserve_out,
            });
        }

        let fee_multiplier = BPS_DENOMINATOR - fee_bps as u128;
        let numerator = reserve_in
            .checked_mul(amount_out)
            .and_then(|product| product.checked_mul(BPS_DENOMINATOR))
            .ok_or(MathError::Overflow)?;
        let denominator = (reserve_out - amount_out)
            .checked_mul(fee_multiplier)
            .ok_or(MathError::Overflow)?;

        (numerator / denominator)
            .checked_add(1)
            .ok_or(MathError::Overflow)
    }

    /// Fee retained by the pool for a given input.
    pub fn fee_amount(amount_in: u128, fee_bps: u32) -> Result<u128> {
        let fee_multiplier = BPS_DENOMINATOR - fee_bps as u128;
        let kept = amount_in
            .checked_mul(fee_multiplier)
            .ok_or(MathError::Overflow)?
            / BPS_DENOMINATOR;
        Ok(amount_in - kept)
    }

    /// Token deposit required to match a base deposit at the current ratio.
    ///
    /// `ceil(base_in * token_reserve / base_reserve)`, rounded against the
    /// depositor so the ratio never drifts in their favor.
    pub fn token_in_for_base_deposit(
        base_in: u128,
        base_reserve: u128,
        token_reserve: u128,
    ) -> Result<u128> {
        if base_in == 0 {
            return Err(MathError::ZeroInput);
        }
        mul_div_ceil(base_in, token_reserve, base_reserve)
    }

    /// Shares minted for a base deposit into an active pool.
    ///
    /// `floor(base_in * total_shares / base_reserve)`.
    pub fn shares_for_base_deposit(
        base_in: u128,
        base_reserve: u128,
        total_shares: u128,
    ) -> Result<u128> {
        if base_in == 0 {
            return Err(MathError::ZeroInput);
        }
        mul_div_floor(base_in, total_shares, base_reserve)
    }

    /// Proportional withdrawal amounts for burning `shares`.
    ///
    /// Both legs floor: `(floor(base_reserve * s / total), floor(token_reserve * s / total))`.
    pub fn withdrawal_amounts(
        shares: u128,
        base_reserve: u128,
        token_reserve: u128,
        total_shares: u128,
    ) -> Result<(u128, u128)> {
        if shares == 0 {
            return Err(MathError::ZeroInput);
        }
        let base_out = mul_div_floor(base_reserve, shares, total_shares)?;
        let token_out = mul_div_floor(token_reserve, shares, total_shares)?;
        Ok((base_out, token_out))
    }
}

/// `floor(a * b / d)` with overflow checking.
fn mul_div_floor(a: u128, b: u128, d: u128) -> Result<u128> {
    if d == 0 {
        return Err(MathError::EmptyReserves);
    }
    let product = a.checked_mul(b).ok_or(MathError::Overflow)?;
    Ok(product / d)
}

/// `ceil(a * b / d)` with overflow checking.
fn mul_div_ceil(a: u128, b: u128, d: u128) -> Result<u128> {
    if d == 0 {
        return Err(MathError::EmptyReserves);
    }
    let product = a.checked_mul(b).ok_or(MathError::Overflow)?;
    let quotient = product / d;
    if product % d == 0 {
        Ok(quotient)
    } else {
        quotient.checked_add(1).ok_or(MathError::Overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn output_matches_reference_example() {
        // 100 base in, 1000:2000 reserves, 0.3% fee:
        // floor(99.7 * 2000 / 1099.7) = floor(181.32...) = 181
        let out = CpmmMath::amount_out(100, 1000, 2000, 30).unwrap();
        assert_eq!(out, 181);
    }

    #[test]
    fn output_preserves_reserve_product() {
        let out = CpmmMath::amount_out(100, 1000, 2000, 30).unwrap();
        let before = 1000u128 * 2000;
        let after = (1000 + 100) * (2000 - out);
        assert!(after >= before, "product shrank: {} < {}", after, before);
    }

    #[test]
    fn zero_fee_output_is_larger() {
        // Input large enough that the floor division cannot absorb the fee
        let with_fee = CpmmMath::amount_out(10_000, 1000, 2000, 30).unwrap();
        let no_fee = CpmmMath::amount_out(10_000, 1000, 2000, 0).unwrap();
        assert_eq!(with_fee, 1817);
        assert_eq!(no_fee, 1818); // floor(10000 * 2000 / 11000)
        assert!(no_fee > with_fee);

        // At small inputs both tiers can floor to the same output
        assert_eq!(
            CpmmMath::amount_out(100, 1000, 2000, 0).unwrap(),
            CpmmMath::amount_out(100, 1000, 2000, 30).unwrap()
        );
    }

    #[test]
    fn reverse_quote_is_sufficient() {
        let amount_in = CpmmMath::amount_in_for(181, 1000, 2000, 30).unwrap();
        let out = CpmmMath::amount_out(amount_in, 1000, 2000, 30).unwrap();
        assert!(out >= 181);
    }

    #[test]
    fn reverse_quote_rejects_draining_output() {
        let err = CpmmMath::amount_in_for(2000, 1000, 2000, 30).unwrap_err();
        assert!(matches!(err, MathError::OutputExceedsReserves { .. }));
    }

    #[test]
    fn empty_reserves_never_divide() {
        assert_eq!(
            CpmmMath::amount_out(100, 0, 0, 30).unwrap_err(),
            MathError::EmptyReserves
        );
        assert_eq!(
            CpmmMath::amount_out(0, 1000, 2000, 30).unwrap_err(),
            MathError::ZeroInput
        );
    }

    #[test]
    fn fee_amount_matches_floor_rule() {
        assert_eq!(CpmmMath::fee_amount(100, 30).unwrap(), 1);
        assert_eq!(CpmmMath::fee_amount(10_000, 30).unwrap(), 30);
        assert_eq!(CpmmMath::fee_amount(1, 30).unwrap(), 1); // floor(0.997) = 0 kept
        assert_eq!(CpmmMath::fee_amount(100, 0).unwrap(), 0);
    }

    #[test]
    fn ratio_deposit_rounds_up() {
        // 333 base into a 1000:2000 pool needs ceil(666.0) = 666 tokens,
        // 100 base into 3:10 needs ceil(333.3) = 334
        assert_eq!(
            CpmmMath::token_in_for_base_deposit(333, 1000, 2000).unwrap(),
            666
        );
        assert_eq!(CpmmMath::token_in_for_base_deposit(100, 3, 10).unwrap(), 334);
    }

    #[test]
    fn share_mint_rounds_down() {
        assert_eq!(
            CpmmMath::shares_for_base_deposit(100, 999, 1000).unwrap(),
            100
        );
        assert_eq!(CpmmMath::shares_for_base_deposit(1, 1000, 999).unwrap(), 0);
    }

    #[test]
    fn withdrawal_is_exact_floor_proportion() {
        let (base_out, token_out) =
            CpmmMath::withdrawal_amounts(333, 1000, 2000, 1000).unwrap();
        assert_eq!(base_out, 333);
        assert_eq!(token_out, 666);

        // Full withdrawal drains both legs exactly
        let (base_out, token_out) =
            CpmmMath::withdrawal_amounts(1000, 1000, 2000, 1000).unwrap();
        assert_eq!((base_out, token_out), (1000, 2000));
    }

    #[test]
    fn overflow_surfaces_as_error() {
        let err = CpmmMath::amount_out(u128::MAX / 2, u128::MAX / 2, u128::MAX / 2, 30)
            .unwrap_err();
        assert_eq!(err, MathError::Overflow);
    }

    proptest! {
        /// The swap formula never decreases the reserve product and never
        /// asks for more than the output reserve holds.
        #[test]
        fn swap_output_keeps_product_monotone(
            amount_in in 1u128..1_000_000_000,
            reserve_in in 1u128..1_000_000_000_000,
            reserve_out in 1u128..1_000_000_000_000,
            fee_bps in 0u32..1_000,
        ) {
            let out = CpmmMath::amount_out(amount_in, reserve_in, reserve_out, fee_bps).unwrap();
            prop_assert!(out < reserve_out);
            let before = reserve_in * reserve_out;
            let after = (reserve_in + amount_in) * (reserve_out - out);
            prop_assert!(after >= before);
        }

        /// Withdrawing all shares always returns the full reserves.
        #[test]
        fn full_withdrawal_drains_pool(
            base in 1u128..1_000_000_000_000,
            token in 1u128..1_000_000_000_000,
            shares in 1u128..1_000_000_000_000,
        ) {
            let (b, t) = CpmmMath::withdrawal_amounts(shares, base, token, shares).unwrap();
            prop_assert_eq!((b, t), (base, token));
        }
    }
}
