//! Display-level price readouts
//!
//! `Decimal` is used here for human-facing numbers only; settlement always
//! goes through the integer paths in [`crate::cpmm`].

use crate::cpmm::CpmmMath;
use crate::{MathError, Result};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn to_decimal(value: u128) -> Result<Decimal> {
    Decimal::from_u128(value).ok_or(MathError::Overflow)
}

/// Spot price as token-per-base, or `None` while the pool is empty.
pub fn spot_price(base_reserve: u128, token_reserve: u128) -> Option<Decimal> {
    if base_reserve == 0 {
        return None;
    }
    let base = Decimal::from_u128(base_reserve)?;
    let token = Decimal::from_u128(token_reserve)?;
    Some(token / base)
}

/// Price impact of a trade as a percentage of the pre-trade spot price.
///
/// Computed fee-free so the figure isolates the curve movement itself.
pub fn price_impact(amount_in: u128, reserve_in: u128, reserve_out: u128) -> Result<Decimal> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(MathError::EmptyReserves);
    }

    let price_before = to_decimal(reserve_out)? / to_decimal(reserve_in)?;

    let amount_out = CpmmMath::amount_out(amount_in, reserve_in, reserve_out, 0)?;
    let new_reserve_in = to_decimal(reserve_in)? + to_decimal(amount_in)?;
    let new_reserve_out = to_decimal(reserve_out)? - to_decimal(amount_out)?;
    let price_after = new_reserve_out / new_reserve_in;

    Ok((price_before - price_after).abs() / price_before * dec!(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_price_reflects_ratio() {
        assert_eq!(spot_price(1000, 2000), Some(dec!(2)));
        assert_eq!(spot_price(0, 0), None);
    }

    #[test]
    fn price_impact_grows_with_trade_size() {
        let small = price_impact(10, 1_000_000, 2_000_000).unwrap();
        let large = price_impact(100_000, 1_000_000, 2_000_000).unwrap();
        assert!(small < large);
        assert!(large < dec!(20));
    }

    #[test]
    fn price_impact_requires_reserves() {
        assert_eq!(price_impact(10, 0, 0).unwrap_err(), MathError::EmptyReserves);
    }
}
