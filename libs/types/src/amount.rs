//! Raw fixed-point amounts and asset sides
//!
//! Settlement amounts stay in smallest units end to end. `DisplayAmount`
//! renders them with a decimal point for logs and CLI output only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Amount in the smallest indivisible unit of an asset.
pub type RawAmount = u128;

/// Which side of the trading pair an amount belongs to.
///
/// The pool pairs a native "base" asset (conventionally ETH) with a single
/// token; every reserve, transfer and quote is denominated in exactly one
/// of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetSide {
    Base,
    Token,
}

impl AssetSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetSide::Base => "base",
            AssetSide::Token => "token",
        }
    }

    /// The opposite side of the pair.
    pub fn other(&self) -> AssetSide {
        match self {
            AssetSide::Base => AssetSide::Token,
            AssetSide::Token => AssetSide::Base,
        }
    }
}

impl fmt::Display for AssetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw amount paired with its display precision.
///
/// Rendering only. Never feed the decimal form back into settlement math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayAmount {
    pub raw: RawAmount,
    pub decimals: u8,
}

impl DisplayAmount {
    pub fn new(raw: RawAmount, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn multiplier(&self) -> u128 {
        10u128.pow(self.decimals as u32)
    }
}

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.decimals == 0 {
            return write!(f, "{}", self.raw);
        }
        let multiplier = self.multiplier();
        let whole = self.raw / multiplier;
        let fractional = self.raw % multiplier;
        write!(
            f,
            "{}.{:0width$}",
            whole,
            fractional,
            width = self.decimals as usize
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_amount_renders_fixed_point() {
        let amount = DisplayAmount::new(1_500_000_000_000_000_000, 18);
        assert_eq!(amount.to_string(), "1.500000000000000000");

        let small = DisplayAmount::new(5_000_001, 6);
        assert_eq!(small.to_string(), "5.000001");

        let unit = DisplayAmount::new(42, 0);
        assert_eq!(unit.to_string(), "42");
    }

    #[test]
    fn asset_side_other_flips() {
        assert_eq!(AssetSide::Base.other(), AssetSide::Token);
        assert_eq!(AssetSide::Token.other(), AssetSide::Base);
    }
}
