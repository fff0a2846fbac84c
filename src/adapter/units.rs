//! Conversions between on-chain base units and display amounts.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// Coins the arena contracts deal in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Usdc,
    Btc,
    Sui,
}

impl Token {
    pub fn decimals(&self) -> u32 {
        match self {
            Token::Usdc => 6,
            Token::Btc => 8,
            Token::Sui => 9,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Token::Usdc => "USDC",
            Token::Btc => "BTC",
            Token::Sui => "SUI",
        }
    }
}

/// Contract price fields carry eight decimals regardless of the asset.
pub const PRICE_DECIMALS: u32 = 8;

/// Display amount to base units, rounding down. Negative or non-finite
/// amounts yield zero.
pub fn to_base_units(amount: f64, token: Token) -> u128 {
    Decimal::from_f64(amount)
        .map(|value| value * Decimal::from(10u64.pow(token.decimals())))
        .and_then(|scaled| scaled.floor().to_u128())
        .unwrap_or(0)
}

pub fn from_base_units(raw: u128, token: Token) -> f64 {
    scale_down(raw, token.decimals())
}

pub fn scale_down(raw: u128, decimals: u32) -> f64 {
    i128::try_from(raw)
        .ok()
        .and_then(|raw| Decimal::try_from_i128_with_scale(raw, decimals).ok())
        .and_then(|value| value.to_f64())
        .unwrap_or_else(|| raw as f64 / 10f64.powi(decimals as i32))
}

pub fn format_amount(raw: u128, token: Token) -> String {
    let places = match token {
        Token::Usdc => 2,
        Token::Btc | Token::Sui => token.decimals() as usize,
    };
    format!("{:.*}", places, from_base_units(raw, token))
}
