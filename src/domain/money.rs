//! Token and probability representations.

use rust_decimal::Decimal;

/// Whole virtual tokens. Balances and stakes are never fractional.
pub type Tokens = u64;

/// Pool-share probability represented as a Decimal for precision.
pub type Probability = Decimal;
