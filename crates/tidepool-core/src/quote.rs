//! # Quote arithmetic — constant-ratio liquidity calculators
//!
//! Pure integer math mirroring the immutable on-chain accounting: truncating
//! (floor) division, 512-bit intermediates, no floating point anywhere.
//!
//! Swap pricing is deliberately NOT reimplemented here. The exchange
//! contract's own output query is the single source of truth for the fee
//! curve; the client submits raw amounts and reserves and treats the returned
//! integer as authoritative (see `LedgerProvider::swap_output`). Recomputing
//! the fee formula locally would only invite drift between the two.

use crate::{U256, U512};

/// A quote precondition failed or the result does not fit in 256 bits.
/// Never reported as a zero amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteError {
    /// The pool holds no native reserve. First deposits choose both amounts
    /// freely and must not go through the ratio calculator at all.
    EmptyPool,
    /// No LP tokens exist, so no share of the pool can be valued.
    EmptySupply,
    /// Asked to value a burn larger than the entire LP supply.
    BurnExceedsSupply,
    Overflow,
}

impl std::fmt::Display for QuoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteError::EmptyPool => write!(f, "pool has no native reserve"),
            QuoteError::EmptySupply => write!(f, "no LP tokens have been minted"),
            QuoteError::BurnExceedsSupply => {
                write!(f, "burn amount exceeds the total LP supply")
            }
            QuoteError::Overflow => write!(f, "quote does not fit in 256 bits"),
        }
    }
}

impl std::error::Error for QuoteError {}

/// Narrow a 512-bit quotient back to 256 bits, loudly.
fn narrow(v: U512) -> Result<U256, QuoteError> {
    if v.bits() > 256 {
        return Err(QuoteError::Overflow);
    }
    let mut buf = [0u8; 64];
    v.to_little_endian(&mut buf);
    Ok(U256::from_little_endian(&buf[..32]))
}

/// floor(a * b / d), exact over the full 256-bit range.
fn mul_div(a: U256, b: U256, d: U256) -> Result<U256, QuoteError> {
    narrow(a.full_mul(b) / U512::from(d))
}

/// Token amount that keeps the pool ratio constant when depositing
/// `input_native` alongside it:
///
/// `floor(input_native * token_reserve / native_reserve)`
///
/// Preserves the price ratio exactly, within floor-rounding of at most one
/// unit: `result * native_reserve <= input_native * token_reserve
/// < result * native_reserve + native_reserve`.
///
/// Zero input short-circuits to zero. A pool with zero native reserve is an
/// error: the first-deposit path sets both amounts with no ratio constraint.
pub fn required_token_deposit(
    input_native: U256,
    native_reserve: U256,
    token_reserve: U256,
) -> Result<U256, QuoteError> {
    if input_native.is_zero() {
        return Ok(U256::zero());
    }
    if native_reserve.is_zero() {
        return Err(QuoteError::EmptyPool);
    }
    mul_div(input_native, token_reserve, native_reserve)
}

/// Native and token amounts returned for burning `lp_burned` LP tokens:
///
/// `(floor(native_reserve * lp_burned / supply),
///   floor(token_reserve * lp_burned / supply))`
///
/// Both outputs scale linearly with the burned share; burning the entire
/// supply returns exactly both reserves, no dust. The ledger enforces the
/// burn bound authoritatively; the client-side check only guards the display.
pub fn withdrawal_amounts(
    lp_burned: U256,
    lp_total_supply: U256,
    native_reserve: U256,
    token_reserve: U256,
) -> Result<(U256, U256), QuoteError> {
    if lp_burned.is_zero() {
        return Ok((U256::zero(), U256::zero()));
    }
    if lp_total_supply.is_zero() {
        return Err(QuoteError::EmptySupply);
    }
    if lp_burned > lp_total_supply {
        return Err(QuoteError::BurnExceedsSupply);
    }
    let native_out = mul_div(native_reserve, lp_burned, lp_total_supply)?;
    let token_out = mul_div(token_reserve, lp_burned, lp_total_supply)?;
    Ok((native_out, token_out))
}

// ─────────────────────────────────────────────────────────────────
// UNIT TESTS
// ─────────────────────────────────────────────────────────────────
