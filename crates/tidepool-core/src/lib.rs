// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIDEPOOL - CORE MODULE
//
// Exchange-client primitives: amounts, reserve snapshots, the signed call
// envelope, quote arithmetic, and the session state machine.
// All financial arithmetic uses unsigned 256-bit integers (no floating-point).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

pub mod quote;
pub mod session;

pub use primitive_types::{U256, U512};

/// Amounts are fixed-point integers scaled by 10^18 atomic units per coin.
/// Decimal-string presentation belongs to the CLI layer, never to the math.
pub const AMOUNT_DECIMALS: u32 = 18;

/// 10^18, the number of atomic units in one whole coin.
pub fn atoms_per_coin() -> U256 {
    U256::exp10(AMOUNT_DECIMALS as usize)
}

/// `n` whole coins in atomic units.
pub fn coins(n: u64) -> U256 {
    U256::from(n) * atoms_per_coin()
}

/// Chain ID to prevent cross-chain replay attacks.
/// Mainnet = 1, Testnet = 2. Included in every call envelope's signing hash.
/// Compile with `--features mainnet` for the mainnet build.
#[cfg(feature = "mainnet")]
pub const CHAIN_ID: u64 = 1;
#[cfg(not(feature = "mainnet"))]
pub const CHAIN_ID: u64 = 2;

/// Returns true if this binary was compiled for testnet
pub const fn is_testnet_build() -> bool {
    CHAIN_ID != 1
}

// ─────────────────────────────────────────────────────────────────
// AMOUNT PARSING / FORMATTING
// ─────────────────────────────────────────────────────────────────

/// Malformed numeric input. A parse failure is never collapsed into a
/// legitimate zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidDigit,
    /// More fractional digits than the fixed-point scale can represent.
    TooManyDecimals,
    Overflow,
}

impl std::fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "empty amount"),
            ParseAmountError::InvalidDigit => write!(f, "amount contains a non-numeric character"),
            ParseAmountError::TooManyDecimals => {
                write!(f, "amount has more than {} decimal places", AMOUNT_DECIMALS)
            }
            ParseAmountError::Overflow => write!(f, "amount does not fit in 256 bits"),
        }
    }
}

impl std::error::Error for ParseAmountError {}

/// Parse a decimal string like `"1.5"` into atomic units (10^18 scale).
pub fn parse_amount(input: &str) -> Result<U256, ParseAmountError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ParseAmountError::Empty);
    }
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(ParseAmountError::Empty);
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseAmountError::InvalidDigit);
    }
    if frac.len() > AMOUNT_DECIMALS as usize {
        return Err(ParseAmountError::TooManyDecimals);
    }

    let whole_atoms = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole)
            .map_err(|_| ParseAmountError::Overflow)?
            .checked_mul(atoms_per_coin())
            .ok_or(ParseAmountError::Overflow)?
    };
    let frac_atoms = if frac.is_empty() {
        U256::zero()
    } else {
        // At most 18 digits, so this cannot overflow on its own.
        let digits = U256::from_dec_str(frac).map_err(|_| ParseAmountError::Overflow)?;
        digits * U256::exp10(AMOUNT_DECIMALS as usize - frac.len())
    };
    whole_atoms
        .checked_add(frac_atoms)
        .ok_or(ParseAmountError::Overflow)
}

/// Format atomic units as a decimal string with the full 18-digit fractional
/// part, `"15.000000000000000000"` style. Precise string formatting, no f64.
pub fn format_amount(v: U256) -> String {
    let scale = atoms_per_coin();
    format!("{}.{:0>18}", v / scale, (v % scale).to_string())
}

// ─────────────────────────────────────────────────────────────────
// LEDGER DATA MODEL
// ─────────────────────────────────────────────────────────────────

/// The exchange contract's holdings at the time of a read. May already be
/// stale by the time a dependent transaction executes; there is no
/// atomicity across read-then-write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveSnapshot {
    pub native_reserve: U256,
    pub token_reserve: U256,
    pub lp_total_supply: U256,
}

/// One caller's balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountBalances {
    pub native: U256,
    pub token: U256,
    pub lp_tokens: U256,
}

/// Which way a swap moves value through the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    NativeToToken,
    TokenToNative,
}

impl std::fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwapDirection::NativeToToken => write!(f, "native-to-token"),
            SwapDirection::TokenToNative => write!(f, "token-to-native"),
        }
    }
}

impl std::str::FromStr for SwapDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native-to-token" => Ok(SwapDirection::NativeToToken),
            "token-to-native" => Ok(SwapDirection::TokenToNative),
            other => Err(format!(
                "unknown swap direction '{}' (expected native-to-token or token-to-native)",
                other
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// CALL ENVELOPE
// ─────────────────────────────────────────────────────────────────

/// A signed contract-call submission. Amounts travel as decimal strings to
/// avoid any precision loss on the wire.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CallEnvelope {
    pub caller: String,
    pub contract: String,
    pub function: String,
    pub args: Vec<String>,
    /// Native value attached to the call, atomic units.
    pub value: String,
    pub nonce: u64,
    pub timestamp: u64,
    /// Ed25519 public key (hex-encoded)
    pub public_key: String,
    pub signature: String,
}

impl CallEnvelope {
    /// Content hash: all fields EXCEPT signature. This is the message to
    /// sign and verify. Includes chain_id to prevent cross-chain replay.
    pub fn signing_hash(&self) -> String {
        let mut hasher = Keccak256::new();

        hasher.update(CHAIN_ID.to_le_bytes());
        hasher.update(self.caller.as_bytes());
        hasher.update(self.contract.as_bytes());
        hasher.update(self.function.as_bytes());

        // Args are length-prefixed so ["ab"] and ["a", "b"] hash differently.
        hasher.update((self.args.len() as u32).to_le_bytes());
        for arg in &self.args {
            hasher.update((arg.len() as u32).to_le_bytes());
            hasher.update(arg.as_bytes());
        }

        hasher.update(self.value.as_bytes());
        hasher.update(self.nonce.to_le_bytes());
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.public_key.as_bytes());

        hex::encode(hasher.finalize())
    }
}

// ─────────────────────────────────────────────────────────────────
// UNIT TESTS
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atoms_per_coin() {
        assert_eq!(atoms_per_coin(), U256::from(1_000_000_000_000_000_000u128));
    }

    #[test]
    fn test_parse_whole() {
        assert_eq!(parse_amount("15").unwrap(), coins(15));
    }

    #[test]
    fn test_parse_fractional() {
        let expected = U256::from(1_005_000_000_000_000_000u128);
        assert_eq!(parse_amount("1.005").unwrap(), expected);
    }

    #[test]
    fn test_parse_leading_dot() {
        assert_eq!(
            parse_amount(".5").unwrap(),
            U256::from(500_000_000_000_000_000u128)
        );
    }

    #[test]
    fn test_parse_trailing_dot() {
        assert_eq!(parse_amount("1.").unwrap(), coins(1));
    }

    #[test]
    fn test_parse_zero() {
        assert_eq!(parse_amount("0").unwrap(), U256::zero());
        assert_eq!(parse_amount("0.0").unwrap(), U256::zero());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(parse_amount(""), Err(ParseAmountError::Empty));
        assert_eq!(parse_amount("   "), Err(ParseAmountError::Empty));
        assert_eq!(parse_amount("."), Err(ParseAmountError::Empty));
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert_eq!(parse_amount("-1"), Err(ParseAmountError::InvalidDigit));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_amount("1.2.3"), Err(ParseAmountError::InvalidDigit));
        assert_eq!(parse_amount("1e18"), Err(ParseAmountError::InvalidDigit));
        assert_eq!(parse_amount("abc"), Err(ParseAmountError::InvalidDigit));
    }

    #[test]
    fn test_parse_rejects_excess_decimals() {
        assert_eq!(
            parse_amount("0.0000000000000000001"),
            Err(ParseAmountError::TooManyDecimals)
        );
    }

    #[test]
    fn test_parse_rejects_overflow() {
        // 10^78 > 2^256
        let huge = "1".to_string() + &"0".repeat(78);
        assert_eq!(parse_amount(&huge), Err(ParseAmountError::Overflow));
    }

    #[test]
    fn test_format_whole() {
        assert_eq!(format_amount(coins(15)), "15.000000000000000000");
    }

    #[test]
    fn test_format_fractional() {
        let v = U256::from(1_005_000_000_000_000_000u128);
        assert_eq!(format_amount(v), "1.005000000000000000");
    }

    #[test]
    fn test_format_parse_round_trip() {
        let v = U256::from(123_456_789_012_345_678u128);
        assert_eq!(parse_amount(&format_amount(v)).unwrap(), v);
    }

    #[test]
    fn test_swap_direction_round_trip() {
        for d in [SwapDirection::NativeToToken, SwapDirection::TokenToNative] {
            assert_eq!(d.to_string().parse::<SwapDirection>().unwrap(), d);
        }
        assert!("sideways".parse::<SwapDirection>().is_err());
    }

    fn sample_envelope() -> CallEnvelope {
        CallEnvelope {
            caller: "0x1111111111111111111111111111111111111111".into(),
            contract: "0x2222222222222222222222222222222222222222".into(),
            function: "approve".into(),
            args: vec!["0x3333333333333333333333333333333333333333".into(), "100".into()],
            value: "0".into(),
            nonce: 7,
            timestamp: 1_700_000_000,
            public_key: "aabbcc".into(),
            signature: String::new(),
        }
    }

    #[test]
    fn test_signing_hash_deterministic() {
        let e = sample_envelope();
        assert_eq!(e.signing_hash(), e.signing_hash());
    }

    #[test]
    fn test_signing_hash_excludes_signature() {
        let mut e = sample_envelope();
        let before = e.signing_hash();
        e.signature = "deadbeef".into();
        assert_eq!(e.signing_hash(), before);
    }

    #[test]
    fn test_signing_hash_covers_every_signed_field() {
        let base = sample_envelope();
        let mut variants = Vec::new();

        let mut e = base.clone();
        e.caller = "0x4444444444444444444444444444444444444444".into();
        variants.push(e);
        let mut e = base.clone();
        e.function = "transfer".into();
        variants.push(e);
        let mut e = base.clone();
        e.value = "1".into();
        variants.push(e);
        let mut e = base.clone();
        e.nonce = 8;
        variants.push(e);
        let mut e = base.clone();
        e.timestamp += 1;
        variants.push(e);
        let mut e = base.clone();
        e.public_key = "ccbbaa".into();
        variants.push(e);

        let original = base.signing_hash();
        for v in variants {
            assert_ne!(v.signing_hash(), original);
        }
    }

    #[test]
    fn test_signing_hash_arg_boundaries() {
        let mut a = sample_envelope();
        a.args = vec!["ab".into()];
        let mut b = sample_envelope();
        b.args = vec!["a".into(), "b".into()];
        assert_ne!(a.signing_hash(), b.signing_hash());
    }
}
