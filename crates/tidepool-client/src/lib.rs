// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIDEPOOL - LEDGER CLIENT
//
// Read queries, wallet glue, and signed call submission against the remote
// exchange. The ledger owns all shared state; this crate only reads it,
// quotes against it, and submits signed envelopes to it.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod provider;
pub mod submitter;
pub mod wallet;

pub use provider::{LedgerProvider, TxStatus};
pub use submitter::{PendingTransaction, TransactionSubmitter};
pub use wallet::{KeyPair, WalletError, WalletFile};

use tidepool_core::quote::QuoteError;
use tidepool_core::{ParseAmountError, U256};

/// Everything that can go wrong between the user's input and a confirmed
/// transaction. Reader and calculator failures stay distinct from
/// legitimate zero results ("no liquidity" is not "query failed").
#[derive(Debug)]
pub enum ClientError {
    /// Malformed numeric input.
    Parse(ParseAmountError),
    /// A quote precondition failed (empty pool, burn beyond supply, ...).
    Quote(QuoteError),
    /// The node answers for a different chain than this build expects.
    NetworkMismatch { expected: u64, found: u64 },
    /// A read query failed: node unreachable, HTTP error, malformed body.
    Transient(String),
    /// A submitted call was rejected or reverted. Carries the ledger's
    /// revert reason when one is available.
    Transaction { reason: Option<String> },
    /// The confirmation wait was abandoned. The transaction may still
    /// confirm later; the outcome is unknown, not failed.
    ConfirmationTimeout { tx_hash: String },
    /// A token-spend operation was attempted without sufficient approval.
    Allowance { required: U256, approved: U256 },
    Wallet(WalletError),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Parse(e) => write!(f, "invalid amount: {}", e),
            ClientError::Quote(e) => write!(f, "cannot quote: {}", e),
            ClientError::NetworkMismatch { expected, found } => write!(
                f,
                "connected to chain {} but this build expects chain {}",
                found, expected
            ),
            ClientError::Transient(msg) => write!(f, "ledger query failed: {}", msg),
            ClientError::Transaction { reason: Some(r) } => {
                write!(f, "transaction failed: {}", r)
            }
            ClientError::Transaction { reason: None } => write!(f, "transaction failed"),
            ClientError::ConfirmationTimeout { tx_hash } => write!(
                f,
                "transaction {} was not confirmed before the deadline; its outcome is unknown",
                tx_hash
            ),
            ClientError::Allowance { required, approved } => write!(
                f,
                "allowance too low: operation needs {} but only {} is approved",
                required, approved
            ),
            ClientError::Wallet(e) => write!(f, "wallet error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<ParseAmountError> for ClientError {
    fn from(e: ParseAmountError) -> Self {
        ClientError::Parse(e)
    }
}

impl From<QuoteError> for ClientError {
    fn from(e: QuoteError) -> Self {
        ClientError::Quote(e)
    }
}

impl From<WalletError> for ClientError {
    fn from(e: WalletError) -> Self {
        ClientError::Wallet(e)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transient(e.to_string())
    }
}
