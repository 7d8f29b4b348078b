//! Signed call submission. Each operation follows the same contract:
//! build envelope → sign → broadcast → block until the ledger confirms or
//! rejects. Nothing here retries a state-changing call; resubmission risks
//! double-execution, so retry policy belongs to the caller.
//!
//! Operations that spend tokens (liquidity deposit, token-to-native swap)
//! require a confirmed allowance first; approval and the dependent call are
//! not atomic on the ledger, so the approval is awaited to completion before
//! the spend is broadcast.

use std::time::Duration;

use tidepool_core::{CallEnvelope, SwapDirection, U256};
use tokio::time::Instant;

use crate::provider::{LedgerProvider, TxStatus};
use crate::wallet::KeyPair;
use crate::ClientError;

/// Handle for a broadcast transaction. The ledger cannot be made to cancel
/// it; only the confirmation wait can be abandoned client-side.
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    pub hash: String,
}

pub struct TransactionSubmitter {
    provider: LedgerProvider,
    keypair: KeyPair,
    confirmation_deadline: Duration,
    poll_interval: Duration,
}

impl TransactionSubmitter {
    pub fn new(provider: LedgerProvider, keypair: KeyPair) -> Self {
        TransactionSubmitter {
            provider,
            keypair,
            confirmation_deadline: Duration::from_secs(180),
            poll_interval: Duration::from_secs(2),
        }
    }

    pub fn with_confirmation_deadline(mut self, deadline: Duration) -> Self {
        self.confirmation_deadline = deadline;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn caller(&self) -> &str {
        self.keypair.address()
    }

    pub fn provider(&self) -> &LedgerProvider {
        &self.provider
    }

    /// Build, sign, and broadcast one contract call.
    async fn submit_call(
        &self,
        contract: &str,
        function: &str,
        args: Vec<String>,
        value: U256,
    ) -> Result<PendingTransaction, ClientError> {
        let nonce = self.provider.account_nonce(self.keypair.address()).await?;
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let mut envelope = CallEnvelope {
            caller: self.keypair.address().to_string(),
            contract: contract.to_string(),
            function: function.to_string(),
            args,
            value: value.to_string(),
            nonce,
            timestamp,
            public_key: self.keypair.public_key_hex(),
            signature: String::new(),
        };
        let signing_hash = envelope.signing_hash();
        envelope.signature = self.keypair.sign_hex(signing_hash.as_bytes());

        let hash = self.provider.post_call(&envelope).await?;
        Ok(PendingTransaction { hash })
    }

    /// Poll the ledger until the transaction confirms or reverts. Transient
    /// poll failures are tolerated until the deadline (a dropped poll says
    /// nothing about the transaction's outcome). Hitting the deadline yields
    /// `ConfirmationTimeout`: unknown outcome, not failure.
    pub async fn await_confirmation(
        &self,
        pending: &PendingTransaction,
    ) -> Result<(), ClientError> {
        let deadline = Instant::now() + self.confirmation_deadline;
        loop {
            match self.provider.tx_status(&pending.hash).await {
                Ok(TxStatus::Confirmed) => return Ok(()),
                Ok(TxStatus::Reverted(reason)) => {
                    return Err(ClientError::Transaction { reason })
                }
                Ok(TxStatus::Pending) | Err(ClientError::Transient(_)) => {}
                Err(other) => return Err(other),
            }
            if Instant::now() >= deadline {
                return Err(ClientError::ConfirmationTimeout {
                    tx_hash: pending.hash.clone(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn call_and_confirm(
        &self,
        contract: &str,
        function: &str,
        args: Vec<String>,
        value: U256,
    ) -> Result<PendingTransaction, ClientError> {
        let pending = self.submit_call(contract, function, args, value).await?;
        self.await_confirmation(&pending).await?;
        Ok(pending)
    }

    /// Authorize the exchange to move up to `amount` of the caller's tokens.
    /// Awaited to completion before returning.
    pub async fn approve_allowance(&self, amount: U256) -> Result<PendingTransaction, ClientError> {
        self.call_and_confirm(
            self.provider.token(),
            "approve",
            vec![self.provider.exchange().to_string(), amount.to_string()],
            U256::zero(),
        )
        .await
    }

    /// Make sure the exchange may move `required` tokens, approving first if
    /// allowed to. With `auto_approve` off an insufficient allowance is the
    /// caller's problem, surfaced as `Allowance`.
    async fn ensure_allowance(&self, required: U256, auto_approve: bool) -> Result<(), ClientError> {
        if required.is_zero() {
            return Ok(());
        }
        let approved = self.provider.allowance(self.keypair.address()).await?;
        if approved >= required {
            return Ok(());
        }
        if !auto_approve {
            return Err(ClientError::Allowance { required, approved });
        }
        self.approve_allowance(required).await?;
        Ok(())
    }

    /// Deposit `native_amount` (attached as call value) plus `token_amount`
    /// into the pool. Minted LP tokens are not read back from the call; the
    /// caller re-queries balances afterward.
    pub async fn deposit_liquidity(
        &self,
        token_amount: U256,
        native_amount: U256,
        auto_approve: bool,
    ) -> Result<PendingTransaction, ClientError> {
        self.ensure_allowance(token_amount, auto_approve).await?;
        self.call_and_confirm(
            self.provider.exchange(),
            "add_liquidity",
            vec![token_amount.to_string()],
            native_amount,
        )
        .await
    }

    /// Burn `lp_amount` LP tokens. The payout is computed by the ledger; any
    /// local quote was advisory only.
    pub async fn withdraw_liquidity(
        &self,
        lp_amount: U256,
    ) -> Result<PendingTransaction, ClientError> {
        self.call_and_confirm(
            self.provider.exchange(),
            "remove_liquidity",
            vec![lp_amount.to_string()],
            U256::zero(),
        )
        .await
    }

    /// Swap `amount_in` in the given direction, insisting on at least
    /// `min_out` of the counter-asset. Native input travels as the call
    /// value; token input requires a confirmed allowance.
    pub async fn swap(
        &self,
        direction: SwapDirection,
        amount_in: U256,
        min_out: U256,
        auto_approve: bool,
    ) -> Result<PendingTransaction, ClientError> {
        match direction {
            SwapDirection::NativeToToken => {
                self.call_and_confirm(
                    self.provider.exchange(),
                    "native_to_token",
                    vec![min_out.to_string()],
                    amount_in,
                )
                .await
            }
            SwapDirection::TokenToNative => {
                self.ensure_allowance(amount_in, auto_approve).await?;
                self.call_and_confirm(
                    self.provider.exchange(),
                    "token_to_native",
                    vec![amount_in.to_string(), min_out.to_string()],
                    U256::zero(),
                )
                .await
            }
        }
    }
}
