//! Read-only ledger access. No signing key is involved anywhere in this
//! module; everything here is an idempotent query that may be issued
//! concurrently with other reads.
//!
//! A failed or malformed response is always a `Transient` error, never a
//! defaulted zero. "Query failed" and "pool is empty" are different answers
//! and stay different.

use serde_json::Value;
use tidepool_core::{AccountBalances, CallEnvelope, ReserveSnapshot, U256, CHAIN_ID};

use crate::ClientError;

/// Resolution of a submitted transaction as reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    Pending,
    Confirmed,
    Reverted(Option<String>),
}

/// HTTP connection to a ledger node, bound to the one fixed exchange/token
/// pair this client serves.
#[derive(Debug, Clone)]
pub struct LedgerProvider {
    http: reqwest::Client,
    rpc: String,
    exchange: String,
    token: String,
}

impl LedgerProvider {
    /// Connect and validate the node's chain id against this build's
    /// expected chain. Every operation fails fast here rather than
    /// discovering the mismatch mid-submission.
    pub async fn connect(
        rpc: &str,
        exchange: &str,
        token: &str,
    ) -> Result<Self, ClientError> {
        let provider = LedgerProvider {
            http: reqwest::Client::new(),
            rpc: rpc.trim_end_matches('/').to_string(),
            exchange: exchange.to_string(),
            token: token.to_string(),
        };
        let info = provider.get_success("node-info").await?;
        let found = info["chain_id"]
            .as_u64()
            .ok_or_else(|| ClientError::Transient("node-info is missing 'chain_id'".into()))?;
        if found != CHAIN_ID {
            return Err(ClientError::NetworkMismatch {
                expected: CHAIN_ID,
                found,
            });
        }
        Ok(provider)
    }

    pub fn rpc(&self) -> &str {
        &self.rpc
    }

    /// Address of the exchange contract (which is also the LP token).
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Address of the token contract.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// GET a path and unwrap the node's `status: success` envelope.
    async fn get_success(&self, path: &str) -> Result<Value, ClientError> {
        let url = format!("{}/{}", self.rpc, path);
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(ClientError::Transient(format!(
                "HTTP {} from {}",
                resp.status(),
                url
            )));
        }
        let data: Value = resp.json().await?;
        if data["status"] == "success" {
            Ok(data)
        } else {
            Err(ClientError::Transient(
                data["msg"].as_str().unwrap_or("unknown ledger error").to_string(),
            ))
        }
    }

    /// Pull a decimal-string amount out of a response, loudly.
    fn amount_field(data: &Value, key: &str) -> Result<U256, ClientError> {
        let text = data[key]
            .as_str()
            .ok_or_else(|| ClientError::Transient(format!("ledger response missing '{}'", key)))?;
        U256::from_dec_str(text).map_err(|_| {
            ClientError::Transient(format!("ledger field '{}' is not a decimal amount", key))
        })
    }

    /// Native-currency balance of any address.
    pub async fn native_balance(&self, address: &str) -> Result<U256, ClientError> {
        let data = self.get_success(&format!("balance/{}", address)).await?;
        Self::amount_field(&data, "balance")
    }

    async fn token_balance_of(&self, contract: &str, holder: &str) -> Result<U256, ClientError> {
        let data = self
            .get_success(&format!("token/{}/balance/{}", contract, holder))
            .await?;
        Self::amount_field(&data, "balance")
    }

    /// The caller's balance of the exchange's paired token.
    pub async fn token_balance(&self, holder: &str) -> Result<U256, ClientError> {
        self.token_balance_of(&self.token, holder).await
    }

    /// The caller's LP-token balance (the exchange contract is the LP token).
    pub async fn lp_balance(&self, holder: &str) -> Result<U256, ClientError> {
        self.token_balance_of(&self.exchange, holder).await
    }

    /// Total LP tokens in existence.
    pub async fn lp_total_supply(&self) -> Result<U256, ClientError> {
        let data = self
            .get_success(&format!("token/{}/supply", self.exchange))
            .await?;
        Self::amount_field(&data, "supply")
    }

    /// How much of `owner`'s tokens the exchange is currently allowed to move.
    pub async fn allowance(&self, owner: &str) -> Result<U256, ClientError> {
        let data = self
            .get_success(&format!(
                "token/{}/allowance/{}/{}",
                self.token, owner, self.exchange
            ))
            .await?;
        Self::amount_field(&data, "allowance")
    }

    /// The account's next expected call nonce.
    pub async fn account_nonce(&self, address: &str) -> Result<u64, ClientError> {
        let data = self.get_success(&format!("account/{}", address)).await?;
        data["nonce"]
            .as_u64()
            .ok_or_else(|| ClientError::Transient("account response missing 'nonce'".into()))
    }

    /// Current pool reserves and LP supply, read concurrently. The snapshot
    /// may be stale by the time a dependent transaction executes.
    pub async fn read_reserves(&self) -> Result<ReserveSnapshot, ClientError> {
        let (native_reserve, token_reserve, lp_total_supply) = tokio::try_join!(
            self.native_balance(&self.exchange),
            self.token_balance_of(&self.token, &self.exchange),
            self.lp_total_supply(),
        )?;
        Ok(ReserveSnapshot {
            native_reserve,
            token_reserve,
            lp_total_supply,
        })
    }

    /// One caller's native, token, and LP balances, read concurrently.
    pub async fn read_account_balances(
        &self,
        address: &str,
    ) -> Result<AccountBalances, ClientError> {
        let (native, token, lp_tokens) = tokio::try_join!(
            self.native_balance(address),
            self.token_balance(address),
            self.lp_balance(address),
        )?;
        Ok(AccountBalances {
            native,
            token,
            lp_tokens,
        })
    }

    /// The exchange contract's own swap pricing for `amount_in` against the
    /// given reserves. The contract's fee curve is the single source of
    /// truth; the returned integer is taken as authoritative. A zero input
    /// short-circuits to zero without touching the network.
    pub async fn swap_output(
        &self,
        amount_in: U256,
        reserve_in: U256,
        reserve_out: U256,
    ) -> Result<U256, ClientError> {
        if amount_in.is_zero() {
            return Ok(U256::zero());
        }
        let data = self
            .get_success(&format!(
                "exchange/{}/output/{}/{}/{}",
                self.exchange, amount_in, reserve_in, reserve_out
            ))
            .await?;
        Self::amount_field(&data, "amount_out")
    }

    /// Where a submitted transaction currently stands.
    pub async fn tx_status(&self, tx_hash: &str) -> Result<TxStatus, ClientError> {
        let data = self.get_success(&format!("tx/{}", tx_hash)).await?;
        match data["state"].as_str() {
            Some("pending") => Ok(TxStatus::Pending),
            Some("confirmed") => Ok(TxStatus::Confirmed),
            Some("reverted") => Ok(TxStatus::Reverted(
                data["revert_reason"].as_str().map(str::to_string),
            )),
            _ => Err(ClientError::Transient(
                "transaction response missing 'state'".into(),
            )),
        }
    }

    /// Broadcast a signed call envelope. Failures here are transaction
    /// failures, not transient read errors: a broadcast that died mid-flight
    /// must halt the operation flow.
    pub(crate) async fn post_call(&self, envelope: &CallEnvelope) -> Result<String, ClientError> {
        let url = format!("{}/call-contract", self.rpc);
        let resp = self
            .http
            .post(&url)
            .json(envelope)
            .send()
            .await
            .map_err(|e| ClientError::Transaction {
                reason: Some(format!("broadcast failed: {}", e)),
            })?;
        let data: Value = resp.json().await.map_err(|e| ClientError::Transaction {
            reason: Some(format!("broadcast failed: {}", e)),
        })?;

        if data["status"] == "success" {
            data["tx_hash"]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| ClientError::Transaction {
                    reason: Some("ledger accepted the call but returned no tx hash".into()),
                })
        } else {
            Err(ClientError::Transaction {
                reason: data["msg"].as_str().map(str::to_string),
            })
        }
    }
}
