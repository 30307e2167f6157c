//! JSON-RPC wallet/contract transport
//!
//! Concrete implementation of the wallet session, write, and aggregate read
//! surfaces over EVM JSON-RPC: `eth_accounts`, `eth_chainId`,
//! `wallet_switchEthereumChain`, `eth_sendTransaction`,
//! `eth_getTransactionReceipt`, `eth_call`.
//!
//! Calldata is assembled by hand: 4-byte selectors plus 32-byte words. The
//! deferred write path broadcasts from a spawned task and parks the resulting
//! hash in the shared pending-transaction slot.

use crate::error::{QuizError, Result};
use crate::guard::WalletSession;
use crate::leaderboard::{AggregateCounts, AggregateSource};
use crate::personality::Category;
use crate::scoring::ScoreVector;
use crate::submitter::{ResultSink, TxHash, TxStatus};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// keccak-256("storeQuizResult(uint8,uint256,uint256,uint256,uint256)")[..4]
const SELECTOR_STORE_RESULT: &str = "6882f5ec";
/// keccak-256("mintPersonalityNFT(uint8,string)")[..4]
const SELECTOR_MINT_BADGE: &str = "0f196ef0";
/// keccak-256("getLeaderboardData()")[..4]
const SELECTOR_LEADERBOARD: &str = "b297fc5a";

/// HTTP JSON-RPC provider bound to one endpoint and one contract.
pub struct RpcProvider {
    url: String,
    contract: String,
    client: reqwest::Client,
    next_id: AtomicU64,
    pending_tx: Arc<watch::Sender<Option<TxHash>>>,
}

impl RpcProvider {
    pub fn new(rpc_url: impl Into<String>, contract_address: impl Into<String>) -> Self {
        let (pending_tx, _) = watch::channel(None);
        Self {
            url: rpc_url.into(),
            contract: contract_address.into(),
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
            pending_tx: Arc::new(pending_tx),
        }
    }

    async fn rpc(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "rpc request");

        let response = self.client.post(&self.url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(QuizError::Transport(format!(
                "{method}: http status {}",
                response.status()
            )));
        }
        let envelope: Value = response.json().await?;
        if let Some(err) = envelope.get("error") {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown rpc error");
            return Err(QuizError::Transport(format!("{method}: {message}")));
        }
        envelope
            .get("result")
            .cloned()
            .ok_or_else(|| QuizError::Transport(format!("{method}: missing result")))
    }

    async fn send_transaction(&self, from: &str, calldata: String) -> Result<TxHash> {
        let params = json!([{
            "from": from,
            "to": self.contract,
            "data": format!("0x{calldata}"),
        }]);
        let result = self.rpc("eth_sendTransaction", params).await?;
        let hash = result
            .as_str()
            .ok_or_else(|| QuizError::Transport("non-string transaction hash".to_string()))?;
        Ok(TxHash(hash.to_string()))
    }
}

#[async_trait]
impl WalletSession for RpcProvider {
    async fn account(&self) -> Result<Option<String>> {
        let result = self.rpc("eth_accounts", json!([])).await?;
        let first = result
            .as_array()
            .and_then(|accounts| accounts.first())
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(first)
    }

    async fn chain_id(&self) -> Result<u64> {
        let result = self.rpc("eth_chainId", json!([])).await?;
        let raw = result
            .as_str()
            .ok_or_else(|| QuizError::Transport("non-string chain id".to_string()))?;
        parse_hex_u64(raw)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        let params = json!([{ "chainId": format!("0x{chain_id:x}") }]);
        self.rpc("wallet_switchEthereumChain", params).await?;
        Ok(())
    }
}

#[async_trait]
impl ResultSink for RpcProvider {
    async fn submit_result(
        &self,
        from: &str,
        personality: Category,
        scores: ScoreVector,
    ) -> Result<TxHash> {
        let calldata = encode_store_result(personality, scores);
        self.send_transaction(from, calldata)
            .await
            .map_err(|err| QuizError::RemoteWriteRejected(err.to_string()))
    }

    async fn submit_result_deferred(
        &self,
        from: &str,
        personality: Category,
        scores: ScoreVector,
    ) -> Result<()> {
        let calldata = encode_store_result(personality, scores);
        let params = json!([{
            "from": from,
            "to": self.contract,
            "data": format!("0x{calldata}"),
        }]);
        let body = json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": "eth_sendTransaction",
            "params": params,
        });

        let client = self.client.clone();
        let url = self.url.clone();
        let slot = Arc::clone(&self.pending_tx);
        tokio::spawn(async move {
            let outcome: Result<TxHash> = async {
                let response = client.post(&url).json(&body).send().await?;
                let envelope: Value = response.json().await?;
                let hash = envelope
                    .get("result")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        QuizError::RemoteWriteRejected(
                            envelope
                                .get("error")
                                .and_then(|e| e.get("message"))
                                .and_then(Value::as_str)
                                .unwrap_or("deferred send produced no hash")
                                .to_string(),
                        )
                    })?;
                Ok(TxHash(hash.to_string()))
            }
            .await;

            match outcome {
                Ok(hash) => {
                    // The slot may be read late or never; senders don't care.
                    let _ = slot.send(Some(hash));
                }
                Err(err) => warn!(error = %err, "deferred write failed"),
            }
        });
        Ok(())
    }

    async fn mint_badge(
        &self,
        from: &str,
        personality: Category,
        token_uri: &str,
    ) -> Result<TxHash> {
        let calldata = encode_mint_badge(personality, token_uri);
        self.send_transaction(from, calldata)
            .await
            .map_err(|err| QuizError::RemoteWriteRejected(err.to_string()))
    }

    fn pending_transaction(&self) -> watch::Receiver<Option<TxHash>> {
        self.pending_tx.subscribe()
    }

    async fn transaction_status(&self, tx: &TxHash) -> Result<TxStatus> {
        let result = self
            .rpc("eth_getTransactionReceipt", json!([tx.0]))
            .await?;
        if result.is_null() {
            return Ok(TxStatus::Pending);
        }
        match result.get("status").and_then(Value::as_str) {
            Some("0x1") => Ok(TxStatus::Confirmed),
            Some("0x0") => Ok(TxStatus::Reverted),
            other => Err(QuizError::Transport(format!(
                "unexpected receipt status: {other:?}"
            ))),
        }
    }
}

#[async_trait]
impl AggregateSource for RpcProvider {
    async fn aggregate(&self) -> Result<AggregateCounts> {
        let params = json!([
            { "to": self.contract, "data": format!("0x{SELECTOR_LEADERBOARD}") },
            "latest",
        ]);
        let result = self
            .rpc("eth_call", params)
            .await
            .map_err(|err| QuizError::RemoteReadFailed(err.to_string()))?;
        let raw = result
            .as_str()
            .ok_or_else(|| QuizError::RemoteReadFailed("non-string call result".to_string()))?;
        decode_aggregate(raw)
    }
}

/// Calldata for `storeQuizResult(uint8,uint256,uint256,uint256,uint256)`.
fn encode_store_result(personality: Category, scores: ScoreVector) -> String {
    let mut data = String::from(SELECTOR_STORE_RESULT);
    data.push_str(&encode_word(personality.as_index() as u64));
    for count in scores.as_array() {
        data.push_str(&encode_word(count as u64));
    }
    data
}

/// Calldata for `mintPersonalityNFT(uint8,string)`.
fn encode_mint_badge(personality: Category, token_uri: &str) -> String {
    let bytes = token_uri.as_bytes();
    let mut data = String::from(SELECTOR_MINT_BADGE);
    data.push_str(&encode_word(personality.as_index() as u64));
    // Offset of the string tail relative to the argument block: two words.
    data.push_str(&encode_word(64));
    data.push_str(&encode_word(bytes.len() as u64));
    data.push_str(&hex::encode(bytes));
    // Pad the string data to a 32-byte boundary.
    let remainder = bytes.len() % 32;
    if remainder != 0 {
        data.push_str(&"00".repeat(32 - remainder));
    }
    data
}

/// Decode the `getLeaderboardData()` return value: five uint256 words.
fn decode_aggregate(raw: &str) -> Result<AggregateCounts> {
    let hex_body = raw.strip_prefix("0x").unwrap_or(raw);
    // Word slicing below is by byte offset; a multibyte character would make
    // those offsets fall inside a character.
    if !hex_body.is_ascii() {
        return Err(QuizError::RemoteReadFailed(
            "aggregate payload contains non-hex characters".to_string(),
        ));
    }
    if hex_body.len() < 5 * 64 {
        return Err(QuizError::RemoteReadFailed(format!(
            "aggregate payload too short: {} hex chars",
            hex_body.len()
        )));
    }
    let mut words = [0u64; 5];
    for (i, word) in words.iter_mut().enumerate() {
        *word = decode_word(&hex_body[i * 64..(i + 1) * 64])?;
    }
    Ok(AggregateCounts {
        counts: [words[0], words[1], words[2], words[3]],
        total: words[4],
    })
}

/// One left-padded 32-byte ABI word.
fn encode_word(value: u64) -> String {
    format!("{value:064x}")
}

fn decode_word(word: &str) -> Result<u64> {
    // Counts fit comfortably in u64; reject anything wider.
    let (high, low) = word.split_at(48);
    if high.bytes().any(|b| b != b'0') {
        return Err(QuizError::RemoteReadFailed(format!(
            "aggregate counter overflows u64: {word}"
        )));
    }
    u64::from_str_radix(low, 16)
        .map_err(|err| QuizError::RemoteReadFailed(format!("bad hex word {word}: {err}")))
}

fn parse_hex_u64(raw: &str) -> Result<u64> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    u64::from_str_radix(digits, 16)
        .map_err(|err| QuizError::Transport(format!("bad hex quantity {raw}: {err}")))
}
