//! Transaction submitter
//!
//! Turns a finalized quiz result into a confirmed onchain transaction:
//! 1. Re-validate the session through the chain guard
//! 2. Primary path: request/response write that returns the tx hash directly
//! 3. Fallback path (only if the primary raises): fire-and-forget write whose
//!    hash lands asynchronously in a shared single-slot mailbox, bounded by
//!    the submission deadline
//! 4. Await the receipt and surface `Confirmed` or `Failed`
//!
//! The dual write path is load-bearing: some wallet/transport combinations
//! only implement one of the two write styles. The mailbox is a `watch`
//! channel, so the bounded wait is a future, not a busy poll, and a hash that
//! lands after the deadline is simply never read.

use crate::config::QuizConfig;
use crate::error::{QuizError, Result};
use crate::guard::ChainGuard;
use crate::personality::Category;
use crate::scoring::ScoreVector;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Transaction identifier as returned by the wallet transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHash(pub String);

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Observed status of a broadcast transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    /// No receipt yet.
    Pending,
    /// Mined successfully.
    Confirmed,
    /// Mined but reverted.
    Reverted,
}

/// The finalized (personality, scores) pair for one completed attempt.
///
/// Owned by the submitter for the duration of the submission and never
/// mutated after creation. Submit-once semantics are keyed on `attempt_id`.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub attempt_id: Uuid,
    pub personality: Category,
    pub scores: ScoreVector,
}

/// Lifecycle of one submission attempt. Exactly one active state per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    NotStarted,
    AwaitingNetwork,
    Submitting,
    AwaitingReceipt(TxHash),
    Confirmed(TxHash),
    Failed { reason: String },
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed(_) | Self::Failed { .. })
    }
}

/// Write surface of the quiz contract plus receipt lookups.
///
/// Implemented by the JSON-RPC provider and by test doubles.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Request/response write: resolves once the wallet has signed and
    /// broadcast, returning the transaction hash.
    async fn submit_result(
        &self,
        from: &str,
        personality: Category,
        scores: ScoreVector,
    ) -> Result<TxHash>;

    /// Fire-and-forget write: returns as soon as the request is issued. The
    /// transport later writes the resulting hash into the pending slot.
    async fn submit_result_deferred(
        &self,
        from: &str,
        personality: Category,
        scores: ScoreVector,
    ) -> Result<()>;

    /// Mint the personality badge NFT.
    async fn mint_badge(&self, from: &str, personality: Category, token_uri: &str)
        -> Result<TxHash>;

    /// Receiver over the shared latest-transaction slot written by the
    /// deferred write path. Single writer: only one submission is in flight
    /// per attempt.
    fn pending_transaction(&self) -> watch::Receiver<Option<TxHash>>;

    /// Look up the receipt for `tx`. `Pending` means not yet mined.
    async fn transaction_status(&self, tx: &TxHash) -> Result<TxStatus>;
}

/// Orchestrates one state-changing call from precondition checks to receipt.
pub struct TxSubmitter {
    guard: ChainGuard,
    sink: Arc<dyn ResultSink>,
    config: QuizConfig,
    state_tx: watch::Sender<SubmissionState>,
    last_attempt: parking_lot::Mutex<Option<Uuid>>,
}

impl TxSubmitter {
    pub fn new(guard: ChainGuard, sink: Arc<dyn ResultSink>, config: QuizConfig) -> Self {
        let (state_tx, _) = watch::channel(SubmissionState::NotStarted);
        Self {
            guard,
            sink,
            config,
            state_tx,
            last_attempt: parking_lot::Mutex::new(None),
        }
    }

    /// Observe submission state transitions.
    pub fn state(&self) -> watch::Receiver<SubmissionState> {
        self.state_tx.subscribe()
    }

    /// Current submission state.
    pub fn current_state(&self) -> SubmissionState {
        self.state_tx.borrow().clone()
    }

    /// Return to `NotStarted` for a fresh attempt. Attempt ids that already
    /// submitted stay rejected.
    pub fn reset(&self) {
        self.set_state(SubmissionState::NotStarted);
    }

    fn set_state(&self, state: SubmissionState) {
        debug!(?state, "submission state");
        self.state_tx.send_replace(state);
    }

    fn fail(&self, err: QuizError) -> QuizError {
        self.set_state(SubmissionState::Failed {
            reason: err.to_string(),
        });
        err
    }

    /// Submit a finalized result and wait for confirmation.
    ///
    /// At most one submission per quiz attempt: a second call for the same
    /// attempt id is rejected with `AlreadySubmitted`, never queued.
    pub async fn submit(&self, request: SubmissionRequest) -> Result<TxHash> {
        {
            let mut last = self.last_attempt.lock();
            if *last == Some(request.attempt_id) {
                return Err(QuizError::AlreadySubmitted);
            }
            *last = Some(request.attempt_id);
        }

        info!(
            attempt = %request.attempt_id,
            personality = %request.personality,
            "submitting quiz result"
        );

        self.set_state(SubmissionState::AwaitingNetwork);
        let from = match self.guard.ensure_ready().await {
            Ok(account) => account,
            Err(err) => return Err(self.fail(err)),
        };

        self.set_state(SubmissionState::Submitting);
        let hash = match self
            .sink
            .submit_result(&from, request.personality, request.scores)
            .await
        {
            Ok(hash) => hash,
            Err(primary_err) => {
                warn!(error = %primary_err, "primary write path failed, trying deferred path");
                match self.submit_via_fallback(&from, &request).await {
                    Ok(hash) => hash,
                    Err(err) => return Err(self.fail(err)),
                }
            }
        };

        info!(tx = %hash, "transaction broadcast");
        self.set_state(SubmissionState::AwaitingReceipt(hash.clone()));
        match self.wait_for_receipt(&hash).await {
            Ok(()) => {
                self.set_state(SubmissionState::Confirmed(hash.clone()));
                info!(tx = %hash, "submission confirmed");
                Ok(hash)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Mint the badge NFT for a submitted personality. Same guard and receipt
    /// machinery, request/response write only.
    pub async fn mint(&self, personality: Category) -> Result<TxHash> {
        let from = self.guard.ensure_ready().await?;
        let uri = self.config.metadata_uris.uri_for(personality).to_string();

        let hash = self.sink.mint_badge(&from, personality, &uri).await?;
        info!(tx = %hash, personality = %personality, "mint broadcast");
        self.wait_for_receipt(&hash).await?;
        Ok(hash)
    }

    /// Fallback write: issue the deferred call, then wait on the pending-slot
    /// mailbox until it holds a fresh hash or the deadline elapses.
    ///
    /// The in-flight wallet request cannot be cancelled; a hash written after
    /// the deadline stays in the slot unread and is discarded by the next
    /// `borrow_and_update` baseline.
    async fn submit_via_fallback(
        &self,
        from: &str,
        request: &SubmissionRequest,
    ) -> Result<TxHash> {
        let mut pending = self.sink.pending_transaction();
        // Baseline: anything already in the slot predates this submission.
        pending.borrow_and_update();

        self.sink
            .submit_result_deferred(from, request.personality, request.scores)
            .await?;

        let deadline = Instant::now() + self.config.submission_timeout();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining == Duration::ZERO {
                warn!(attempt = %request.attempt_id, "fallback path exceeded deadline");
                return Err(QuizError::SubmissionTimeout);
            }
            match tokio::time::timeout(remaining, pending.changed()).await {
                Ok(Ok(())) => {
                    if let Some(hash) = pending.borrow_and_update().clone() {
                        return Ok(hash);
                    }
                    // Slot was cleared, keep waiting.
                }
                Ok(Err(_closed)) => {
                    return Err(QuizError::RemoteWriteRejected(
                        "wallet transport closed before producing a transaction hash".to_string(),
                    ));
                }
                Err(_elapsed) => {
                    warn!(attempt = %request.attempt_id, "fallback path exceeded deadline");
                    return Err(QuizError::SubmissionTimeout);
                }
            }
        }
    }

    /// Poll for the receipt until confirmed, reverted, or the receipt
    /// deadline passes (dropped transaction).
    async fn wait_for_receipt(&self, hash: &TxHash) -> Result<()> {
        let deadline = Instant::now() + self.config.receipt_timeout();
        loop {
            match self.sink.transaction_status(hash).await? {
                TxStatus::Confirmed => return Ok(()),
                TxStatus::Reverted => {
                    return Err(QuizError::RemoteWriteRejected(format!(
                        "transaction {hash} reverted"
                    )));
                }
                TxStatus::Pending => {
                    if Instant::now() >= deadline {
                        return Err(QuizError::RemoteWriteRejected(format!(
                            "transaction {hash} dropped: no receipt within deadline"
                        )));
                    }
                    tokio::time::sleep(self.config.receipt_poll_interval()).await;
                }
            }
        }
    }
}
