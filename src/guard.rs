//! Chain session guard
//!
//! Precondition checks before any state-changing contract call:
//! 1. a wallet account must be bound to the session
//! 2. the wallet must be on the required chain
//!
//! Checked in order, first failure short-circuits. On a chain mismatch the
//! guard issues exactly one switch request; it never loops or polls waiting
//! for the user to switch manually.

use crate::error::{QuizError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Wallet-side view of the session: bound account, active chain, and the
/// ability to request a chain switch. Implemented by the RPC provider and by
/// test doubles.
#[async_trait]
pub trait WalletSession: Send + Sync {
    /// The account bound to this session, if any.
    async fn account(&self) -> Result<Option<String>>;

    /// Chain id the wallet is currently connected to.
    async fn chain_id(&self) -> Result<u64>;

    /// Ask the wallet to switch to `chain_id`. The wallet may refuse.
    async fn switch_chain(&self, chain_id: u64) -> Result<()>;
}

/// Verifies wallet connectivity and active network before a write.
pub struct ChainGuard {
    wallet: Arc<dyn WalletSession>,
    required_chain_id: u64,
}

impl ChainGuard {
    pub fn new(wallet: Arc<dyn WalletSession>, required_chain_id: u64) -> Self {
        Self {
            wallet,
            required_chain_id,
        }
    }

    pub fn required_chain_id(&self) -> u64 {
        self.required_chain_id
    }

    /// Run the precondition checks and return the bound account address.
    ///
    /// Issues at most one switch request per call. After a successful switch
    /// the chain id is read back once; a remaining mismatch fails with
    /// `WrongNetwork` carrying both identifiers.
    pub async fn ensure_ready(&self) -> Result<String> {
        let account = self
            .wallet
            .account()
            .await?
            .ok_or(QuizError::Unauthenticated)?;

        let actual = self.wallet.chain_id().await?;
        if actual == self.required_chain_id {
            debug!(account = %account, chain_id = actual, "session ready");
            return Ok(account);
        }

        info!(
            required = self.required_chain_id,
            actual, "chain mismatch, requesting switch"
        );
        if let Err(err) = self.wallet.switch_chain(self.required_chain_id).await {
            warn!(required = self.required_chain_id, actual, error = %err, "chain switch refused");
            return Err(QuizError::ChainSwitchFailed {
                required: self.required_chain_id,
                actual,
                reason: err.to_string(),
            });
        }

        let observed = self.wallet.chain_id().await?;
        if observed != self.required_chain_id {
            return Err(QuizError::WrongNetwork {
                required: self.required_chain_id,
                actual: observed,
            });
        }

        info!(account = %account, chain_id = observed, "switched to required chain");
        Ok(account)
    }
}
