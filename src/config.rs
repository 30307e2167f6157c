//! Quiz runtime configuration
//!
//! Connection targets, deadlines, and the per-category NFT metadata URIs.
//! Timeouts are stored in milliseconds so tests can shrink them without
//! touching the orchestration code.

use crate::personality::Category;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete configuration for one quiz deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// JSON-RPC endpoint for the wallet/provider transport.
    pub rpc_url: String,
    /// Deployed quiz contract address (0x-prefixed).
    pub contract_address: String,
    /// The one chain the contract lives on.
    pub required_chain_id: u64,
    /// Deadline for the fallback write path to surface a transaction hash.
    pub submission_timeout_ms: u64,
    /// Interval between receipt queries while awaiting confirmation.
    pub receipt_poll_interval_ms: u64,
    /// Deadline for confirmation; past it the transaction counts as dropped.
    pub receipt_timeout_ms: u64,
    /// Delay before the post-confirmation leaderboard refresh.
    pub leaderboard_refresh_delay_ms: u64,
    /// NFT metadata URIs keyed by personality.
    pub metadata_uris: MetadataUris,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            contract_address: "0x0000000000000000000000000000000000000000".to_string(),
            required_chain_id: 8453, // Base mainnet
            submission_timeout_ms: 30_000,
            receipt_poll_interval_ms: 1_000,
            receipt_timeout_ms: 120_000,
            leaderboard_refresh_delay_ms: 3_000,
            metadata_uris: MetadataUris::default(),
        }
    }
}

impl QuizConfig {
    pub fn submission_timeout(&self) -> Duration {
        Duration::from_millis(self.submission_timeout_ms)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_millis(self.receipt_timeout_ms)
    }

    pub fn leaderboard_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.leaderboard_refresh_delay_ms)
    }
}

/// Per-category NFT metadata locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataUris {
    pub bitcoin: String,
    pub ethereum: String,
    pub solana: String,
    pub dogecoin: String,
}

impl Default for MetadataUris {
    fn default() -> Self {
        Self {
            bitcoin: "ipfs://bafy-bitcoin-personality".to_string(),
            ethereum: "ipfs://bafy-ethereum-personality".to_string(),
            solana: "ipfs://bafy-solana-personality".to_string(),
            dogecoin: "ipfs://bafy-dogecoin-personality".to_string(),
        }
    }
}

impl MetadataUris {
    /// URI for one category's badge.
    pub fn uri_for(&self, category: Category) -> &str {
        match category {
            Category::Bitcoin => &self.bitcoin,
            Category::Ethereum => &self.ethereum,
            Category::Solana => &self.solana,
            Category::Dogecoin => &self.dogecoin,
        }
    }
}
