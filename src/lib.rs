//! Crypto Personality Quiz core
//!
//! Five questions, four personalities, one onchain result. This crate holds
//! the logic behind the quiz mini-app: deterministic scoring, wallet/network
//! precondition checks, dual-path transaction submission with confirmation
//! tracking, and the aggregate leaderboard read cycle. Presentation and
//! wallet-connection UI live elsewhere; the contract is an opaque remote
//! service behind a JSON-RPC interface.
//!
//! ## Module Structure
//!
//! - `personality`: the four categories, tie-break and wire ordering
//! - `questions`: static question set
//! - `scoring`: answer tallying and winner selection
//! - `guard`: wallet/network precondition checks
//! - `submitter`: dual-path write orchestration and receipt tracking
//! - `leaderboard`: aggregate reads, normalization, scheduled refresh
//! - `session`: per-attempt orchestration across the above
//! - `provider`: EVM JSON-RPC transport
//! - `config`: deployment configuration
//! - `error`: failure taxonomy

/// Failure taxonomy
pub mod error;

/// Personality categories (single source of truth for ordering)
pub mod personality;

/// Static question set
pub mod questions;

/// Scoring engine
pub mod scoring;

/// Chain session guard
pub mod guard;

/// Transaction submitter
pub mod submitter;

/// Leaderboard reader
pub mod leaderboard;

/// Session controller
pub mod session;

/// JSON-RPC wallet/contract transport
pub mod provider;

/// Runtime configuration
pub mod config;

pub use config::QuizConfig;
pub use error::{QuizError, Result};
pub use guard::{ChainGuard, WalletSession};
pub use leaderboard::{AggregateSource, LeaderboardReader, LeaderboardSnapshot};
pub use personality::Category;
pub use provider::RpcProvider;
pub use scoring::{tally, QuizAttempt, ScoreVector};
pub use session::{AttemptProgress, QuizOutcome, QuizSession};
pub use submitter::{ResultSink, SubmissionRequest, SubmissionState, TxHash, TxStatus, TxSubmitter};
