//! Error taxonomy for the quiz submission pipeline
//!
//! Every failure is terminal for the current submission attempt and never
//! fatal to the process; the caller may restart the whole attempt. Aggregate
//! read failures are recovered inside the leaderboard reader and normally do
//! not surface through this type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    /// No wallet account is bound to the session.
    #[error("no wallet account bound to the session")]
    Unauthenticated,

    /// Connected to the wrong network and no switch was attempted or possible.
    #[error("wrong network: required chain {required}, connected to chain {actual}")]
    WrongNetwork { required: u64, actual: u64 },

    /// The wallet refused or failed the network switch request.
    #[error("network switch to chain {required} failed (still on {actual}): {reason}")]
    ChainSwitchFailed {
        required: u64,
        actual: u64,
        reason: String,
    },

    /// The fallback write path produced no transaction hash before the deadline.
    #[error("submission timed out waiting for a transaction hash")]
    SubmissionTimeout,

    /// Signing was refused, the call reverted, or the transaction was dropped.
    #[error("remote write rejected: {0}")]
    RemoteWriteRejected(String),

    /// The aggregate read query errored.
    #[error("aggregate read failed: {0}")]
    RemoteReadFailed(String),

    /// A result was already submitted for this quiz attempt.
    #[error("a result was already submitted for this attempt")]
    AlreadySubmitted,

    /// The quiz attempt is not in the state the operation requires.
    #[error("invalid attempt state: {0}")]
    InvalidAttemptState(String),

    /// Transport-level RPC failure (connection, malformed response).
    #[error("rpc transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for QuizError {
    fn from(err: reqwest::Error) -> Self {
        QuizError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;
