//! Quiz session controller
//!
//! Owns the state of one quiz attempt and defines the call ordering across
//! the scoring engine, the chain guard, the transaction submitter, and the
//! leaderboard reader. The attempt value is threaded explicitly; there is no
//! ambient mutable state.
//!
//! Ordering guarantees:
//! - the winner is computed before the submitter is ever invoked
//! - the delayed leaderboard refresh is scheduled only after `Confirmed`

use crate::config::QuizConfig;
use crate::error::{QuizError, Result};
use crate::leaderboard::LeaderboardReader;
use crate::personality::Category;
use crate::questions::{Question, QUESTIONS};
use crate::scoring::{QuizAttempt, ScoreVector};
use crate::submitter::{SubmissionRequest, SubmissionState, TxHash, TxSubmitter};
use std::sync::Arc;
use tracing::info;

/// Final result of a completed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub personality: Category,
    pub scores: ScoreVector,
}

/// What happened after an answer was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptProgress {
    /// More questions remain; this is the next 0-based index.
    Advanced { next_question: usize },
    /// That was the last question.
    Completed(QuizOutcome),
}

/// Orchestrates one quiz attempt from first question to onchain confirmation.
pub struct QuizSession {
    questions: &'static [Question],
    attempt: QuizAttempt,
    submitter: Arc<TxSubmitter>,
    leaderboard: Arc<LeaderboardReader>,
    config: QuizConfig,
    submitted: bool,
}

impl QuizSession {
    pub fn new(
        submitter: Arc<TxSubmitter>,
        leaderboard: Arc<LeaderboardReader>,
        config: QuizConfig,
    ) -> Self {
        Self {
            questions: QUESTIONS,
            attempt: QuizAttempt::new(),
            submitter,
            leaderboard,
            config,
            submitted: false,
        }
    }

    /// The question currently awaiting an answer, `None` once complete.
    pub fn current_question(&self) -> Option<&'static Question> {
        self.questions.get(self.attempt.current_question)
    }

    pub fn is_complete(&self) -> bool {
        self.attempt.current_question >= self.questions.len()
    }

    /// Running tally.
    pub fn scores(&self) -> ScoreVector {
        self.attempt.scores
    }

    /// Apply the answer for the current question.
    ///
    /// Input is gated: while a selection is being applied no second answer is
    /// accepted for the same question, and a completed attempt rejects all
    /// input.
    pub fn answer(&mut self, option_index: usize) -> Result<AttemptProgress> {
        let question = self.current_question().ok_or_else(|| {
            QuizError::InvalidAttemptState("attempt already complete".to_string())
        })?;
        if self.attempt.selected.is_some() {
            return Err(QuizError::InvalidAttemptState(
                "an answer is already being applied".to_string(),
            ));
        }
        let option = question.options.get(option_index).ok_or_else(|| {
            QuizError::InvalidAttemptState(format!(
                "option {option_index} out of range for question {}",
                question.id
            ))
        })?;

        self.attempt.selected = Some(option_index);
        self.attempt.scores.record(option.category);
        self.attempt.current_question += 1;

        if self.is_complete() {
            let outcome = QuizOutcome {
                personality: self.attempt.scores.winner(),
                scores: self.attempt.scores,
            };
            info!(
                attempt = %self.attempt.id,
                personality = %outcome.personality,
                "quiz complete"
            );
            Ok(AttemptProgress::Completed(outcome))
        } else {
            // Next question shown, selection gate released.
            self.attempt.selected = None;
            Ok(AttemptProgress::Advanced {
                next_question: self.attempt.current_question,
            })
        }
    }

    /// Winner and score vector, once every question is answered.
    pub fn outcome(&self) -> Option<QuizOutcome> {
        if !self.is_complete() {
            return None;
        }
        Some(QuizOutcome {
            personality: self.attempt.scores.winner(),
            scores: self.attempt.scores,
        })
    }

    /// Submit the finalized result onchain. At most one submission per
    /// attempt; on confirmation the delayed leaderboard refresh is scheduled.
    pub async fn submit_result(&mut self) -> Result<TxHash> {
        let outcome = self.outcome().ok_or_else(|| {
            QuizError::InvalidAttemptState("cannot submit an incomplete attempt".to_string())
        })?;
        if self.submitted {
            return Err(QuizError::AlreadySubmitted);
        }

        let request = SubmissionRequest {
            attempt_id: self.attempt.id,
            personality: outcome.personality,
            scores: outcome.scores,
        };
        let hash = self.submitter.submit(request).await?;

        self.submitted = true;
        self.leaderboard
            .schedule_refresh(self.config.leaderboard_refresh_delay());
        Ok(hash)
    }

    /// Mint the badge NFT for the submitted personality.
    pub async fn mint_badge(&self) -> Result<TxHash> {
        let outcome = self.outcome().ok_or_else(|| {
            QuizError::InvalidAttemptState("cannot mint before completing the quiz".to_string())
        })?;
        self.submitter.mint(outcome.personality).await
    }

    /// Current submission lifecycle state.
    pub fn submission_state(&self) -> SubmissionState {
        self.submitter.current_state()
    }

    /// Discard the attempt and start over with fresh state.
    pub fn restart(&mut self) {
        info!(attempt = %self.attempt.id, "restarting quiz");
        self.attempt = QuizAttempt::new();
        self.submitted = false;
        self.submitter.reset();
    }

    pub fn leaderboard(&self) -> &Arc<LeaderboardReader> {
        &self.leaderboard
    }
}
