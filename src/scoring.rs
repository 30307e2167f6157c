//! Scoring engine
//!
//! Pure tallying of answers into a per-category score vector plus winner
//! selection. Winner selection folds the categories in declaration order and
//! replaces the leader only on a strictly greater count, so ties always
//! resolve to the earlier-declared category. That is a deliberate,
//! reproducible tie-break.

use crate::personality::Category;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-category answer tally for one quiz attempt.
///
/// Invariant: the sum of all counts equals the number of answers recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreVector {
    counts: [u32; Category::COUNT],
}

impl ScoreVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one answer for `category`. Counts are never decremented.
    pub fn record(&mut self, category: Category) {
        self.counts[category.as_index() as usize] += 1;
    }

    /// Count for a single category.
    pub fn count(&self, category: Category) -> u32 {
        self.counts[category.as_index() as usize]
    }

    /// Total answers recorded.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Counts in category declaration order (the wire argument order).
    pub fn as_array(&self) -> [u32; Category::COUNT] {
        self.counts
    }

    /// The winning category: highest count, earliest declared wins ties.
    ///
    /// With zero answers recorded every count is zero and the fold yields the
    /// first-declared category. Callers must not special-case empty input.
    pub fn winner(&self) -> Category {
        let mut leader = Category::ALL[0];
        for category in Category::ALL {
            if self.count(category) > self.count(leader) {
                leader = category;
            }
        }
        leader
    }
}

/// Tally an ordered answer sequence into a score vector.
///
/// Idempotent: the same sequence always yields the same vector and winner.
pub fn tally(answers: &[Category]) -> ScoreVector {
    let mut scores = ScoreVector::new();
    for &category in answers {
        scores.record(category);
    }
    scores
}

/// Mutable state of one in-progress quiz attempt.
///
/// Created on quiz start, mutated once per answer, reset on restart. The
/// `selected` marker gates re-entrant input while an answer is being applied.
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    pub id: Uuid,
    pub current_question: usize,
    pub scores: ScoreVector,
    pub selected: Option<usize>,
}

impl QuizAttempt {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            current_question: 0,
            scores: ScoreVector::new(),
            selected: None,
        }
    }
}

impl Default for QuizAttempt {
    fn default() -> Self {
        Self::new()
    }
}
