//! Leaderboard reader
//!
//! Fetches the contract's per-category aggregate counters and normalizes them
//! into a snapshot with percentages. A failed or empty read degrades to the
//! zero snapshot; the presentation layer never sees a read error.
//!
//! The post-confirmation refresh is a scheduled task tied to the reader's
//! lifetime: dropping the reader (or scheduling a newer refresh) aborts it,
//! so no timer outlives its owner.

use crate::error::Result;
use crate::personality::Category;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Raw aggregate counters as served by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateCounts {
    /// Per-category submission counts in category declaration order.
    pub counts: [u64; Category::COUNT],
    /// Total submissions recorded by the contract.
    pub total: u64,
}

/// Read-only aggregate query surface. Implemented by the RPC provider and by
/// test doubles.
#[async_trait]
pub trait AggregateSource: Send + Sync {
    async fn aggregate(&self) -> Result<AggregateCounts>;
}

/// Count and derived percentage for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryStanding {
    pub count: u64,
    pub percentage: f64,
}

/// Normalized aggregate view. Replaced wholesale on every successful read,
/// never partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardSnapshot {
    standings: [CategoryStanding; Category::COUNT],
    pub total: u64,
    pub fetched_at: DateTime<Utc>,
}

impl LeaderboardSnapshot {
    /// The defined "no data yet" snapshot.
    pub fn zero() -> Self {
        Self {
            standings: [CategoryStanding::default(); Category::COUNT],
            total: 0,
            fetched_at: Utc::now(),
        }
    }

    /// Normalize raw counters. Percentages are 0 when the total is 0.
    pub fn from_counts(raw: AggregateCounts) -> Self {
        let mut standings = [CategoryStanding::default(); Category::COUNT];
        for (i, &count) in raw.counts.iter().enumerate() {
            let percentage = if raw.total > 0 {
                count as f64 / raw.total as f64 * 100.0
            } else {
                0.0
            };
            standings[i] = CategoryStanding { count, percentage };
        }
        Self {
            standings,
            total: raw.total,
            fetched_at: Utc::now(),
        }
    }

    pub fn standing(&self, category: Category) -> CategoryStanding {
        self.standings[category.as_index() as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Caches the latest snapshot and drives manual and scheduled refreshes.
pub struct LeaderboardReader {
    source: Arc<dyn AggregateSource>,
    snapshot: RwLock<LeaderboardSnapshot>,
    scheduled: Mutex<Option<JoinHandle<()>>>,
}

impl LeaderboardReader {
    /// Starts with the zero snapshot; callers refresh on mount.
    pub fn new(source: Arc<dyn AggregateSource>) -> Self {
        Self {
            source,
            snapshot: RwLock::new(LeaderboardSnapshot::zero()),
            scheduled: Mutex::new(None),
        }
    }

    /// Create a reader and run the initial on-mount refresh.
    pub async fn mounted(source: Arc<dyn AggregateSource>) -> Arc<Self> {
        let reader = Arc::new(Self::new(source));
        reader.refresh().await;
        reader
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> LeaderboardSnapshot {
        self.snapshot.read().clone()
    }

    /// Re-query the aggregate and replace the snapshot. A read failure is
    /// recovered into the zero snapshot and logged, not propagated.
    pub async fn refresh(&self) -> LeaderboardSnapshot {
        let next = match self.source.aggregate().await {
            Ok(raw) => {
                debug!(total = raw.total, "aggregate read");
                LeaderboardSnapshot::from_counts(raw)
            }
            Err(err) => {
                warn!(error = %err, "aggregate read failed, using zero snapshot");
                LeaderboardSnapshot::zero()
            }
        };
        *self.snapshot.write() = next.clone();
        next
    }

    /// Schedule a one-shot refresh after `delay`, replacing any previously
    /// scheduled one. The task holds only a weak reference and is aborted on
    /// drop, so a torn-down reader never refreshes.
    pub fn schedule_refresh(self: &Arc<Self>, delay: Duration) {
        let weak: Weak<Self> = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(reader) = weak.upgrade() {
                info!("running scheduled leaderboard refresh");
                reader.refresh().await;
            }
        });
        if let Some(previous) = self.scheduled.lock().replace(handle) {
            previous.abort();
        }
    }
}

impl Drop for LeaderboardReader {
    fn drop(&mut self) {
        if let Some(handle) = self.scheduled.lock().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuizError;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FakeSource {
        response: std::result::Result<AggregateCounts, String>,
        calls: AtomicU32,
    }

    impl FakeSource {
        fn ok(counts: [u64; 4], total: u64) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(AggregateCounts { counts, total }),
                calls: AtomicU32::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: Err("rpc unavailable".to_string()),
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl AggregateSource for FakeSource {
        async fn aggregate(&self) -> Result<AggregateCounts> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .clone()
                .map_err(QuizError::RemoteReadFailed)
        }
    }

    #[tokio::test]
    async fn test_percentages_from_counts() {
        let reader = LeaderboardReader::new(FakeSource::ok([3, 3, 2, 2], 10));
        let snapshot = reader.refresh().await;

        assert_eq!(snapshot.total, 10);
        assert_eq!(snapshot.standing(Category::Bitcoin).percentage, 30.0);
        assert_eq!(snapshot.standing(Category::Ethereum).percentage, 30.0);
        assert_eq!(snapshot.standing(Category::Solana).percentage, 20.0);
        assert_eq!(snapshot.standing(Category::Dogecoin).percentage, 20.0);
    }

    #[tokio::test]
    async fn test_percentages_sum_to_hundred() {
        let reader = LeaderboardReader::new(FakeSource::ok([7, 5, 3, 2], 17));
        let snapshot = reader.refresh().await;

        let sum: f64 = Category::ALL
            .iter()
            .map(|&c| snapshot.standing(c).percentage)
            .sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_zero_total_means_zero_percentages() {
        let reader = LeaderboardReader::new(FakeSource::ok([0, 0, 0, 0], 0));
        let snapshot = reader.refresh().await;

        assert!(snapshot.is_empty());
        for category in Category::ALL {
            assert_eq!(snapshot.standing(category).percentage, 0.0);
            assert_eq!(snapshot.standing(category).count, 0);
        }
    }

    #[tokio::test]
    async fn test_read_failure_degrades_to_zero_snapshot() {
        let reader = LeaderboardReader::new(FakeSource::failing());
        let snapshot = reader.refresh().await;

        assert!(snapshot.is_empty());
        for category in Category::ALL {
            assert_eq!(snapshot.standing(category), CategoryStanding::default());
        }
    }

    #[tokio::test]
    async fn test_mounted_reader_fetches_immediately() {
        let source = FakeSource::ok([3, 3, 2, 2], 10);
        let reader = LeaderboardReader::mounted(source.clone()).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(reader.snapshot().total, 10);
    }

    #[tokio::test]
    async fn test_scheduled_refresh_runs() {
        let source = FakeSource::ok([1, 0, 0, 0], 1);
        let reader = Arc::new(LeaderboardReader::new(source.clone()));

        reader.schedule_refresh(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(reader.snapshot().total, 1);
    }

    #[tokio::test]
    async fn test_dropping_reader_cancels_scheduled_refresh() {
        let source = FakeSource::ok([1, 0, 0, 0], 1);
        let reader = Arc::new(LeaderboardReader::new(source.clone()));

        reader.schedule_refresh(Duration::from_millis(20));
        drop(reader);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rescheduling_replaces_previous_timer() {
        let source = FakeSource::ok([2, 1, 1, 0], 4);
        let reader = Arc::new(LeaderboardReader::new(source.clone()));

        reader.schedule_refresh(Duration::from_millis(20));
        reader.schedule_refresh(Duration::from_millis(40));
        tokio::time::sleep(Duration::from_millis(120)).await;

        // Only the replacement fired.
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
