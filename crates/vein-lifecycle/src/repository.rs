//! Abstract persistence interface
//!
//! The backing store (relational, document, in-memory) is a collaborator
//! detail; the engine only sees this trait. The one concurrency guarantee it
//! demands: `update_investment` honors `expect_status` atomically, so the
//! update that flips state is the same statement that removes the record
//! from future selection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use vein_core::{Investment, InvestmentId, InvestmentStatus, UserId};
use vein_engine::MiningStats;

/// Result type alias for repository operations
pub type RepoResult<T> = std::result::Result<T, RepositoryError>;

/// Errors the persistence layer can surface
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    /// No investment with this id
    #[error("investment not found: {0}")]
    NotFound(InvestmentId),

    /// Compare-and-swap guard failed: another writer got there first
    #[error("status conflict on {id}: expected {expected}, found {actual}")]
    Conflict {
        id: InvestmentId,
        expected: InvestmentStatus,
        actual: InvestmentStatus,
    },

    /// A patch would regress or skip the status state machine
    #[error("illegal status transition on {id}: {from} -> {to}")]
    IllegalTransition {
        id: InvestmentId,
        from: InvestmentStatus,
        to: InvestmentStatus,
    },

    /// Infrastructure failure (connection, query, serialization)
    #[error("backend error: {0}")]
    Backend(String),
}

/// Selection filter for investment queries
///
/// All bounds are inclusive; unset fields match everything.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InvestmentFilter {
    /// Match a single status
    pub status: Option<InvestmentStatus>,
    /// `created_at <= bound` (an investment created exactly at the bound
    /// matches)
    pub created_on_or_before: Option<DateTime<Utc>>,
    /// `next_payout_date` set and `<= bound`
    pub payout_due_by: Option<DateTime<Utc>>,
    /// `end_date <= bound`
    pub ended_by: Option<DateTime<Utc>>,
}

impl InvestmentFilter {
    /// Filter on status alone
    pub fn with_status(status: InvestmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Whether an investment matches every set bound
    pub fn matches(&self, inv: &Investment) -> bool {
        if let Some(status) = self.status {
            if inv.status != status {
                return false;
            }
        }
        if let Some(bound) = self.created_on_or_before {
            if inv.created_at > bound {
                return false;
            }
        }
        if let Some(bound) = self.payout_due_by {
            match inv.next_payout_date {
                Some(due) if due <= bound => {}
                _ => return false,
            }
        }
        if let Some(bound) = self.ended_by {
            if inv.end_date > bound {
                return false;
            }
        }
        true
    }
}

/// Partial update applied to an investment
///
/// `next_payout_date` is doubly optional: the outer `Option` means "set this
/// field", the inner one is the nullable stored value. `expect_status` makes
/// the whole patch conditional (compare-and-swap).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InvestmentPatch {
    /// New status
    pub status: Option<InvestmentStatus>,
    /// Set (or null) the next scheduled payout
    pub next_payout_date: Option<Option<DateTime<Utc>>>,
    /// Advance the accrual watermark
    pub last_claim_date: Option<DateTime<Utc>>,
    /// Amount to add to the pending payout balance
    pub add_pending_payout: Option<f64>,
    /// Apply only if the stored status still matches
    pub expect_status: Option<InvestmentStatus>,
}

/// Persistence operations the lifecycle engine depends on
#[async_trait]
pub trait InvestmentRepository: Send + Sync {
    /// Investments matching the filter
    async fn find_investments(&self, filter: &InvestmentFilter) -> RepoResult<Vec<Investment>>;

    /// Count of investments matching the filter
    async fn count_investments(&self, filter: &InvestmentFilter) -> RepoResult<usize>;

    /// Store a newly created investment
    async fn insert_investment(&self, investment: Investment) -> RepoResult<()>;

    /// Apply a patch to one investment, honoring its CAS guard
    async fn update_investment(
        &self,
        id: &InvestmentId,
        patch: InvestmentPatch,
    ) -> RepoResult<Investment>;

    /// Apply a patch to many investments; returns how many were updated
    async fn bulk_update_investments(
        &self,
        ids: &[InvestmentId],
        patch: InvestmentPatch,
    ) -> RepoResult<usize>;

    /// Add to a user's running total-invested counter
    async fn increment_user_total_invested(&self, user_id: &UserId, amount: f64)
        -> RepoResult<()>;

    /// Load the global mining stats
    async fn load_mining_stats(&self) -> RepoResult<MiningStats>;

    /// Persist the global mining stats
    async fn store_mining_stats(&self, stats: MiningStats) -> RepoResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use vein_core::{UserId, VaultCatalog, VaultId};

    fn sample_investment(now: DateTime<Utc>) -> Investment {
        let catalog = VaultCatalog::builtin();
        let vault = catalog.vault(VaultId(3)).unwrap();
        Investment::new(UserId::generate(), vault, 10_000.0, 8.0, now)
    }

    #[test]
    fn test_filter_status() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let inv = sample_investment(now);

        assert!(InvestmentFilter::with_status(InvestmentStatus::Pending).matches(&inv));
        assert!(!InvestmentFilter::with_status(InvestmentStatus::Active).matches(&inv));
    }

    #[test]
    fn test_filter_created_bound_inclusive() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let inv = sample_investment(now);

        let at_bound = InvestmentFilter {
            created_on_or_before: Some(now),
            ..Default::default()
        };
        assert!(at_bound.matches(&inv));

        let before_bound = InvestmentFilter {
            created_on_or_before: Some(now - Duration::seconds(1)),
            ..Default::default()
        };
        assert!(!before_bound.matches(&inv));
    }

    #[test]
    fn test_filter_payout_due_requires_scheduled_date() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut inv = sample_investment(now);

        let due = InvestmentFilter {
            payout_due_by: Some(now + Duration::days(40)),
            ..Default::default()
        };

        // No scheduled payout: never due
        assert!(!due.matches(&inv));

        inv.next_payout_date = Some(now + Duration::days(30));
        assert!(due.matches(&inv));

        inv.next_payout_date = Some(now + Duration::days(50));
        assert!(!due.matches(&inv));
    }
}
