//! In-memory repository
//!
//! The store the node runs standalone with and the test suite drives. Every
//! patch is applied under a single write lock, which gives the same
//! "conditional update is atomic" behavior the engine expects from a
//! single-row CAS in a relational store.

use crate::repository::{
    InvestmentFilter, InvestmentPatch, InvestmentRepository, RepoResult, RepositoryError,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use vein_core::{Investment, InvestmentId, UserId};
use vein_engine::MiningStats;

/// `HashMap`-backed implementation of [`InvestmentRepository`]
#[derive(Default)]
pub struct MemoryRepository {
    investments: RwLock<HashMap<InvestmentId, Investment>>,
    user_totals: RwLock<HashMap<UserId, f64>>,
    mining_stats: RwLock<Option<MiningStats>>,
}

impl MemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// A user's running total-invested counter (test observability)
    pub fn user_total_invested(&self, user_id: &UserId) -> f64 {
        self.user_totals.read().get(user_id).copied().unwrap_or(0.0)
    }

    /// Fetch one investment by id
    pub fn get(&self, id: &InvestmentId) -> Option<Investment> {
        self.investments.read().get(id).cloned()
    }

    fn apply_patch(
        inv: &mut Investment,
        id: &InvestmentId,
        patch: &InvestmentPatch,
    ) -> RepoResult<()> {
        if let Some(expected) = patch.expect_status {
            if inv.status != expected {
                return Err(RepositoryError::Conflict {
                    id: *id,
                    expected,
                    actual: inv.status,
                });
            }
        }
        if let Some(next) = patch.status {
            if !inv.status.can_transition_to(next) {
                return Err(RepositoryError::IllegalTransition {
                    id: *id,
                    from: inv.status,
                    to: next,
                });
            }
            inv.status = next;
        }
        if let Some(next_payout) = patch.next_payout_date {
            inv.next_payout_date = next_payout;
        }
        if let Some(claim) = patch.last_claim_date {
            inv.last_claim_date = Some(claim);
        }
        if let Some(amount) = patch.add_pending_payout {
            inv.pending_payout_balance += amount;
        }
        Ok(())
    }
}

#[async_trait]
impl InvestmentRepository for MemoryRepository {
    async fn find_investments(&self, filter: &InvestmentFilter) -> RepoResult<Vec<Investment>> {
        let store = self.investments.read();
        let mut matched: Vec<Investment> =
            store.values().filter(|i| filter.matches(i)).cloned().collect();
        // Deterministic pass order
        matched.sort_by_key(|i| (i.created_at, i.id.0));
        Ok(matched)
    }

    async fn count_investments(&self, filter: &InvestmentFilter) -> RepoResult<usize> {
        let store = self.investments.read();
        Ok(store.values().filter(|i| filter.matches(i)).count())
    }

    async fn insert_investment(&self, investment: Investment) -> RepoResult<()> {
        self.investments.write().insert(investment.id, investment);
        Ok(())
    }

    async fn update_investment(
        &self,
        id: &InvestmentId,
        patch: InvestmentPatch,
    ) -> RepoResult<Investment> {
        let mut store = self.investments.write();
        let inv = store.get_mut(id).ok_or(RepositoryError::NotFound(*id))?;
        Self::apply_patch(inv, id, &patch)?;
        Ok(inv.clone())
    }

    async fn bulk_update_investments(
        &self,
        ids: &[InvestmentId],
        patch: InvestmentPatch,
    ) -> RepoResult<usize> {
        let mut store = self.investments.write();
        let mut updated = 0;
        for id in ids {
            if let Some(inv) = store.get_mut(id) {
                if Self::apply_patch(inv, id, &patch).is_ok() {
                    updated += 1;
                }
            }
        }
        Ok(updated)
    }

    async fn increment_user_total_invested(
        &self,
        user_id: &UserId,
        amount: f64,
    ) -> RepoResult<()> {
        *self.user_totals.write().entry(*user_id).or_insert(0.0) += amount;
        Ok(())
    }

    async fn load_mining_stats(&self) -> RepoResult<MiningStats> {
        let mut stats = self.mining_stats.write();
        Ok(stats
            .get_or_insert_with(|| MiningStats::genesis(Utc::now()))
            .clone())
    }

    async fn store_mining_stats(&self, stats: MiningStats) -> RepoResult<()> {
        *self.mining_stats.write() = Some(stats);
        Ok(())
    }
}
