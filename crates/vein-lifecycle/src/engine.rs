//! Lifecycle engine
//!
//! Owns the four batch passes. Each pass is one sequential, single-threaded
//! sweep over a filtered selection: a per-item failure is logged with the
//! investment id and counted, never aborting the loop; only a failed
//! selection query is fatal to the pass. Re-running a pass against
//! unchanged data produces no additional side effects (at-least-once
//! semantics over a crash/restart).

use crate::repository::{InvestmentFilter, InvestmentPatch, InvestmentRepository, RepositoryError};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use vein_core::{Clock, Investment, InvestmentStatus, VaultCatalog, VeinError};
use vein_engine::{accrual, MiningParams};

/// Result type alias for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Pass-fatal errors
///
/// Per-item repository failures are absorbed into [`PassSummary::failed`];
/// only selection-query and stats-store failures surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    /// Persistence failure on the pass itself
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Catalog inconsistency
    #[error(transparent)]
    Vault(#[from] VeinError),
}

/// Tunables for the lifecycle passes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LifecycleConfig {
    /// Waiting period between creation and activation eligibility
    pub activation_delay: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            activation_delay: Duration::hours(72),
        }
    }
}

/// Observability summary returned by every pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Records matched by the selection
    pub scanned: usize,
    /// Records changed
    pub updated: usize,
    /// Records skipped after a per-item failure
    pub failed: usize,
}

/// Drives investments through their lifecycle
pub struct LifecycleEngine {
    repository: Arc<dyn InvestmentRepository>,
    catalog: Arc<VaultCatalog>,
    clock: Arc<dyn Clock>,
    config: LifecycleConfig,
    mining_params: MiningParams,
}

impl LifecycleEngine {
    /// Wire up an engine
    pub fn new(
        repository: Arc<dyn InvestmentRepository>,
        catalog: Arc<VaultCatalog>,
        clock: Arc<dyn Clock>,
        config: LifecycleConfig,
        mining_params: MiningParams,
    ) -> Self {
        Self {
            repository,
            catalog,
            clock,
            config,
            mining_params,
        }
    }

    /// Activate pending investments past the activation delay
    ///
    /// The threshold is inclusive: an investment created exactly
    /// `activation_delay` ago is eligible.
    pub async fn run_activation_pass(&self) -> Result<PassSummary> {
        let now = self.clock.now();
        let cutoff = now - self.config.activation_delay;
        let filter = InvestmentFilter {
            status: Some(InvestmentStatus::Pending),
            created_on_or_before: Some(cutoff),
            ..Default::default()
        };

        let candidates = self.repository.find_investments(&filter).await?;
        let mut summary = PassSummary {
            scanned: candidates.len(),
            ..Default::default()
        };

        for inv in &candidates {
            match self.activate_one(inv).await {
                Ok(()) => summary.updated += 1,
                Err(e) => {
                    warn!("activation failed for {}: {}", inv.id, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "activation pass: scanned={} updated={} failed={}",
            summary.scanned, summary.updated, summary.failed
        );
        Ok(summary)
    }

    async fn activate_one(&self, inv: &Investment) -> Result<()> {
        let vault = self.catalog.vault(inv.vault_id)?;
        let first_payout = accrual::next_payout_date(
            inv.start_date,
            inv.end_date,
            vault.payout_schedule,
            None,
        );

        let patch = InvestmentPatch {
            status: Some(InvestmentStatus::Active),
            next_payout_date: Some(Some(first_payout)),
            expect_status: Some(InvestmentStatus::Pending),
            ..Default::default()
        };
        self.repository.update_investment(&inv.id, patch).await?;
        self.repository
            .increment_user_total_invested(&inv.user_id, inv.principal)
            .await?;

        debug!(
            "activated {} (first payout {})",
            inv.id,
            first_payout.to_rfc3339()
        );
        Ok(())
    }

    /// Credit accrued yield on every active investment with a payout due
    pub async fn run_payout_pass(&self) -> Result<PassSummary> {
        let now = self.clock.now();
        let filter = InvestmentFilter {
            status: Some(InvestmentStatus::Active),
            payout_due_by: Some(now),
            ..Default::default()
        };

        let candidates = self.repository.find_investments(&filter).await?;
        let mut summary = PassSummary {
            scanned: candidates.len(),
            ..Default::default()
        };

        for inv in &candidates {
            match self.distribute_one(inv, now).await {
                Ok(true) => summary.updated += 1,
                // Zero accrued earnings is a legitimate, silent no-op
                Ok(false) => {}
                Err(e) => {
                    warn!("payout distribution failed for {}: {}", inv.id, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "payout pass: scanned={} updated={} failed={}",
            summary.scanned, summary.updated, summary.failed
        );
        Ok(summary)
    }

    async fn distribute_one(&self, inv: &Investment, now: DateTime<Utc>) -> Result<bool> {
        let vault = self.catalog.vault(inv.vault_id)?;

        let earned = accrual::pending_earnings_since(
            inv.principal,
            inv.final_apy,
            inv.start_date,
            now,
            inv.last_claim_date,
        );
        if earned <= 0.0 {
            debug!("no earnings accrued yet for {}", inv.id);
            return Ok(false);
        }

        // The selection guarantees a scheduled date; a record without one
        // has nothing to advance.
        let Some(due) = inv.next_payout_date else {
            return Ok(false);
        };
        let advanced = accrual::advance_payout_date(due, inv.end_date, vault.payout_schedule);

        let patch = InvestmentPatch {
            next_payout_date: Some(advanced),
            last_claim_date: Some(now),
            add_pending_payout: Some(earned),
            expect_status: Some(InvestmentStatus::Active),
            ..Default::default()
        };
        self.repository.update_investment(&inv.id, patch).await?;

        debug!(
            "credited {:.4} to {} (next payout: {:?})",
            earned, inv.id, advanced
        );
        Ok(true)
    }

    /// Flip matured active investments to completed
    ///
    /// A pure status flip: final earnings were already accrued by the payout
    /// pass or are settled by the external claim process.
    pub async fn run_completion_pass(&self) -> Result<PassSummary> {
        let now = self.clock.now();
        let filter = InvestmentFilter {
            status: Some(InvestmentStatus::Active),
            ended_by: Some(now),
            ..Default::default()
        };

        let matured = self.repository.find_investments(&filter).await?;
        let mut summary = PassSummary {
            scanned: matured.len(),
            ..Default::default()
        };
        if matured.is_empty() {
            return Ok(summary);
        }

        let ids: Vec<_> = matured.iter().map(|i| i.id).collect();
        let patch = InvestmentPatch {
            status: Some(InvestmentStatus::Completed),
            expect_status: Some(InvestmentStatus::Active),
            ..Default::default()
        };
        summary.updated = self.repository.bulk_update_investments(&ids, patch).await?;
        summary.failed = summary.scanned - summary.updated;

        info!(
            "completion pass: scanned={} updated={} failed={}",
            summary.scanned, summary.updated, summary.failed
        );
        Ok(summary)
    }

    /// Recompute the global mining difficulty from cumulative supply and the
    /// active miner population
    pub async fn run_difficulty_refresh(&self) -> Result<PassSummary> {
        let now = self.clock.now();
        let mut stats = self.repository.load_mining_stats().await?;

        let miners = self
            .repository
            .count_investments(&InvestmentFilter::with_status(InvestmentStatus::Active))
            .await?;
        stats.active_miner_count = miners as u64;
        stats.refresh(&self.mining_params, now);

        info!(
            "difficulty refresh: miners={} total_mined={:.2} difficulty={:.4}",
            stats.active_miner_count, stats.total_mined_to_date, stats.current_difficulty
        );
        self.repository.store_mining_stats(stats).await?;

        Ok(PassSummary {
            scanned: miners,
            updated: 1,
            failed: 0,
        })
    }
}
