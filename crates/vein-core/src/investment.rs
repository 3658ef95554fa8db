//! Investment records
//!
//! An `Investment` is created at deposit confirmation with a frozen
//! `final_apy` and is mutated exclusively by the lifecycle batch passes and
//! (external) claim operations.

use crate::types::{InvestmentId, InvestmentStatus, UserId, VaultId};
use crate::vault::VaultDefinition;
use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

/// An auxiliary-token deposit attached to an investment
///
/// Immutable once the investment activates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoostRecord {
    /// Externally priced value of the deposited token
    pub market_value_usd: f64,

    /// APY contribution computed at creation
    pub additional_apy: f64,
}

/// A user's fixed-term position in a vault
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Investment {
    /// Unique identifier
    pub id: InvestmentId,

    /// Owning user
    pub user_id: UserId,

    /// Vault this position references (read-only)
    pub vault_id: VaultId,

    /// Deposit amount
    pub principal: f64,

    /// APY computed once at creation, frozen for the investment's life
    pub final_apy: f64,

    /// Lifecycle status (monotonic)
    pub status: InvestmentStatus,

    /// Term start
    pub start_date: DateTime<Utc>,

    /// Term end: `start_date` plus the vault duration in calendar months
    pub end_date: DateTime<Utc>,

    /// Creation time (activation delay counts from here)
    pub created_at: DateTime<Utc>,

    /// Watermark of the last yield credit or claim
    pub last_claim_date: Option<DateTime<Utc>>,

    /// Next scheduled payout; `None` once no payout fits before `end_date`
    pub next_payout_date: Option<DateTime<Utc>>,

    /// Accrued, unclaimed yield (never negative)
    pub pending_payout_balance: f64,

    /// KARAT boost deposit, if any
    pub karat_boost: Option<BoostRecord>,

    /// EMBER boost deposit, if any
    pub ember_boost: Option<BoostRecord>,
}

impl Investment {
    /// Create a pending investment at deposit confirmation
    pub fn new(
        user_id: UserId,
        vault: &VaultDefinition,
        principal: f64,
        final_apy: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: InvestmentId::generate(),
            user_id,
            vault_id: vault.id,
            principal,
            final_apy,
            status: InvestmentStatus::Pending,
            start_date: now,
            end_date: now + Months::new(vault.duration_months),
            created_at: now,
            last_claim_date: None,
            next_payout_date: None,
            pending_payout_balance: 0.0,
            karat_boost: None,
            ember_boost: None,
        }
    }

    /// Attach boost records computed at quote time
    pub fn with_boosts(
        mut self,
        karat: Option<BoostRecord>,
        ember: Option<BoostRecord>,
    ) -> Self {
        self.karat_boost = karat;
        self.ember_boost = ember;
        self
    }

    /// Whether the term has run out as of `now`
    pub fn is_matured(&self, now: DateTime<Utc>) -> bool {
        self.end_date <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoostTerms, PayoutSchedule, VaultTier};
    use chrono::TimeZone;

    fn sample_vault() -> VaultDefinition {
        VaultDefinition {
            id: VaultId(1),
            tier: VaultTier::Pro,
            duration_months: 12,
            payout_schedule: PayoutSchedule::Monthly,
            min_investment: 1_000.0,
            max_investment: 50_000.0,
            base_apy: 8.0,
            max_apy: 14.0,
            mining_power: 200.0,
            requires_karat: false,
            karat_ratio: None,
            boost_terms: BoostTerms::default(),
            is_active: true,
        }
    }

    #[test]
    fn test_new_investment_is_pending() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let inv = Investment::new(UserId::generate(), &sample_vault(), 10_000.0, 8.0, now);

        assert_eq!(inv.status, InvestmentStatus::Pending);
        assert_eq!(inv.start_date, now);
        assert_eq!(inv.created_at, now);
        assert_eq!(
            inv.end_date,
            Utc.with_ymd_and_hms(2027, 1, 15, 12, 0, 0).unwrap()
        );
        assert_eq!(inv.pending_payout_balance, 0.0);
        assert!(inv.next_payout_date.is_none());
        assert!(inv.last_claim_date.is_none());
    }

    #[test]
    fn test_maturity_boundary_inclusive() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let inv = Investment::new(UserId::generate(), &sample_vault(), 10_000.0, 8.0, now);

        assert!(!inv.is_matured(now));
        assert!(inv.is_matured(inv.end_date));
        assert!(inv.is_matured(inv.end_date + chrono::Duration::days(1)));
    }

    #[test]
    fn test_with_boosts() {
        let now = Utc::now();
        let karat = BoostRecord {
            market_value_usd: 250.0,
            additional_apy: 3.0,
        };
        let inv = Investment::new(UserId::generate(), &sample_vault(), 5_000.0, 11.0, now)
            .with_boosts(Some(karat), None);

        assert_eq!(inv.karat_boost, Some(karat));
        assert!(inv.ember_boost.is_none());
    }
}
