//! # ORE Mining Rewards
//!
//! Investments mine the ORE reward token alongside their yield. Issuance is
//! governed by a global difficulty scalar that rises with cumulative supply
//! mined and with the active miner population:
//!
//! ```text
//! difficulty = 1 + supply_weight * (total_mined / supply_cap)
//!                + miner_weight  * ln(1 + active_miners)
//! ```
//!
//! Both terms are strictly increasing, the floor is 1, and the growth stays
//! a small single-digit multiple even at 90% of supply mined with a large
//! miner population (supply term tops out at `supply_weight`, the log term
//! grows slower than any power of the count).
//!
//! All projections use a 30-day month. That convention is a deliberate
//! simplification shared with the payout-count math; realized issuance is
//! settled day by day.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for mining operations
pub type Result<T> = std::result::Result<T, MiningError>;

/// Days per month used by all forward projections
pub const PROJECTION_DAYS_PER_MONTH: f64 = 30.0;

/// Mining validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MiningError {
    /// An input that must be strictly positive was not
    #[error("{field} must be greater than 0")]
    NonPositive { field: &'static str },
}

/// Difficulty-curve and issuance coefficients
///
/// Explicit, documented parameters; never duplicated as literals elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MiningParams {
    /// ORE per day for a baseline-power, baseline-principal investment
    #[serde(default = "default_daily_rate")]
    pub daily_rate_per_baseline: f64,

    /// Mining power normalization baseline
    #[serde(default = "default_power_baseline")]
    pub power_baseline: f64,

    /// Principal normalization baseline
    #[serde(default = "default_principal_baseline")]
    pub principal_baseline: f64,

    /// Total ORE that can ever be mined
    #[serde(default = "default_supply_cap")]
    pub supply_cap: f64,

    /// Weight of the supply-fraction term in the difficulty curve
    #[serde(default = "default_supply_weight")]
    pub supply_weight: f64,

    /// Weight of the miner-count term in the difficulty curve
    #[serde(default = "default_miner_weight")]
    pub miner_weight: f64,
}

fn default_daily_rate() -> f64 {
    10.0
}

fn default_power_baseline() -> f64 {
    100.0
}

fn default_principal_baseline() -> f64 {
    1_000.0
}

fn default_supply_cap() -> f64 {
    210_000_000.0
}

fn default_supply_weight() -> f64 {
    4.0
}

fn default_miner_weight() -> f64 {
    0.35
}

impl Default for MiningParams {
    fn default() -> Self {
        Self {
            daily_rate_per_baseline: default_daily_rate(),
            power_baseline: default_power_baseline(),
            principal_baseline: default_principal_baseline(),
            supply_cap: default_supply_cap(),
            supply_weight: default_supply_weight(),
            miner_weight: default_miner_weight(),
        }
    }
}

/// Global mining state, recomputed by the periodic difficulty-refresh pass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MiningStats {
    /// Cumulative ORE issued
    pub total_mined_to_date: f64,

    /// Investments currently mining
    pub active_miner_count: u64,

    /// Cached difficulty derived from the two fields above
    pub current_difficulty: f64,

    /// When the cache was last refreshed
    pub updated_at: DateTime<Utc>,
}

impl MiningStats {
    /// Fresh stats with nothing mined and difficulty at the floor
    pub fn genesis(now: DateTime<Utc>) -> Self {
        Self {
            total_mined_to_date: 0.0,
            active_miner_count: 0,
            current_difficulty: 1.0,
            updated_at: now,
        }
    }

    /// Record newly issued ORE
    pub fn record_mined(&mut self, amount: f64) {
        self.total_mined_to_date += amount.max(0.0);
    }

    /// Recompute and cache the difficulty from the current state
    pub fn refresh(&mut self, params: &MiningParams, now: DateTime<Utc>) {
        self.current_difficulty =
            compute_difficulty(params, self.total_mined_to_date, self.active_miner_count);
        self.updated_at = now;
    }
}

/// Projected ORE issuance for one investment
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MiningProjection {
    /// Daily issuance before difficulty
    pub daily_raw: f64,
    /// Daily issuance after the difficulty divisor
    pub daily_final: f64,
    /// Projected monthly issuance (30-day month)
    pub monthly: f64,
    /// Projected issuance over the full term
    pub total_expected: f64,
}

/// Global difficulty from cumulative supply and miner count
///
/// Strictly increasing in both inputs independently, floored at 1.
pub fn compute_difficulty(params: &MiningParams, total_mined: f64, active_miners: u64) -> f64 {
    let supply_fraction = (total_mined / params.supply_cap).max(0.0);
    let supply_term = params.supply_weight * supply_fraction;
    let miner_term = params.miner_weight * (1.0 + active_miners as f64).ln();
    (1.0 + supply_term + miner_term).max(1.0)
}

/// Daily issuance before difficulty, proportional to mining power and
/// principal against their baselines
pub fn base_daily_rate(params: &MiningParams, mining_power: f64, principal: f64) -> f64 {
    params.daily_rate_per_baseline
        * (mining_power / params.power_baseline)
        * (principal / params.principal_baseline)
}

/// Full issuance projection for one investment
pub fn compute_mining(
    params: &MiningParams,
    mining_power: f64,
    principal: f64,
    difficulty: f64,
    duration_months: u32,
) -> Result<MiningProjection> {
    if mining_power <= 0.0 {
        return Err(MiningError::NonPositive {
            field: "mining_power",
        });
    }
    if principal <= 0.0 {
        return Err(MiningError::NonPositive { field: "principal" });
    }
    if difficulty <= 0.0 {
        return Err(MiningError::NonPositive {
            field: "difficulty",
        });
    }
    if duration_months == 0 {
        return Err(MiningError::NonPositive {
            field: "duration_months",
        });
    }

    let daily_raw = base_daily_rate(params, mining_power, principal);
    let daily_final = daily_raw / difficulty;
    let monthly = daily_final * PROJECTION_DAYS_PER_MONTH;
    let total_expected = monthly * duration_months as f64;

    Ok(MiningProjection {
        daily_raw,
        daily_final,
        monthly,
        total_expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_elite_vault_scenario() {
        // power 350, principal 50,000, difficulty 1.0, 36 months
        let params = MiningParams::default();
        let proj = compute_mining(&params, 350.0, 50_000.0, 1.0, 36).unwrap();

        assert_eq!(proj.daily_raw, 1_750.0);
        assert_eq!(proj.daily_final, 1_750.0);
        assert_eq!(proj.monthly, 52_500.0);
        assert_eq!(proj.total_expected, 1_890_000.0);
    }

    #[test]
    fn test_difficulty_divides_rate() {
        let params = MiningParams::default();
        let proj = compute_mining(&params, 100.0, 1_000.0, 2.0, 12).unwrap();

        assert_eq!(proj.daily_raw, 10.0);
        assert_eq!(proj.daily_final, 5.0);
    }

    #[test]
    fn test_difficulty_floor() {
        let params = MiningParams::default();
        assert_eq!(compute_difficulty(&params, 0.0, 0), 1.0);
        // Negative supply input never pulls below the floor
        assert_eq!(compute_difficulty(&params, -500.0, 0), 1.0);
    }

    #[test]
    fn test_difficulty_bounded_growth() {
        let params = MiningParams::default();

        // 90% of supply mined, one million miners: small single-digit multiple
        let d = compute_difficulty(&params, 0.9 * params.supply_cap, 1_000_000);
        assert!(d > 1.0);
        assert!(d < 10.0, "difficulty {d} grew beyond the plausible bound");
    }

    #[test]
    fn test_validation_names_field() {
        let params = MiningParams::default();

        let err = compute_mining(&params, 0.0, 1_000.0, 1.0, 12).unwrap_err();
        assert_eq!(err.to_string(), "mining_power must be greater than 0");

        let err = compute_mining(&params, 100.0, -5.0, 1.0, 12).unwrap_err();
        assert_eq!(err.to_string(), "principal must be greater than 0");

        let err = compute_mining(&params, 100.0, 1_000.0, 0.0, 12).unwrap_err();
        assert_eq!(err.to_string(), "difficulty must be greater than 0");

        let err = compute_mining(&params, 100.0, 1_000.0, 1.0, 0).unwrap_err();
        assert_eq!(err.to_string(), "duration_months must be greater than 0");
    }

    #[test]
    fn test_stats_refresh_caches_difficulty() {
        let params = MiningParams::default();
        let now = Utc::now();
        let mut stats = MiningStats::genesis(now);

        stats.record_mined(params.supply_cap / 2.0);
        stats.active_miner_count = 1_000;
        stats.refresh(&params, now);

        assert_eq!(
            stats.current_difficulty,
            compute_difficulty(&params, params.supply_cap / 2.0, 1_000)
        );
        assert_eq!(stats.updated_at, now);
    }

    proptest! {
        #[test]
        fn prop_difficulty_increases_in_supply(
            total in 0.0f64..200_000_000.0,
            step in 1.0f64..10_000_000.0,
            miners in 0u64..1_000_000,
        ) {
            let params = MiningParams::default();
            let lo = compute_difficulty(&params, total, miners);
            let hi = compute_difficulty(&params, total + step, miners);
            prop_assert!(hi > lo);
        }

        #[test]
        fn prop_difficulty_increases_in_miners(
            total in 0.0f64..200_000_000.0,
            miners in 0u64..1_000_000,
            step in 1u64..100_000,
        ) {
            let params = MiningParams::default();
            let lo = compute_difficulty(&params, total, miners);
            let hi = compute_difficulty(&params, total, miners + step);
            prop_assert!(hi > lo);
        }

        #[test]
        fn prop_rate_linear_in_principal(
            power in 1.0f64..1_000.0,
            principal in 1.0f64..1_000_000.0,
        ) {
            let params = MiningParams::default();
            let one = base_daily_rate(&params, power, principal);
            let two = base_daily_rate(&params, power, principal * 2.0);
            prop_assert!((two - one * 2.0).abs() < 1e-6 * one.max(1.0));
        }
    }
}
