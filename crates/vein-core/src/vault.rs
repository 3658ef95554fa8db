//! Vault catalog
//!
//! The static, versioned table of vault definitions (tier x duration). The
//! catalog is an immutable configuration object built once at process start
//! and handed to consumers by reference or `Arc` - never a mutable
//! module-level singleton. Definitions may be soft-deactivated but are never
//! mutated once investments reference them.

use crate::error::{Result, VeinError};
use crate::types::{BoostTerms, PayoutSchedule, VaultId, VaultTier};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A fixed-term, fixed-tier investment product definition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VaultDefinition {
    /// Catalog identifier
    pub id: VaultId,

    /// Tier
    pub tier: VaultTier,

    /// Term length in calendar months
    pub duration_months: u32,

    /// Payout cadence
    pub payout_schedule: PayoutSchedule,

    /// Minimum principal
    pub min_investment: f64,

    /// Maximum principal
    pub max_investment: f64,

    /// APY with no boost applied
    pub base_apy: f64,

    /// APY ceiling with full boost
    pub max_apy: f64,

    /// Relative mining weight (baseline 100)
    pub mining_power: f64,

    /// Whether a proportional KARAT deposit is mandatory
    #[serde(default)]
    pub requires_karat: bool,

    /// Units of KARAT required per 100 units of principal
    #[serde(default)]
    pub karat_ratio: Option<f64>,

    /// Boost economics for this vault
    #[serde(default)]
    pub boost_terms: BoostTerms,

    /// Soft-deactivation flag; inactive vaults accept no new deposits
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

impl VaultDefinition {
    /// Check the definition's invariants
    pub fn validate(&self) -> Result<()> {
        if self.max_apy < self.base_apy {
            return Err(VeinError::ApyBoundsInverted {
                id: self.id,
                base_apy: self.base_apy,
                max_apy: self.max_apy,
            });
        }
        if self.min_investment > self.max_investment {
            return Err(VeinError::InvestmentBoundsInverted {
                id: self.id,
                min: self.min_investment,
                max: self.max_investment,
            });
        }
        if self.requires_karat && self.karat_ratio.map_or(true, |r| r <= 0.0) {
            return Err(VeinError::MissingKaratRatio { id: self.id });
        }
        Ok(())
    }
}

/// Immutable table of vault definitions, keyed by id
#[derive(Clone, Debug)]
pub struct VaultCatalog {
    vaults: BTreeMap<VaultId, VaultDefinition>,
}

impl VaultCatalog {
    /// Build a catalog, validating every definition and rejecting duplicates
    pub fn new(definitions: Vec<VaultDefinition>) -> Result<Self> {
        let mut vaults = BTreeMap::new();
        for def in definitions {
            def.validate()?;
            if vaults.insert(def.id, def.clone()).is_some() {
                return Err(VeinError::DuplicateVault(def.id));
            }
        }
        Ok(Self { vaults })
    }

    /// The built-in default catalog with default boost terms
    pub fn builtin() -> Self {
        BUILTIN_CATALOG.clone()
    }

    /// The built-in default catalog with platform-wide boost terms applied
    pub fn builtin_with_terms(terms: BoostTerms) -> Self {
        let mut catalog = BUILTIN_CATALOG.clone();
        for def in catalog.vaults.values_mut() {
            def.boost_terms = terms;
        }
        catalog
    }

    /// Look up a vault definition
    pub fn vault(&self, id: VaultId) -> Result<&VaultDefinition> {
        self.vaults.get(&id).ok_or(VeinError::VaultNotFound(id))
    }

    /// Iterate over all definitions in id order
    pub fn all_vaults(&self) -> impl Iterator<Item = &VaultDefinition> {
        self.vaults.values()
    }

    /// Iterate over definitions still open for deposits
    pub fn active_vaults(&self) -> impl Iterator<Item = &VaultDefinition> {
        self.vaults.values().filter(|v| v.is_active)
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.vaults.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.vaults.is_empty()
    }

    /// KARAT units the vault demands for a given principal
    ///
    /// Zero when the vault has no KARAT requirement.
    pub fn required_karat_amount(&self, id: VaultId, principal: f64) -> Result<f64> {
        let vault = self.vault(id)?;
        if !vault.requires_karat {
            return Ok(0.0);
        }
        let ratio = vault.karat_ratio.unwrap_or(0.0);
        Ok((principal / 100.0) * ratio)
    }

    /// Check a deposit amount against the vault's principal bounds
    pub fn validate_principal(&self, id: VaultId, amount: f64) -> Result<()> {
        let vault = self.vault(id)?;
        if amount < vault.min_investment {
            return Err(VeinError::BelowMinimumInvestment {
                amount,
                minimum: vault.min_investment,
            });
        }
        if amount > vault.max_investment {
            return Err(VeinError::AboveMaximumInvestment {
                amount,
                maximum: vault.max_investment,
            });
        }
        Ok(())
    }
}

/// Built-in tier x duration table
static BUILTIN_CATALOG: Lazy<VaultCatalog> = Lazy::new(|| {
    VaultCatalog::new(builtin_definitions()).expect("builtin catalog must be valid")
});

fn builtin_definitions() -> Vec<VaultDefinition> {
    vec![
        VaultDefinition {
            id: VaultId(1),
            tier: VaultTier::Starter,
            duration_months: 3,
            payout_schedule: PayoutSchedule::Monthly,
            min_investment: 100.0,
            max_investment: 10_000.0,
            base_apy: 5.0,
            max_apy: 8.0,
            mining_power: 100.0,
            requires_karat: false,
            karat_ratio: None,
            boost_terms: BoostTerms::default(),
            is_active: true,
        },
        VaultDefinition {
            id: VaultId(2),
            tier: VaultTier::Starter,
            duration_months: 6,
            payout_schedule: PayoutSchedule::Monthly,
            min_investment: 100.0,
            max_investment: 10_000.0,
            base_apy: 6.0,
            max_apy: 10.0,
            mining_power: 110.0,
            requires_karat: false,
            karat_ratio: None,
            boost_terms: BoostTerms::default(),
            is_active: true,
        },
        VaultDefinition {
            id: VaultId(3),
            tier: VaultTier::Pro,
            duration_months: 12,
            payout_schedule: PayoutSchedule::Monthly,
            min_investment: 1_000.0,
            max_investment: 50_000.0,
            base_apy: 8.0,
            max_apy: 14.0,
            mining_power: 200.0,
            requires_karat: true,
            karat_ratio: Some(5.0),
            boost_terms: BoostTerms::default(),
            is_active: true,
        },
        VaultDefinition {
            id: VaultId(4),
            tier: VaultTier::Pro,
            duration_months: 12,
            payout_schedule: PayoutSchedule::Quarterly,
            min_investment: 1_000.0,
            max_investment: 50_000.0,
            base_apy: 8.5,
            max_apy: 14.5,
            mining_power: 200.0,
            requires_karat: true,
            karat_ratio: Some(5.0),
            boost_terms: BoostTerms::default(),
            is_active: true,
        },
        VaultDefinition {
            id: VaultId(5),
            tier: VaultTier::Elite,
            duration_months: 24,
            payout_schedule: PayoutSchedule::Monthly,
            min_investment: 10_000.0,
            max_investment: 250_000.0,
            base_apy: 10.0,
            max_apy: 18.0,
            mining_power: 350.0,
            requires_karat: true,
            karat_ratio: Some(10.0),
            boost_terms: BoostTerms::default(),
            is_active: true,
        },
        VaultDefinition {
            id: VaultId(6),
            tier: VaultTier::Elite,
            duration_months: 36,
            payout_schedule: PayoutSchedule::EndOfTerm,
            min_investment: 25_000.0,
            max_investment: 1_000_000.0,
            base_apy: 12.0,
            max_apy: 20.0,
            mining_power: 350.0,
            requires_karat: true,
            karat_ratio: Some(10.0),
            boost_terms: BoostTerms::default(),
            is_active: true,
        },
    ]
}
