//! Fundamental identifier and enum types shared across the platform

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default valuation multiplier applied to an auxiliary token's market value
/// when computing boost eligibility (the "x2" scheme).
///
/// This is a deliberate economic parameter, not a derived constant: vaults may
/// override it through [`BoostTerms`], and it must never be duplicated as a
/// literal elsewhere.
pub const DEFAULT_VALUATION_MULTIPLIER: f64 = 2.0;

/// Default fraction of principal that caps the usable boost value (50%).
pub const DEFAULT_CAP_FRACTION: f64 = 0.5;

/// Identifier of a vault definition in the static catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VaultId(pub u32);

impl fmt::Display for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vault-{}", self.0)
    }
}

/// Unique investment identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvestmentId(pub Uuid);

impl InvestmentId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for InvestmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique user identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vault tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultTier {
    /// Entry tier, small principals
    Starter,
    /// Mid tier, KARAT deposit required
    Pro,
    /// Top tier, highest APY ceiling and mining weight
    Elite,
}

impl VaultTier {
    /// Human-readable tier name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Starter => "Starter",
            Self::Pro => "Pro",
            Self::Elite => "Elite",
        }
    }
}

impl fmt::Display for VaultTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cadence at which accrued yield becomes claimable
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutSchedule {
    /// One payout per day
    Daily,
    /// One payout per calendar month
    Monthly,
    /// One payout per calendar quarter
    Quarterly,
    /// Single payout at maturity
    EndOfTerm,
}

impl fmt::Display for PayoutSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::EndOfTerm => "end_of_term",
        };
        f.write_str(s)
    }
}

/// Investment lifecycle status
///
/// Transitions are strictly monotonic: `Pending -> Active -> Completed`.
/// A status never regresses and `Completed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    /// Created at deposit time, waiting out the activation delay
    Pending,
    /// Earning yield and mining rewards
    Active,
    /// Reached maturity
    Completed,
}

impl InvestmentStatus {
    /// Whether moving from `self` to `next` is a legal forward transition
    pub fn can_transition_to(self, next: InvestmentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Active) | (Self::Active, Self::Completed)
        )
    }

    /// Whether this status admits no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Economic parameters governing how auxiliary-token deposits convert into
/// APY boost, attached to each vault definition
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoostTerms {
    /// Rate at which one unit of market value counts toward boost eligibility
    #[serde(default = "default_valuation_multiplier")]
    pub valuation_multiplier: f64,

    /// Fraction of principal that caps the usable boost value
    #[serde(default = "default_cap_fraction")]
    pub cap_fraction: f64,
}

fn default_valuation_multiplier() -> f64 {
    DEFAULT_VALUATION_MULTIPLIER
}

fn default_cap_fraction() -> f64 {
    DEFAULT_CAP_FRACTION
}

impl Default for BoostTerms {
    fn default() -> Self {
        Self {
            valuation_multiplier: DEFAULT_VALUATION_MULTIPLIER,
            cap_fraction: DEFAULT_CAP_FRACTION,
        }
    }
}
