//! Error types for Vein core operations

use crate::types::{InvestmentId, VaultId};
use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, VeinError>;

/// Errors that can occur in Vein core operations
///
/// Validation variants carry the offending field and the violated bound so
/// the API layer can surface the message verbatim in quote/preview UIs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VeinError {
    // === Catalog ===
    /// Vault id not present in the catalog
    #[error("vault not found: {0}")]
    VaultNotFound(VaultId),

    /// Two definitions share an id
    #[error("duplicate vault id: {0}")]
    DuplicateVault(VaultId),

    /// Definition violates `max_apy >= base_apy`
    #[error("{id}: max_apy {max_apy} must not be below base_apy {base_apy}")]
    ApyBoundsInverted {
        id: VaultId,
        base_apy: f64,
        max_apy: f64,
    },

    /// Definition violates `min_investment <= max_investment`
    #[error("{id}: min_investment {min} must not exceed max_investment {max}")]
    InvestmentBoundsInverted { id: VaultId, min: f64, max: f64 },

    /// Vault requires KARAT but carries no ratio, or a non-positive one
    #[error("{id}: karat_ratio must be greater than 0 when requires_karat is set")]
    MissingKaratRatio { id: VaultId },

    // === Principal validation ===
    /// Deposit below the vault minimum
    #[error("principal {amount} is below the vault minimum of {minimum}")]
    BelowMinimumInvestment { amount: f64, minimum: f64 },

    /// Deposit above the vault maximum
    #[error("principal {amount} is above the vault maximum of {maximum}")]
    AboveMaximumInvestment { amount: f64, maximum: f64 },

    // === Investment ===
    /// Investment id not found
    #[error("investment not found: {0}")]
    InvestmentNotFound(InvestmentId),

    /// Attempted status regression or skip
    #[error("illegal status transition for {id}: {from} -> {to}")]
    IllegalTransition {
        id: InvestmentId,
        from: crate::types::InvestmentStatus,
        to: crate::types::InvestmentStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_bound() {
        let err = VeinError::BelowMinimumInvestment {
            amount: 50.0,
            minimum: 100.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("50"));
        assert!(msg.contains("minimum of 100"));

        let err = VeinError::AboveMaximumInvestment {
            amount: 20_000.0,
            maximum: 10_000.0,
        };
        assert!(err.to_string().contains("maximum of 10000"));
    }

    #[test]
    fn test_vault_not_found_display() {
        let err = VeinError::VaultNotFound(VaultId(9));
        assert_eq!(err.to_string(), "vault not found: vault-9");
    }
}
