//! Investment quotes
//!
//! Composes the catalog, boost, accrual, and mining calculators into the
//! preview an HTTP layer (or the CLI) surfaces before a deposit is
//! confirmed. Pure: nothing here touches persistence.

use crate::accrual;
use crate::boost::{self, BoostComposition, BoostError, BoostWarning};
use crate::mining::{self, MiningError, MiningParams, MiningProjection};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vein_core::{PayoutSchedule, VaultCatalog, VaultId, VaultTier, VeinError};

/// Errors a quote request can fail with
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    /// Catalog lookup or principal validation failure
    #[error(transparent)]
    Vault(#[from] VeinError),

    /// Boost input validation failure
    #[error(transparent)]
    Boost(#[from] BoostError),

    /// Mining input validation failure
    #[error(transparent)]
    Mining(#[from] MiningError),
}

/// Inputs to a quote
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Target vault
    pub vault_id: VaultId,
    /// Deposit amount
    pub principal: f64,
    /// Market value of the KARAT deposit, if any
    pub karat_market_value_usd: Option<f64>,
    /// Market value of the EMBER deposit, if any
    pub ember_market_value_usd: Option<f64>,
}

/// Full projection for a prospective investment
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InvestmentQuote {
    /// Vault quoted against
    pub vault_id: VaultId,
    /// Vault tier
    pub tier: VaultTier,
    /// Term length
    pub duration_months: u32,
    /// Payout cadence
    pub payout_schedule: PayoutSchedule,
    /// Deposit amount
    pub principal: f64,
    /// KARAT the vault demands for this principal (0 when optional)
    pub required_karat: f64,
    /// APY with no boost
    pub base_apy: f64,
    /// APY after boosts, frozen onto the investment at creation
    pub final_apy: f64,
    /// Boost breakdown
    pub boost: BoostComposition,
    /// Simple interest over the full term
    pub total_earnings: f64,
    /// Number of payouts over the term
    pub payout_count: u32,
    /// Projected size of each payout
    pub payout_amount: f64,
    /// Projected ORE issuance
    pub mining: MiningProjection,
    /// Advisories collected from the boost stages
    pub warnings: Vec<BoostWarning>,
}

/// Build a quote against the catalog and the current mining difficulty
pub fn build_quote(
    catalog: &VaultCatalog,
    params: &MiningParams,
    difficulty: f64,
    request: &QuoteRequest,
) -> Result<InvestmentQuote, QuoteError> {
    let vault = catalog.vault(request.vault_id)?;
    catalog.validate_principal(request.vault_id, request.principal)?;

    let boost = boost::compose_boosts(
        vault.base_apy,
        vault.max_apy,
        request.principal,
        request.karat_market_value_usd,
        request.ember_market_value_usd,
        &vault.boost_terms,
    )?;
    let final_apy = boost.final_apy;

    let mut warnings = Vec::new();
    if let Some(q) = &boost.karat {
        warnings.extend(q.warnings.iter().copied());
    }
    if let Some(q) = &boost.ember {
        warnings.extend(q.warnings.iter().copied());
    }

    let mining = mining::compute_mining(
        params,
        vault.mining_power,
        request.principal,
        difficulty,
        vault.duration_months,
    )?;

    let total_earnings =
        accrual::simple_interest_earnings(request.principal, final_apy, vault.duration_months);
    let payout_count = accrual::number_of_payouts(vault.duration_months, vault.payout_schedule);
    let payout_amount = accrual::payout_amount(
        request.principal,
        final_apy,
        vault.duration_months,
        vault.payout_schedule,
    );

    Ok(InvestmentQuote {
        vault_id: vault.id,
        tier: vault.tier,
        duration_months: vault.duration_months,
        payout_schedule: vault.payout_schedule,
        principal: request.principal,
        required_karat: catalog.required_karat_amount(request.vault_id, request.principal)?,
        base_apy: vault.base_apy,
        final_apy,
        boost,
        total_earnings,
        payout_count,
        payout_amount,
        mining,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(vault: u32, principal: f64) -> QuoteRequest {
        QuoteRequest {
            vault_id: VaultId(vault),
            principal,
            karat_market_value_usd: None,
            ember_market_value_usd: None,
        }
    }

    #[test]
    fn test_unboosted_quote() {
        let catalog = VaultCatalog::builtin();
        let params = MiningParams::default();

        // vault-3: Pro, 12 months, 8-14%, power 200
        let quote = build_quote(&catalog, &params, 1.0, &request(3, 10_000.0)).unwrap();

        assert_eq!(quote.final_apy, 8.0);
        assert_eq!(quote.total_earnings, 800.0);
        assert_eq!(quote.payout_count, 12);
        assert!((quote.payout_amount - 66.6666).abs() < 0.001);
        assert_eq!(quote.required_karat, 500.0);
        assert_eq!(quote.mining.daily_raw, 200.0);
        assert!(quote.warnings.is_empty());
    }

    #[test]
    fn test_boosted_quote_lifts_final_apy() {
        let catalog = VaultCatalog::builtin();
        let params = MiningParams::default();

        let mut req = request(3, 10_000.0);
        // Full fill: cap is 5000, k=2, so 2500 of market value
        req.karat_market_value_usd = Some(2_500.0);

        let quote = build_quote(&catalog, &params, 1.0, &req).unwrap();
        assert_eq!(quote.final_apy, 14.0);
        assert!(quote.boost.is_full_boost);
        assert_eq!(quote.total_earnings, 1_400.0);
    }

    #[test]
    fn test_quote_collects_clamp_warnings() {
        let catalog = VaultCatalog::builtin();
        let params = MiningParams::default();

        let mut req = request(3, 10_000.0);
        req.karat_market_value_usd = Some(10_000.0); // double the cap

        let quote = build_quote(&catalog, &params, 1.0, &req).unwrap();
        assert_eq!(quote.warnings.len(), 1);
        assert!(matches!(
            quote.warnings[0],
            BoostWarning::ValueExceedsCap { .. }
        ));
    }

    #[test]
    fn test_quote_rejects_out_of_bounds_principal() {
        let catalog = VaultCatalog::builtin();
        let params = MiningParams::default();

        let err = build_quote(&catalog, &params, 1.0, &request(3, 100.0)).unwrap_err();
        assert!(matches!(
            err,
            QuoteError::Vault(VeinError::BelowMinimumInvestment { .. })
        ));
    }

    #[test]
    fn test_quote_rejects_unknown_vault() {
        let catalog = VaultCatalog::builtin();
        let params = MiningParams::default();

        let err = build_quote(&catalog, &params, 1.0, &request(42, 1_000.0)).unwrap_err();
        assert!(matches!(err, QuoteError::Vault(VeinError::VaultNotFound(_))));
    }
}
