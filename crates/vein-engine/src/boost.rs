//! # Boost Composition
//!
//! Converts auxiliary-token deposits into APY boost. Each token's boost is
//! computed independently against a value cap derived from the principal,
//! then the two are composed sequentially:
//!
//! ```text
//! boost_value     = market_value_usd * valuation_multiplier
//! max_boost_value = principal * cap_fraction
//! fill_percent    = min(boost_value, max_boost_value) / max_boost_value * 100
//! additional_apy  = (max_apy - base_apy) * fill_percent / 100
//! ```
//!
//! ## Composition Policy
//!
//! When both tokens are deposited, KARAT applies first against the full
//! `[base_apy, max_apy]` range and EMBER applies against whatever range
//! remains, with the same principal-derived value cap. The first-applied
//! boost therefore gets priority on the range; the two deposits are not
//! interchangeable. This ordering is a deliberate policy decision, not an
//! implementation accident.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use vein_core::BoostTerms;

/// Result type alias for boost operations
pub type Result<T> = std::result::Result<T, BoostError>;

/// Validation errors for boost inputs
///
/// Messages name the offending field and constraint; they are surfaced
/// verbatim in preview UIs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoostError {
    /// No boost range exists
    #[error("base_apy {base_apy} must be strictly below max_apy {max_apy}")]
    EmptyApyRange { base_apy: f64, max_apy: f64 },

    /// Principal must be positive
    #[error("principal must be greater than 0")]
    NonPositivePrincipal,

    /// Market value must not be negative
    #[error("market_value_usd must not be negative")]
    NegativeMarketValue,

    /// Terms misconfiguration
    #[error("valuation_multiplier must be greater than 0")]
    NonPositiveMultiplier,
}

/// Non-blocking advisories carried alongside a successful quote
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoostWarning {
    /// The provided value exceeds the usable cap; the excess buys no APY
    ValueExceedsCap { provided_usd: f64, cap_usd: f64 },
}

impl fmt::Display for BoostWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueExceedsCap {
                provided_usd,
                cap_usd,
            } => write!(
                f,
                "boost value {provided_usd} exceeds the usable cap of {cap_usd}; the excess earns no additional APY"
            ),
        }
    }
}

/// Full breakdown of a single-token boost computation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoostQuote {
    /// Market value after the valuation multiplier
    pub boost_value_usd: f64,
    /// Cap: `principal * cap_fraction`
    pub max_boost_value_usd: f64,
    /// Value actually counted, after clamping to the cap
    pub effective_boost_value_usd: f64,
    /// Proportion of the cap supplied, 0-100
    pub fill_percent: f64,
    /// APY contributed by this deposit
    pub additional_apy: f64,
    /// APY after applying this boost
    pub final_apy: f64,
    /// Whether the ceiling was reached
    pub is_full_boost: bool,
    /// Advisories (clamping etc.)
    pub warnings: Vec<BoostWarning>,
}

/// Result of composing the KARAT and EMBER boosts
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoostComposition {
    /// First-priority KARAT boost, if deposited
    pub karat: Option<BoostQuote>,
    /// Second EMBER boost, applied to the remaining range
    pub ember: Option<BoostQuote>,
    /// APY after both boosts, capped at the vault ceiling
    pub final_apy: f64,
    /// Whether the ceiling was reached
    pub is_full_boost: bool,
}

/// Validate single-boost inputs without computing anything
pub fn validate_boost(
    base_apy: f64,
    max_apy: f64,
    principal: f64,
    market_value_usd: f64,
) -> Result<()> {
    if base_apy >= max_apy {
        return Err(BoostError::EmptyApyRange { base_apy, max_apy });
    }
    if principal <= 0.0 {
        return Err(BoostError::NonPositivePrincipal);
    }
    if market_value_usd < 0.0 {
        return Err(BoostError::NegativeMarketValue);
    }
    Ok(())
}

/// Compute a single-token boost against the `[base_apy, max_apy]` range
pub fn compute_boost(
    base_apy: f64,
    max_apy: f64,
    principal: f64,
    market_value_usd: f64,
    terms: &BoostTerms,
) -> Result<BoostQuote> {
    validate_boost(base_apy, max_apy, principal, market_value_usd)?;
    if terms.valuation_multiplier <= 0.0 {
        return Err(BoostError::NonPositiveMultiplier);
    }
    Ok(boost_unchecked(
        base_apy,
        max_apy,
        principal,
        market_value_usd,
        terms,
    ))
}

/// Core boost arithmetic; tolerates a degenerate zero-width range so the
/// second composition stage stays total when the first boost already hit
/// the ceiling.
fn boost_unchecked(
    base_apy: f64,
    max_apy: f64,
    principal: f64,
    market_value_usd: f64,
    terms: &BoostTerms,
) -> BoostQuote {
    let boost_value_usd = market_value_usd * terms.valuation_multiplier;
    let max_boost_value_usd = principal * terms.cap_fraction;
    let effective_boost_value_usd = boost_value_usd.min(max_boost_value_usd);

    let fill_percent = if max_boost_value_usd > 0.0 {
        (effective_boost_value_usd / max_boost_value_usd * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let boost_range = max_apy - base_apy;
    let additional_apy = boost_range * fill_percent / 100.0;
    let final_apy = (base_apy + additional_apy).min(max_apy);

    let mut warnings = Vec::new();
    if boost_value_usd > max_boost_value_usd {
        warnings.push(BoostWarning::ValueExceedsCap {
            provided_usd: boost_value_usd,
            cap_usd: max_boost_value_usd,
        });
    }

    BoostQuote {
        boost_value_usd,
        max_boost_value_usd,
        effective_boost_value_usd,
        fill_percent,
        additional_apy,
        final_apy,
        is_full_boost: final_apy >= max_apy,
        warnings,
    }
}

/// Compose the KARAT and EMBER boosts into one final APY
///
/// KARAT applies first against `[base_apy, max_apy]`; EMBER applies against
/// the remaining `[intermediate, max_apy]` range with the same
/// principal-derived cap. The sum never exceeds `max_apy`.
pub fn compose_boosts(
    base_apy: f64,
    max_apy: f64,
    principal: f64,
    karat_market_value: Option<f64>,
    ember_market_value: Option<f64>,
    terms: &BoostTerms,
) -> Result<BoostComposition> {
    let probe = karat_market_value.or(ember_market_value).unwrap_or(0.0);
    validate_boost(base_apy, max_apy, principal, probe)?;
    if terms.valuation_multiplier <= 0.0 {
        return Err(BoostError::NonPositiveMultiplier);
    }
    if let Some(v) = ember_market_value {
        if v < 0.0 {
            return Err(BoostError::NegativeMarketValue);
        }
    }

    let karat = karat_market_value
        .map(|value| boost_unchecked(base_apy, max_apy, principal, value, terms));
    let intermediate = karat.as_ref().map_or(base_apy, |q| q.final_apy);

    let ember = ember_market_value
        .map(|value| boost_unchecked(intermediate, max_apy, principal, value, terms));
    let final_apy = ember
        .as_ref()
        .map_or(intermediate, |q| q.final_apy)
        .min(max_apy);

    Ok(BoostComposition {
        karat,
        ember,
        final_apy,
        is_full_boost: final_apy >= max_apy,
    })
}

/// Market value of auxiliary token needed to reach `desired_apy`
///
/// Exact inverse of [`compute_boost`]: feeding the result back through the
/// forward calculation reproduces `desired_apy` (within float rounding)
/// whenever `base_apy < desired_apy < max_apy`. Returns `0` at or below the
/// base, and the cap-filling value at or above the ceiling.
pub fn required_market_value_for_apy(
    base_apy: f64,
    max_apy: f64,
    principal: f64,
    desired_apy: f64,
    terms: &BoostTerms,
) -> Result<f64> {
    validate_boost(base_apy, max_apy, principal, 0.0)?;
    if terms.valuation_multiplier <= 0.0 {
        return Err(BoostError::NonPositiveMultiplier);
    }

    let max_boost_value_usd = principal * terms.cap_fraction;
    if desired_apy <= base_apy {
        return Ok(0.0);
    }
    if desired_apy >= max_apy {
        return Ok(max_boost_value_usd / terms.valuation_multiplier);
    }

    let fill = (desired_apy - base_apy) / (max_apy - base_apy);
    let effective_boost_value_usd = fill * max_boost_value_usd;
    Ok(effective_boost_value_usd / terms.valuation_multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn terms() -> BoostTerms {
        BoostTerms::default()
    }

    #[test]
    fn test_full_boost_scenario() {
        // k=2, principal 1000, cap 0.5, market value 250
        let quote = compute_boost(5.0, 8.0, 1_000.0, 250.0, &terms()).unwrap();

        assert_eq!(quote.boost_value_usd, 500.0);
        assert_eq!(quote.max_boost_value_usd, 500.0);
        assert_eq!(quote.effective_boost_value_usd, 500.0);
        assert_eq!(quote.fill_percent, 100.0);
        assert_eq!(quote.final_apy, 8.0);
        assert!(quote.is_full_boost);
        assert!(quote.warnings.is_empty());
    }

    #[test]
    fn test_half_fill() {
        // boost value 250 against a 1000-cap: 25% fill of a 4-point range
        let quote = compute_boost(6.0, 10.0, 2_000.0, 125.0, &terms()).unwrap();

        assert_eq!(quote.max_boost_value_usd, 1_000.0);
        assert_eq!(quote.fill_percent, 25.0);
        assert!((quote.additional_apy - 1.0).abs() < 1e-12);
        assert!((quote.final_apy - 7.0).abs() < 1e-12);
        assert!(!quote.is_full_boost);
    }

    #[test]
    fn test_overshoot_warns_but_validates() {
        let quote = compute_boost(5.0, 8.0, 1_000.0, 400.0, &terms()).unwrap();

        // 800 of value against a 500 cap: clamped, full boost, one warning
        assert_eq!(quote.effective_boost_value_usd, 500.0);
        assert!(quote.is_full_boost);
        assert_eq!(
            quote.warnings,
            vec![BoostWarning::ValueExceedsCap {
                provided_usd: 800.0,
                cap_usd: 500.0,
            }]
        );
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            compute_boost(8.0, 8.0, 1_000.0, 100.0, &terms()).unwrap_err(),
            BoostError::EmptyApyRange {
                base_apy: 8.0,
                max_apy: 8.0
            }
        );
        assert_eq!(
            compute_boost(5.0, 8.0, 0.0, 100.0, &terms()).unwrap_err(),
            BoostError::NonPositivePrincipal
        );
        assert_eq!(
            compute_boost(5.0, 8.0, 1_000.0, -1.0, &terms()).unwrap_err(),
            BoostError::NegativeMarketValue
        );
    }

    #[test]
    fn test_error_messages_name_fields() {
        let err = compute_boost(5.0, 8.0, 0.0, 100.0, &terms()).unwrap_err();
        assert_eq!(err.to_string(), "principal must be greater than 0");
    }

    #[test]
    fn test_composition_first_boost_priority() {
        // KARAT half-fills, EMBER half-fills the remaining range
        let comp =
            compose_boosts(5.0, 9.0, 1_000.0, Some(125.0), Some(125.0), &terms()).unwrap();

        let karat = comp.karat.as_ref().unwrap();
        let ember = comp.ember.as_ref().unwrap();

        // KARAT: 50% of [5, 9] -> 7.0
        assert!((karat.final_apy - 7.0).abs() < 1e-12);
        // EMBER: 50% of [7, 9] -> 8.0
        assert!((ember.final_apy - 8.0).abs() < 1e-12);
        assert!((comp.final_apy - 8.0).abs() < 1e-12);
        assert!(!comp.is_full_boost);
    }

    #[test]
    fn test_composition_order_matters() {
        // Same two values swapped give a different split between the records,
        // and here the same total only because fills are symmetric; a full
        // first boost leaves the second with nothing.
        let comp =
            compose_boosts(5.0, 9.0, 1_000.0, Some(250.0), Some(250.0), &terms()).unwrap();

        let karat = comp.karat.as_ref().unwrap();
        let ember = comp.ember.as_ref().unwrap();

        assert!(karat.is_full_boost);
        assert_eq!(ember.additional_apy, 0.0);
        assert_eq!(comp.final_apy, 9.0);
        assert!(comp.is_full_boost);
    }

    #[test]
    fn test_composition_single_token() {
        let comp = compose_boosts(5.0, 9.0, 1_000.0, None, Some(125.0), &terms()).unwrap();
        assert!(comp.karat.is_none());
        assert!((comp.final_apy - 7.0).abs() < 1e-12);

        let comp = compose_boosts(5.0, 9.0, 1_000.0, None, None, &terms()).unwrap();
        assert_eq!(comp.final_apy, 5.0);
    }

    #[test]
    fn test_inverse_at_boundaries() {
        let t = terms();
        assert_eq!(
            required_market_value_for_apy(5.0, 8.0, 1_000.0, 5.0, &t).unwrap(),
            0.0
        );
        assert_eq!(
            required_market_value_for_apy(5.0, 8.0, 1_000.0, 4.0, &t).unwrap(),
            0.0
        );
        // At or above the ceiling: the value that fills the cap (500 / 2)
        assert_eq!(
            required_market_value_for_apy(5.0, 8.0, 1_000.0, 8.0, &t).unwrap(),
            250.0
        );
        assert_eq!(
            required_market_value_for_apy(5.0, 8.0, 1_000.0, 12.0, &t).unwrap(),
            250.0
        );
    }

    #[test]
    fn test_inverse_roundtrip_midpoint() {
        let t = terms();
        let value = required_market_value_for_apy(5.0, 8.0, 1_000.0, 6.5, &t).unwrap();
        let quote = compute_boost(5.0, 8.0, 1_000.0, value, &t).unwrap();
        assert!((quote.final_apy - 6.5).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_fill_and_final_apy_bounded(
            base in 0.0f64..15.0,
            range in 0.1f64..20.0,
            principal in 1.0f64..1_000_000.0,
            value in 0.0f64..10_000_000.0,
        ) {
            let max = base + range;
            let quote = compute_boost(base, max, principal, value, &terms()).unwrap();

            prop_assert!(quote.fill_percent >= 0.0);
            prop_assert!(quote.fill_percent <= 100.0);
            prop_assert!(quote.final_apy >= base);
            prop_assert!(quote.final_apy <= max);
        }

        #[test]
        fn prop_inverse_roundtrip(
            base in 0.0f64..15.0,
            range in 0.5f64..20.0,
            principal in 10.0f64..1_000_000.0,
            fill in 0.01f64..0.99,
        ) {
            let max = base + range;
            let desired = base + fill * range;
            let t = terms();

            let value = required_market_value_for_apy(base, max, principal, desired, &t).unwrap();
            let quote = compute_boost(base, max, principal, value, &t).unwrap();

            prop_assert!((quote.final_apy - desired).abs() < 1e-6);
        }

        #[test]
        fn prop_composition_never_exceeds_ceiling(
            base in 0.0f64..15.0,
            range in 0.1f64..20.0,
            principal in 1.0f64..1_000_000.0,
            karat in 0.0f64..1_000_000.0,
            ember in 0.0f64..1_000_000.0,
        ) {
            let max = base + range;
            let comp = compose_boosts(base, max, principal, Some(karat), Some(ember), &terms())
                .unwrap();

            prop_assert!(comp.final_apy >= base);
            prop_assert!(comp.final_apy <= max);
        }
    }
}
