//! # Vein Engine - Yield & Mining Calculators
//!
//! Pure calculation layer of the Vein vault platform. Everything in this
//! crate is a side-effect-free function over explicit inputs, safe to call
//! concurrently from the HTTP layer (quotes/previews) and from the lifecycle
//! batch passes (accrual).
//!
//! ## Components
//!
//! - **boost** - blends up to two auxiliary-token deposits (KARAT, then
//!   EMBER) into a single final APY, clamped to the vault ceiling
//! - **mining** - supply-based difficulty curve and ORE reward projection
//! - **accrual** - simple/compound interest, payout schedules, time-prorated
//!   pending earnings
//! - **quote** - composes catalog + boost + accrual + mining into a full
//!   investment preview

pub mod accrual;
pub mod boost;
pub mod mining;
pub mod quote;

// Re-exports
pub use boost::{
    compose_boosts, compute_boost, required_market_value_for_apy, validate_boost,
    BoostComposition, BoostError, BoostQuote, BoostWarning,
};
pub use mining::{
    base_daily_rate, compute_difficulty, compute_mining, MiningError, MiningParams,
    MiningProjection, MiningStats,
};
pub use quote::{build_quote, InvestmentQuote, QuoteError, QuoteRequest};
