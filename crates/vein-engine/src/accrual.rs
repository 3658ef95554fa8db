//! # Yield Accrual
//!
//! Simple (non-compounding) interest math, payout schedule arithmetic, and
//! time-prorated pending earnings. Yield accrues on whole elapsed days at
//! `principal * apy / 100 / 365` per day; partial days earn nothing until
//! they complete.
//!
//! Payout dates advance on calendar months (and quarters), not 30-day
//! blocks; the 30-day month appears only in projected payout counts for the
//! daily schedule, mirroring the mining projection convention.

use crate::mining::PROJECTION_DAYS_PER_MONTH;
use chrono::{DateTime, Duration, Months, Utc};
use vein_core::PayoutSchedule;

/// Days in the accrual year
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Simple interest over the full term:
/// `principal * (apy/100) * (duration_months/12)`
pub fn simple_interest_earnings(principal: f64, apy: f64, duration_months: u32) -> f64 {
    principal * (apy / 100.0) * (duration_months as f64 / 12.0)
}

/// Monthly-compounded earnings over the full term (growth minus principal)
pub fn compound_earnings(principal: f64, apy: f64, duration_months: u32) -> f64 {
    let monthly_rate = apy / 100.0 / 12.0;
    principal * (1.0 + monthly_rate).powi(duration_months as i32) - principal
}

/// Number of payouts a schedule produces over a term
pub fn number_of_payouts(duration_months: u32, schedule: PayoutSchedule) -> u32 {
    match schedule {
        PayoutSchedule::Monthly => duration_months,
        PayoutSchedule::Quarterly => duration_months / 3,
        PayoutSchedule::EndOfTerm => 1,
        PayoutSchedule::Daily => duration_months * PROJECTION_DAYS_PER_MONTH as u32,
    }
}

/// Projected size of each payout (total simple interest split evenly)
pub fn payout_amount(principal: f64, apy: f64, duration_months: u32, schedule: PayoutSchedule) -> f64 {
    let payouts = number_of_payouts(duration_months, schedule);
    if payouts == 0 {
        return 0.0;
    }
    simple_interest_earnings(principal, apy, duration_months) / payouts as f64
}

/// First (or next) payout date after the accrual watermark
///
/// Advances from `last_claim` when one exists, otherwise from `start`, by
/// one schedule period. `EndOfTerm` always returns the investment's end
/// date.
pub fn next_payout_date(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    schedule: PayoutSchedule,
    last_claim: Option<DateTime<Utc>>,
) -> DateTime<Utc> {
    let from = last_claim.unwrap_or(start);
    match schedule {
        PayoutSchedule::Daily => from + Duration::days(1),
        PayoutSchedule::Monthly => from + Months::new(1),
        PayoutSchedule::Quarterly => from + Months::new(3),
        PayoutSchedule::EndOfTerm => end,
    }
}

/// Advance a scheduled payout date by one period, refusing to schedule past
/// maturity
///
/// Returns `None` when the advanced date would exceed `end` - the field is
/// nulled rather than dated past the term, and any final remainder is
/// reconciled at completion/claim. `EndOfTerm` pays once, so advancing it
/// always yields `None`.
pub fn advance_payout_date(
    current: DateTime<Utc>,
    end: DateTime<Utc>,
    schedule: PayoutSchedule,
) -> Option<DateTime<Utc>> {
    let advanced = match schedule {
        PayoutSchedule::Daily => current + Duration::days(1),
        PayoutSchedule::Monthly => current + Months::new(1),
        PayoutSchedule::Quarterly => current + Months::new(3),
        PayoutSchedule::EndOfTerm => return None,
    };
    if advanced > end {
        None
    } else {
        Some(advanced)
    }
}

/// Whole days between two instants, floored at zero
pub fn days_elapsed(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_days().max(0)
}

/// Yield accrued since the last credit
///
/// The window starts at `last_claim` when one exists, otherwise at
/// `reference` (normally the start date). Zero whole elapsed days earn
/// zero - which is what makes an immediate re-run of the payout pass a
/// no-op.
pub fn pending_earnings_since(
    principal: f64,
    apy: f64,
    reference: DateTime<Utc>,
    now: DateTime<Utc>,
    last_claim: Option<DateTime<Utc>>,
) -> f64 {
    let daily_rate = principal * apy / 100.0 / DAYS_PER_YEAR;
    daily_rate * days_elapsed(last_claim.unwrap_or(reference), now) as f64
}
