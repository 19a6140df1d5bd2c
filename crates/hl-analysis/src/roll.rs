//! Roll/adjustment candidate generation and risk-adjusted scoring.
//!
//! Candidate premiums are deliberately estimated with cheap linear
//! heuristics instead of re-running the pricer; the probability model is a
//! plain normal approximation. These approximations are the behavioral
//! contract of this component, not placeholders for full repricing.

use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use hl_pricing::norm_cdf;
use hl_types::{OptionKind, OptionLeg};

/// Fixed annualized volatility assumed by the probability-of-profit model.
///
/// Deliberately independent of each leg's implied volatility; the roll
/// scorer uses one global assumption for every candidate.
pub const ASSUMED_ANNUAL_VOL: f64 = 0.20;

/// Strike offsets (in strike units) tried when rolling toward the money.
const STRIKE_OFFSETS: [i64; 4] = [3, 5, 7, 10];

/// Premium gained per extra day when rolling the expiry out (~0.7%/day).
const TIME_DECAY_PER_DAY: f64 = 0.007;

/// Floor for heuristic premium estimates.
const MIN_ESTIMATED_PREMIUM: f64 = 0.05;

/// What a roll candidate does to the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RollAction {
    /// Keep the leg as-is.
    Hold,
    /// Buy the leg back and realize the current P/L.
    Close,
    /// Move the strike, same expiry.
    RollStrike,
    /// Move to a later expiry, same strike.
    RollExpiry,
}

/// One scored adjustment alternative for an existing short leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollCandidate {
    pub action: RollAction,
    pub new_strike: Decimal,
    pub new_expiry: NaiveDate,
    /// Signed cash effect per contract; positive = additional outlay.
    pub incremental_cost: Decimal,
    pub resulting_break_even: Decimal,
    /// Rough estimate in [0, 100]; exactly 100 or 0 for `Close`.
    pub probability_of_profit: f64,
    /// Risk-adjusted rank: probability per unit of capital at risk.
    pub score: f64,
}

/// Probability that the underlying finishes on the profitable side of the
/// strike: the standard normal CDF of the standardized distance, under
/// [`ASSUMED_ANNUAL_VOL`]. A rough heuristic, not a risk-neutral
/// probability.
fn probability_of_profit(kind: OptionKind, underlying: f64, strike: f64, dte: f64) -> f64 {
    let distance = match kind {
        OptionKind::Put => underlying - strike,
        OptionKind::Call => strike - underlying,
    };
    let sd = underlying * ASSUMED_ANNUAL_VOL * (dte / 365.0).sqrt();
    if sd <= 0.0 {
        return if distance >= 0.0 { 100.0 } else { 0.0 };
    }
    norm_cdf(distance / sd) * 100.0
}

/// `probability x 100 / max(|capital|, 1)` — a ranking, not a present value.
fn score(probability: f64, capital_after: Decimal) -> f64 {
    let capital = capital_after.abs().to_f64().unwrap_or(0.0).max(1.0);
    probability * 100.0 / capital
}

fn break_even(kind: OptionKind, strike: Decimal, credit: Decimal) -> Decimal {
    match kind {
        OptionKind::Put => strike - credit,
        OptionKind::Call => strike + credit,
    }
}

fn to_dec(v: f64) -> Decimal {
    Decimal::from_f64(v).unwrap_or(Decimal::ZERO)
}

/// Enumerate and score adjustment alternatives for a short leg.
///
/// Always yields a `Hold` and a `Close` baseline, strike rolls at four
/// offsets toward the money, and expiry rolls to the next three listed
/// expiries beyond the current one. Candidates are sorted descending by
/// score; the head is the recommendation. Generated fresh on every call,
/// never persisted by the engine.
pub fn generate_roll_candidates(
    current_leg: &OptionLeg,
    invested_capital: Decimal,
    received_credit: Decimal,
    available_expiries: &[NaiveDate],
    as_of: NaiveDate,
) -> Vec<RollCandidate> {
    let mut candidates = Vec::new();

    let underlying = current_leg.underlying_f64();
    let strike = current_leg.strike_f64();
    let premium = current_leg.premium.to_f64().unwrap_or(0.0);
    let dte = current_leg.days_to_expiry(as_of) as f64;

    // Hold: no change, no cost.
    let hold_pop = probability_of_profit(current_leg.kind, underlying, strike, dte);
    candidates.push(RollCandidate {
        action: RollAction::Hold,
        new_strike: current_leg.strike,
        new_expiry: current_leg.expiry,
        incremental_cost: Decimal::ZERO,
        resulting_break_even: break_even(current_leg.kind, current_leg.strike, received_credit),
        probability_of_profit: hold_pop,
        score: score(hold_pop, invested_capital),
    });

    // Close: buy back at the current mark and realize the P/L. The outcome
    // is certain, so probability is exactly 100 or 0, never fractional.
    let close_cost = current_leg.premium * Decimal::ONE_HUNDRED;
    let realized = (received_credit - current_leg.premium) * Decimal::ONE_HUNDRED;
    let close_pop = if realized >= Decimal::ZERO { 100.0 } else { 0.0 };
    candidates.push(RollCandidate {
        action: RollAction::Close,
        new_strike: current_leg.strike,
        new_expiry: current_leg.expiry,
        incremental_cost: close_cost,
        resulting_break_even: current_leg.underlying,
        probability_of_profit: close_pop,
        score: score(close_pop, invested_capital + close_cost),
    });

    // Strike rolls: step toward the money (puts up, calls down), premium
    // estimated by linear proximity to ATM rather than repricing.
    let direction = match current_leg.kind {
        OptionKind::Put => 1.0,
        OptionKind::Call => -1.0,
    };
    let current_distance = (underlying - strike).abs().max(1.0);
    for offset in STRIKE_OFFSETS {
        let new_strike = strike + direction * offset as f64;
        if new_strike <= 0.0 {
            continue;
        }
        let new_distance = (underlying - new_strike).abs();
        let estimated = (premium * (2.0 - new_distance / current_distance))
            .max(MIN_ESTIMATED_PREMIUM);

        candidates.push(roll_candidate(
            RollAction::RollStrike,
            current_leg,
            to_dec(new_strike),
            current_leg.expiry,
            estimated,
            premium,
            invested_capital,
            received_credit,
            dte,
        ));
    }

    // Expiry rolls: next three listed expiries beyond the current one,
    // premium estimated by linear time decay (~0.7% per extra day).
    for expiry in available_expiries
        .iter()
        .filter(|e| **e > current_leg.expiry)
        .take(3)
    {
        let extra_days = (*expiry - current_leg.expiry).num_days() as f64;
        let estimated = (premium * (1.0 + TIME_DECAY_PER_DAY * extra_days))
            .max(MIN_ESTIMATED_PREMIUM);
        let new_dte = (*expiry - as_of).num_days().max(1) as f64;

        candidates.push(roll_candidate(
            RollAction::RollExpiry,
            current_leg,
            current_leg.strike,
            *expiry,
            estimated,
            premium,
            invested_capital,
            received_credit,
            new_dte,
        ));
    }

    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    debug!(
        count = candidates.len(),
        best = ?candidates.first().map(|c| c.action),
        "roll candidates generated"
    );
    candidates
}

#[allow(clippy::too_many_arguments)]
fn roll_candidate(
    action: RollAction,
    current_leg: &OptionLeg,
    new_strike: Decimal,
    new_expiry: NaiveDate,
    estimated_premium: f64,
    current_premium: f64,
    invested_capital: Decimal,
    received_credit: Decimal,
    dte: f64,
) -> RollCandidate {
    // Buy back the current leg, sell the new one.
    let incremental_cost = to_dec(current_premium - estimated_premium) * Decimal::ONE_HUNDRED;
    let credit_after = received_credit + to_dec(estimated_premium - current_premium);
    let pop = probability_of_profit(
        current_leg.kind,
        current_leg.underlying_f64(),
        new_strike.to_f64().unwrap_or(0.0),
        dte,
    );
    RollCandidate {
        action,
        new_strike,
        new_expiry,
        incremental_cost,
        resulting_break_even: break_even(current_leg.kind, new_strike, credit_after),
        probability_of_profit: pop,
        score: score(pop, invested_capital + incremental_cost),
    }
}
