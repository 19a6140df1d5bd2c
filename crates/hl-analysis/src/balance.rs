//! Delta-neutral offset proposal for a single long leg.

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use hl_pricing::{delta, price};
use hl_types::{HlError, HlResult, OptionKind, OptionLeg};

const MAX_ITERATIONS: usize = 200;
const DELTA_TOLERANCE: f64 = 1e-4;
const GRID_STEPS: usize = 60;

/// The opposite-kind leg the balancer suggests selling or buying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedLeg {
    pub kind: OptionKind,
    pub strike: Decimal,
    pub estimated_premium: Decimal,
    pub delta: f64,
}

/// A long leg together with the offset that flattens its delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancerResult {
    pub long_leg: OptionLeg,
    pub proposed: ProposedLeg,
    /// Long delta plus proposed delta; near zero when the solve converged.
    pub delta_sum: f64,
}

/// Propose an opposite-kind leg whose delta offsets the long leg's delta.
///
/// Searches strikes in `[0.7 S, 1.3 S]` at the long leg's own implied vol
/// and expiry. Bisects when the bracket straddles the target delta, and
/// falls back to a grid scan for the closest strike when it does not, so a
/// proposal always comes back for a live leg.
pub fn propose_offset(
    long_leg: &OptionLeg,
    rate: f64,
    as_of: NaiveDate,
) -> HlResult<BalancerResult> {
    let t = long_leg.years_to_expiry(as_of);
    if t <= 0.0 {
        return Err(HlError::invalid_input("expiry", long_leg.expiry));
    }

    let s = long_leg.underlying_f64();
    let sigma = long_leg.implied_vol;
    let long_delta = delta(s, long_leg.strike_f64(), t, rate, sigma, long_leg.kind)?;

    let offset_kind = long_leg.kind.opposite();
    let target = -long_delta;
    let objective = |k: f64| -> HlResult<f64> {
        Ok(delta(s, k, t, rate, sigma, offset_kind)? - target)
    };

    let (mut lo, mut hi) = (0.7 * s, 1.3 * s);
    let f_lo = objective(lo)?;
    let f_hi = objective(hi)?;

    let strike = if f_lo * f_hi < 0.0 {
        let mut mid = 0.5 * (lo + hi);
        for _ in 0..MAX_ITERATIONS {
            mid = 0.5 * (lo + hi);
            let f_mid = objective(mid)?;
            if f_mid.abs() < DELTA_TOLERANCE {
                break;
            }
            if f_lo * f_mid < 0.0 {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        mid
    } else {
        // No sign change: the offset delta never reaches the target inside
        // the band. Take the strike that gets closest.
        let step = (hi - lo) / GRID_STEPS as f64;
        let mut best = (lo, f_lo.abs());
        for i in 1..=GRID_STEPS {
            let k = lo + step * i as f64;
            let err = objective(k)?.abs();
            if err < best.1 {
                best = (k, err);
            }
        }
        best.0
    };

    let offset_delta = delta(s, strike, t, rate, sigma, offset_kind)?;
    let premium = price(s, strike, t, rate, sigma, offset_kind)?;
    let delta_sum = long_delta + offset_delta;

    debug!(
        kind = %offset_kind,
        strike,
        offset_delta,
        delta_sum,
        "offset leg proposed"
    );

    Ok(BalancerResult {
        long_leg: long_leg.clone(),
        proposed: ProposedLeg {
            kind: offset_kind,
            strike: Decimal::from_f64(strike).unwrap_or(Decimal::ZERO),
            estimated_premium: Decimal::from_f64(premium).unwrap_or(Decimal::ZERO),
            delta: offset_delta,
        },
        delta_sum,
    })
}
