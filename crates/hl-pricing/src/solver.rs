//! Inverse delta solving: translate delta-based risk triggers into
//! concrete underlying-price levels.

use serde::{Deserialize, Serialize};

use hl_types::{HlError, HlResult, OptionKind};

use crate::pricing::{delta, price};

const MAX_ITERATIONS: usize = 200;
const BRACKET_TOLERANCE: f64 = 1e-6;

/// Search interval scaled from the strike. Put deltas move fastest below
/// the strike, call deltas above it, so the brackets are asymmetric.
fn bracket(k: f64, kind: OptionKind) -> (f64, f64) {
    match kind {
        OptionKind::Put => (0.7 * k, 1.1 * k),
        OptionKind::Call => (0.9 * k, 1.3 * k),
    }
}

/// Find the underlying price at which the option's delta equals
/// `target_delta`, by bisection over a strike-scaled bracket.
///
/// Delta is monotonic in the underlying for fixed strike/expiry/vol, which
/// is what lets a sign change in the bracket pin the root. When the bracket
/// contains no sign change (target out of range, or `t == 0` where delta
/// degenerates to a step), this returns `RootNotFound`; callers must not
/// substitute the strike for a missing root.
pub fn solve_underlying_for_delta(
    target_delta: f64,
    k: f64,
    t: f64,
    r: f64,
    sigma: f64,
    kind: OptionKind,
) -> HlResult<f64> {
    let (mut lo, mut hi) = bracket(k, kind);

    if t == 0.0 {
        // Step-function delta; no genuine root to bisect toward.
        return Err(HlError::RootNotFound {
            target_delta,
            lo,
            hi,
        });
    }

    let mut f_lo = delta(lo, k, t, r, sigma, kind)? - target_delta;
    let f_hi = delta(hi, k, t, r, sigma, kind)? - target_delta;

    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if f_lo * f_hi > 0.0 {
        return Err(HlError::RootNotFound {
            target_delta,
            lo,
            hi,
        });
    }

    // Iteration count is bounded so termination is guaranteed even if the
    // tolerance is never met.
    for _ in 0..MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let f_mid = delta(mid, k, t, r, sigma, kind)? - target_delta;

        if f_mid == 0.0 || (hi - lo) < BRACKET_TOLERANCE {
            return Ok(mid);
        }
        if f_lo * f_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    Ok(0.5 * (lo + hi))
}

/// What the broker-alert table says to do at a given delta level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitAction {
    Watch,
    Alert,
    Roll,
    Stop,
}

/// One row of the delta exit ladder: a delta target resolved to the
/// underlying level producing it, with the option re-priced there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitLevel {
    pub target_delta: f64,
    pub underlying_price: f64,
    pub option_price: f64,
    pub action: ExitAction,
}

const LADDER: [(f64, ExitAction); 6] = [
    (0.15, ExitAction::Watch),
    (0.20, ExitAction::Watch),
    (0.25, ExitAction::Alert),
    (0.30, ExitAction::Roll),
    (0.40, ExitAction::Watch),
    (0.50, ExitAction::Stop),
];

fn signed_target(magnitude: f64, kind: OptionKind) -> f64 {
    match kind {
        // Short call risk as price rises and delta approaches 1.
        OptionKind::Call => magnitude,
        // Short put risk as price falls and delta approaches -1.
        OptionKind::Put => -magnitude,
    }
}

/// The full delta exit ladder for a short leg. Targets whose root is not
/// bracketed are skipped rather than failing the whole table.
pub fn exit_ladder(
    k: f64,
    t: f64,
    r: f64,
    sigma: f64,
    kind: OptionKind,
) -> HlResult<Vec<ExitLevel>> {
    let mut levels = Vec::with_capacity(LADDER.len());
    for (magnitude, action) in LADDER {
        let target = signed_target(magnitude, kind);
        match solve_underlying_for_delta(target, k, t, r, sigma, kind) {
            Ok(s) => levels.push(ExitLevel {
                target_delta: target,
                underlying_price: s,
                option_price: price(s, k, t, r, sigma, kind)?,
                action,
            }),
            Err(HlError::RootNotFound { .. }) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(levels)
}

/// The three fixed risk-escalation thresholds for a short credit leg,
/// as underlying-price levels: alert at 25-delta, roll at 30-delta,
/// stop at 50-delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskTriggers {
    pub alert_price: f64,
    pub roll_price: f64,
    pub stop_price: f64,
}

/// Solve all three escalation thresholds. Unlike [`exit_ladder`], a missing
/// root here is an error: a trigger ladder with holes is not actionable.
pub fn risk_triggers(
    k: f64,
    t: f64,
    r: f64,
    sigma: f64,
    kind: OptionKind,
) -> HlResult<RiskTriggers> {
    let solve = |magnitude: f64| {
        solve_underlying_for_delta(signed_target(magnitude, kind), k, t, r, sigma, kind)
    };
    Ok(RiskTriggers {
        alert_price: solve(0.25)?,
        roll_price: solve(0.30)?,
        stop_price: solve(0.50)?,
    })
}
