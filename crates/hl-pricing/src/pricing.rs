//! Black-Scholes price and delta for European options.
//!
//! Deliberately the no-dividend form: the engine is a decision-support
//! heuristic, not an exact pricer, and models neither dividends nor
//! American exercise.

use chrono::NaiveDate;

use hl_types::{HlError, HlResult, OptionKind, OptionLeg};

/// Standard normal cumulative distribution function (Abramowitz & Stegun 26.2.17).
pub fn norm_cdf(x: f64) -> f64 {
    if x >= 8.0 {
        return 1.0;
    }
    if x <= -8.0 {
        return 0.0;
    }

    let a1 = 0.254829592_f64;
    let a2 = -0.284496736_f64;
    let a3 = 1.421413741_f64;
    let a4 = -1.453152027_f64;
    let a5 = 1.061405429_f64;
    let p = 0.3275911_f64;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x_abs = x.abs();
    let t = 1.0 / (1.0 + p * x_abs);
    let y =
        1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x_abs * x_abs / 2.0).exp();

    0.5 * (1.0 + sign * y)
}

fn validate(s: f64, k: f64, t: f64, sigma: f64) -> HlResult<()> {
    if !s.is_finite() || s <= 0.0 {
        return Err(HlError::invalid_input("spot", s));
    }
    if !k.is_finite() || k <= 0.0 {
        return Err(HlError::invalid_input("strike", k));
    }
    if !t.is_finite() || t < 0.0 {
        return Err(HlError::invalid_input("time_to_expiry", t));
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(HlError::invalid_input("volatility", sigma));
    }
    Ok(())
}

fn d1(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> f64 {
    ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt())
}

/// Theoretical price of a European option.
///
/// At `t == 0` the price collapses to intrinsic value, avoiding the
/// division by zero in the closed form when time value vanishes.
pub fn price(s: f64, k: f64, t: f64, r: f64, sigma: f64, kind: OptionKind) -> HlResult<f64> {
    validate(s, k, t, sigma)?;

    if t == 0.0 {
        return Ok(match kind {
            OptionKind::Call => (s - k).max(0.0),
            OptionKind::Put => (k - s).max(0.0),
        });
    }

    let d1 = d1(s, k, t, r, sigma);
    let d2 = d1 - sigma * t.sqrt();
    let disc = (-r * t).exp();

    Ok(match kind {
        OptionKind::Call => s * norm_cdf(d1) - k * disc * norm_cdf(d2),
        OptionKind::Put => k * disc * norm_cdf(-d2) - s * norm_cdf(-d1),
    })
}

/// Black-Scholes delta.
///
/// At `t == 0` delta collapses to a step function: calls are 1 above the
/// strike and 0 below, puts -1 below and 0 above, 0 exactly at the strike.
pub fn delta(s: f64, k: f64, t: f64, r: f64, sigma: f64, kind: OptionKind) -> HlResult<f64> {
    validate(s, k, t, sigma)?;

    if t == 0.0 {
        return Ok(match kind {
            OptionKind::Call => {
                if s > k {
                    1.0
                } else {
                    0.0
                }
            }
            OptionKind::Put => {
                if s < k {
                    -1.0
                } else {
                    0.0
                }
            }
        });
    }

    let d1 = d1(s, k, t, r, sigma);
    Ok(match kind {
        OptionKind::Call => norm_cdf(d1),
        OptionKind::Put => norm_cdf(d1) - 1.0,
    })
}

/// Delta of a leg at its own underlying/volatility as of a given date.
pub fn delta_of_leg(leg: &OptionLeg, r: f64, as_of: NaiveDate) -> HlResult<f64> {
    delta(
        leg.underlying_f64(),
        leg.strike_f64(),
        leg.years_to_expiry(as_of),
        r,
        leg.implied_vol,
        leg.kind,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const T30: f64 = 30.0 / 365.0;

    #[test]
    fn test_prices_non_negative() {
        for s in [80.0, 100.0, 120.0] {
            for kind in [OptionKind::Call, OptionKind::Put] {
                let p = price(s, 100.0, T30, 0.05, 0.20, kind).unwrap();
                assert!(p >= 0.0, "price({s}, {kind:?}) = {p}");
            }
        }
    }

    #[test]
    fn test_itm_price_at_least_intrinsic() {
        let p = price(95.0, 100.0, T30, 0.05, 0.20, OptionKind::Put).unwrap();
        assert!(p >= 5.0, "put price = {p}");
        let c = price(105.0, 100.0, T30, 0.05, 0.20, OptionKind::Call).unwrap();
        assert!(c >= 5.0, "call price = {c}");
    }

    #[test]
    fn test_expired_put_is_intrinsic_exactly() {
        assert_eq!(
            price(95.0, 100.0, 0.0, 0.05, 0.20, OptionKind::Put).unwrap(),
            5.0
        );
        assert_eq!(
            price(105.0, 100.0, 0.0, 0.05, 0.20, OptionKind::Put).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_expired_delta_is_step_function() {
        let d_itm = delta(95.0, 100.0, 0.0, 0.05, 0.20, OptionKind::Put).unwrap();
        let d_otm = delta(105.0, 100.0, 0.0, 0.05, 0.20, OptionKind::Put).unwrap();
        let d_atm = delta(100.0, 100.0, 0.0, 0.05, 0.20, OptionKind::Put).unwrap();
        assert_eq!(d_itm, -1.0);
        assert_eq!(d_otm, 0.0);
        assert_eq!(d_atm, 0.0);

        assert_eq!(
            delta(105.0, 100.0, 0.0, 0.05, 0.20, OptionKind::Call).unwrap(),
            1.0
        );
    }

    #[test]
    fn test_put_call_delta_identity() {
        // delta_call - delta_put == 1 for all t > 0
        for s in [85.0, 100.0, 115.0] {
            for t in [7.0 / 365.0, T30, 0.5] {
                let dc = delta(s, 100.0, t, 0.05, 0.20, OptionKind::Call).unwrap();
                let dp = delta(s, 100.0, t, 0.05, 0.20, OptionKind::Put).unwrap();
                assert!(
                    (dc - dp - 1.0).abs() < 1e-12,
                    "identity violated at s={s}, t={t}: {dc} - {dp}"
                );
            }
        }
    }

    #[test]
    fn test_put_call_parity() {
        let c = price(100.0, 100.0, 0.5, 0.05, 0.30, OptionKind::Call).unwrap();
        let p = price(100.0, 100.0, 0.5, 0.05, 0.30, OptionKind::Put).unwrap();
        // C - P = S - K*exp(-rT)
        let rhs = 100.0 - 100.0 * (-0.05_f64 * 0.5).exp();
        assert!((c - p - rhs).abs() < 1e-6, "parity: {} vs {rhs}", c - p);
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        assert!(price(0.0, 100.0, T30, 0.05, 0.20, OptionKind::Put).is_err());
        assert!(price(100.0, -1.0, T30, 0.05, 0.20, OptionKind::Put).is_err());
        assert!(price(100.0, 100.0, T30, 0.05, 0.0, OptionKind::Put).is_err());
        assert!(delta(f64::NAN, 100.0, T30, 0.05, 0.20, OptionKind::Call).is_err());
    }

    #[test]
    fn test_delta_of_leg_matches_raw_delta() {
        use rust_decimal_macros::dec;
        let as_of = NaiveDate::from_ymd_opt(2026, 5, 20).unwrap();
        let leg = OptionLeg::new(
            OptionKind::Put,
            dec!(100),
            NaiveDate::from_ymd_opt(2026, 6, 19).unwrap(),
            dec!(2.00),
            0.20,
            dec!(97.5),
        )
        .unwrap();
        let via_leg = delta_of_leg(&leg, 0.05, as_of).unwrap();
        let raw = delta(97.5, 100.0, 30.0 / 365.0, 0.05, 0.20, OptionKind::Put).unwrap();
        assert!((via_leg - raw).abs() < 1e-12);
    }

    #[test]
    fn test_norm_cdf_boundaries() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-6);
        assert!(norm_cdf(8.0) == 1.0);
        assert!(norm_cdf(-8.0) == 0.0);
    }
}
