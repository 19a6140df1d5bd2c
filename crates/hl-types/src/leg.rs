use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{HlError, HlResult};

/// Option type — call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    /// The opposite option type, used when proposing an offsetting leg.
    pub fn opposite(&self) -> Self {
        match self {
            OptionKind::Call => OptionKind::Put,
            OptionKind::Put => OptionKind::Call,
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Call => write!(f, "CALL"),
            OptionKind::Put => write!(f, "PUT"),
        }
    }
}

/// One option contract within a position.
///
/// Immutable value once created; every recomputation builds a fresh leg
/// rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionLeg {
    /// Call or put.
    pub kind: OptionKind,
    /// Strike price (positive).
    pub strike: Decimal,
    /// Expiry date.
    pub expiry: NaiveDate,
    /// Premium per share (non-negative).
    pub premium: Decimal,
    /// Annualised implied volatility (e.g. 0.18 = 18 %, positive).
    pub implied_vol: f64,
    /// Current underlying price (positive).
    pub underlying: Decimal,
}

impl OptionLeg {
    /// Validating constructor. Non-positive strike/underlying/vol or a
    /// negative premium is rejected with `InvalidInput`.
    pub fn new(
        kind: OptionKind,
        strike: Decimal,
        expiry: NaiveDate,
        premium: Decimal,
        implied_vol: f64,
        underlying: Decimal,
    ) -> HlResult<Self> {
        if strike <= Decimal::ZERO {
            return Err(HlError::invalid_input("strike", strike));
        }
        if premium < Decimal::ZERO {
            return Err(HlError::invalid_input("premium", premium));
        }
        if !implied_vol.is_finite() || implied_vol <= 0.0 {
            return Err(HlError::invalid_input("implied_vol", implied_vol));
        }
        if underlying <= Decimal::ZERO {
            return Err(HlError::invalid_input("underlying", underlying));
        }
        Ok(Self {
            kind,
            strike,
            expiry,
            premium,
            implied_vol,
            underlying,
        })
    }

    /// Calendar days until expiry, floored at 1 so ROI scaling never
    /// divides by zero on expiry day.
    pub fn days_to_expiry(&self, as_of: NaiveDate) -> i64 {
        (self.expiry - as_of).num_days().max(1)
    }

    /// Years until expiry for model math. Returns 0 once expired.
    pub fn years_to_expiry(&self, as_of: NaiveDate) -> f64 {
        let days = (self.expiry - as_of).num_days();
        if days <= 0 {
            0.0
        } else {
            days as f64 / 365.0
        }
    }

    /// Absolute distance between underlying and strike.
    pub fn distance_to_money(&self) -> Decimal {
        (self.underlying - self.strike).abs()
    }

    /// Strike as `f64` for pricing-model calls.
    pub fn strike_f64(&self) -> f64 {
        self.strike.to_f64().unwrap_or(0.0)
    }

    /// Underlying as `f64` for pricing-model calls.
    pub fn underlying_f64(&self) -> f64 {
        self.underlying.to_f64().unwrap_or(0.0)
    }
}

impl fmt::Display for OptionLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} @ {}",
            self.expiry.format("%Y-%m-%d"),
            self.strike,
            self.kind,
            self.premium,
        )
    }
}
