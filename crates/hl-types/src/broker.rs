use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported broker margin-rule profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Broker {
    Ibkr,
    Saxo,
}

impl Broker {
    /// The margin policy table for this broker.
    ///
    /// The margin calculator branches only on the profile fields, never on
    /// the broker itself; supporting another broker means adding a row here.
    pub fn margin_profile(&self) -> MarginProfile {
        match self {
            Broker::Ibkr => MarginProfile {
                naked_pct: Decimal::new(10, 2),              // 10% of underlying
                diagonal_credit_mult: Decimal::new(12, 1),   // width x 1.2
                calendar_debit_long_pct: Decimal::new(15, 2), // 15% of long premium
                diagonal_debit_rule: DiagonalDebitRule::WidthOrUnderlyingPct {
                    pct: Decimal::new(5, 2), // max(width, 5% of underlying)
                },
            },
            Broker::Saxo => MarginProfile {
                naked_pct: Decimal::new(15, 2),
                diagonal_credit_mult: Decimal::new(12, 1),
                // Long leg fully covers the short; no extra calendar margin.
                calendar_debit_long_pct: Decimal::ZERO,
                diagonal_debit_rule: DiagonalDebitRule::WidthMultiple {
                    mult: Decimal::new(15, 1),
                },
            },
        }
    }
}

impl fmt::Display for Broker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Broker::Ibkr => write!(f, "IBKR"),
            Broker::Saxo => write!(f, "SAXO"),
        }
    }
}

/// How additional margin for a diagonal debit spread (PMCC/PMCP) is derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DiagonalDebitRule {
    /// The larger of spread width and a percentage of the underlying.
    WidthOrUnderlyingPct { pct: Decimal },
    /// Spread width scaled by a fixed multiple.
    WidthMultiple { mult: Decimal },
}

/// Per-broker margin percentages and multipliers.
///
/// A policy table, not a universal formula: the values differ by broker but
/// the calculator's control flow is identical for every profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginProfile {
    /// Percentage of underlying required for naked short positions.
    pub naked_pct: Decimal,
    /// Width multiplier for diagonal credit spreads.
    pub diagonal_credit_mult: Decimal,
    /// Extra margin for calendar debit spreads, as a share of long premium.
    pub calendar_debit_long_pct: Decimal,
    /// Extra margin rule for diagonal debit spreads.
    pub diagonal_debit_rule: DiagonalDebitRule,
}
