//! Spread structural classification.
//!
//! The taxonomy is exhaustive over (same expiry x width > 0 x credit/debit);
//! no other category is ever produced, and margin logic downstream matches
//! on it exhaustively.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use hl_types::{OptionKind, SpreadPosition};

/// Closed spread taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpreadKind {
    /// Short leg only; no cover.
    Naked,
    /// Same strike, same expiry — effectively a single option.
    Single,
    VerticalCredit,
    VerticalDebit,
    CalendarCredit,
    CalendarDebit,
    DiagonalCredit,
    /// Diagonal debit on calls: Poor Man's Covered Call.
    DiagonalDebitCall,
    /// Diagonal debit on puts: Poor Man's Covered Put.
    DiagonalDebitPut,
}

impl SpreadKind {
    pub fn is_debit(&self) -> bool {
        matches!(
            self,
            SpreadKind::VerticalDebit
                | SpreadKind::CalendarDebit
                | SpreadKind::DiagonalDebitCall
                | SpreadKind::DiagonalDebitPut
        )
    }
}

impl fmt::Display for SpreadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SpreadKind::Naked => "Naked",
            SpreadKind::Single => "Single",
            SpreadKind::VerticalCredit => "Vertical CREDIT Spread",
            SpreadKind::VerticalDebit => "Vertical DEBIT Spread",
            SpreadKind::CalendarCredit => "Calendar CREDIT Spread",
            SpreadKind::CalendarDebit => "Calendar DEBIT Spread",
            SpreadKind::DiagonalCredit => "Diagonal CREDIT Spread",
            SpreadKind::DiagonalDebitCall => "PMCC (Poor Man's Covered Call)",
            SpreadKind::DiagonalDebitPut => "PMCP (Poor Man's Covered Put)",
        };
        write!(f, "{label}")
    }
}

/// Derived, read-only classification of a spread position.
///
/// Computed purely from the legs; never stored independently of them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadClassification {
    pub kind: SpreadKind,
    pub is_credit: bool,
    /// |short strike - long strike|; zero for naked/single/calendar.
    pub spread_width: Decimal,
    pub same_expiry: bool,
    /// Net per-share amount, short premium minus long premium.
    /// Positive = credit received, negative = debit paid.
    pub net_amount: Decimal,
}

/// Classify a spread from its legs' strikes, premiums and expiries.
pub fn classify(position: &SpreadPosition) -> SpreadClassification {
    let short = &position.short;

    let long = match &position.long {
        // No long leg, or a long leg priced at zero, is a naked short.
        None => {
            return naked_classification(short.premium);
        }
        Some(long) if long.premium.is_zero() => {
            return naked_classification(short.premium);
        }
        Some(long) => long,
    };

    let spread_width = (short.strike - long.strike).abs();
    let same_expiry = short.expiry == long.expiry;
    let net_amount = short.premium - long.premium;
    let is_credit = net_amount > Decimal::ZERO;

    let kind = if same_expiry {
        if spread_width.is_zero() {
            if !net_amount.is_zero() {
                // Degenerate: identical legs with a premium mismatch behave
                // like a naked single option downstream.
                warn!(
                    %net_amount,
                    "degenerate spread: zero width with non-zero net premium"
                );
            }
            SpreadKind::Single
        } else if is_credit {
            SpreadKind::VerticalCredit
        } else {
            SpreadKind::VerticalDebit
        }
    } else if spread_width.is_zero() {
        if is_credit {
            SpreadKind::CalendarCredit
        } else {
            SpreadKind::CalendarDebit
        }
    } else if is_credit {
        SpreadKind::DiagonalCredit
    } else {
        match short.kind {
            OptionKind::Call => SpreadKind::DiagonalDebitCall,
            OptionKind::Put => SpreadKind::DiagonalDebitPut,
        }
    };

    SpreadClassification {
        kind,
        is_credit,
        spread_width,
        same_expiry,
        net_amount,
    }
}

fn naked_classification(short_premium: Decimal) -> SpreadClassification {
    SpreadClassification {
        kind: SpreadKind::Naked,
        is_credit: true,
        spread_width: Decimal::ZERO,
        same_expiry: true,
        net_amount: short_premium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hl_types::{Broker, OptionLeg};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn leg(
        kind: OptionKind,
        strike: Decimal,
        expiry: NaiveDate,
        premium: Decimal,
    ) -> OptionLeg {
        OptionLeg::new(kind, strike, expiry, premium, 0.18, dec!(100)).unwrap()
    }

    fn put_spread(
        short_strike: Decimal,
        short_premium: Decimal,
        short_exp: NaiveDate,
        long_strike: Decimal,
        long_premium: Decimal,
        long_exp: NaiveDate,
    ) -> SpreadPosition {
        SpreadPosition::new(
            leg(OptionKind::Put, short_strike, short_exp, short_premium),
            Some(leg(OptionKind::Put, long_strike, long_exp, long_premium)),
            Broker::Ibkr,
        )
        .unwrap()
    }

    #[test]
    fn test_vertical_credit_put() {
        let exp = date(2026, 6, 19);
        let pos = put_spread(dec!(100), dec!(2.00), exp, dec!(95), dec!(0.80), exp);
        let c = classify(&pos);
        assert_eq!(c.kind, SpreadKind::VerticalCredit);
        assert!(c.is_credit);
        assert_eq!(c.spread_width, dec!(5));
        assert!(c.same_expiry);
        assert_eq!(c.net_amount, dec!(1.20));
    }

    #[test]
    fn test_vertical_debit() {
        let exp = date(2026, 6, 19);
        let pos = put_spread(dec!(95), dec!(0.80), exp, dec!(100), dec!(2.00), exp);
        let c = classify(&pos);
        assert_eq!(c.kind, SpreadKind::VerticalDebit);
        assert!(!c.is_credit);
        assert_eq!(c.net_amount, dec!(-1.20));
    }

    #[test]
    fn test_no_long_leg_is_naked() {
        let pos = SpreadPosition::naked(
            leg(OptionKind::Put, dec!(100), date(2026, 6, 19), dec!(2.00)),
            Broker::Ibkr,
        );
        let c = classify(&pos);
        assert_eq!(c.kind, SpreadKind::Naked);
        assert!(c.is_credit);
        // Net amount is the full short premium.
        assert_eq!(c.net_amount, dec!(2.00));
        assert_eq!(c.spread_width, Decimal::ZERO);
    }

    #[test]
    fn test_zero_premium_long_leg_is_naked() {
        let exp = date(2026, 6, 19);
        let pos = put_spread(dec!(100), dec!(2.00), exp, dec!(95), dec!(0), exp);
        assert_eq!(classify(&pos).kind, SpreadKind::Naked);
    }

    #[test]
    fn test_same_strike_same_expiry_is_single() {
        let exp = date(2026, 6, 19);
        let pos = put_spread(dec!(100), dec!(2.00), exp, dec!(100), dec!(1.50), exp);
        let c = classify(&pos);
        assert_eq!(c.kind, SpreadKind::Single);
        assert!(c.is_credit);
    }

    #[test]
    fn test_calendar_spreads() {
        let near = date(2026, 6, 19);
        let far = date(2026, 7, 17);
        let credit = put_spread(dec!(100), dec!(2.00), near, dec!(100), dec!(1.20), far);
        assert_eq!(classify(&credit).kind, SpreadKind::CalendarCredit);

        let debit = put_spread(dec!(100), dec!(1.20), near, dec!(100), dec!(2.00), far);
        assert_eq!(classify(&debit).kind, SpreadKind::CalendarDebit);
    }

    #[test]
    fn test_diagonal_credit() {
        let near = date(2026, 6, 19);
        let far = date(2026, 7, 17);
        let pos = put_spread(dec!(100), dec!(3.00), near, dec!(95), dec!(1.00), far);
        assert_eq!(classify(&pos).kind, SpreadKind::DiagonalCredit);
    }

    #[test]
    fn test_diagonal_debit_is_pmcc_or_pmcp() {
        let near = date(2026, 6, 19);
        let far = date(2026, 12, 18);

        let pmcp = put_spread(dec!(95), dec!(1.00), near, dec!(100), dec!(6.00), far);
        assert_eq!(classify(&pmcp).kind, SpreadKind::DiagonalDebitPut);

        let pmcc = SpreadPosition::new(
            leg(OptionKind::Call, dec!(105), near, dec!(1.00)),
            Some(leg(OptionKind::Call, dec!(95), far, dec!(8.00))),
            Broker::Ibkr,
        )
        .unwrap();
        assert_eq!(classify(&pmcc).kind, SpreadKind::DiagonalDebitCall);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(
            SpreadKind::DiagonalDebitCall.to_string(),
            "PMCC (Poor Man's Covered Call)"
        );
        assert_eq!(SpreadKind::VerticalCredit.to_string(), "Vertical CREDIT Spread");
    }

    #[test]
    fn test_classification_serializes() {
        let exp = date(2026, 6, 19);
        let pos = put_spread(dec!(100), dec!(2.00), exp, dec!(95), dec!(0.80), exp);
        let c = classify(&pos);
        let json = serde_json::to_string(&c).unwrap();
        let back: SpreadClassification = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
