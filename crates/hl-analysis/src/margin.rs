//! Margin requirement and ROI per broker policy table.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use hl_types::{
    DiagonalDebitRule, HlError, HlResult, MarginProfile, OptionKind, SpreadPosition,
};

use crate::classify::{SpreadClassification, SpreadKind};

/// A profit/loss extent that may be unbounded.
///
/// Calendar/diagonal long legs and naked shorts have no cap; that is an
/// explicit sentinel here, never a large finite stand-in, and ROI math
/// special-cases it instead of dividing by it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Bound {
    Finite(Decimal),
    Unbounded,
}

impl Bound {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Bound::Unbounded)
    }

    /// The finite value, if any.
    pub fn finite(&self) -> Option<Decimal> {
        match self {
            Bound::Finite(v) => Some(*v),
            Bound::Unbounded => None,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Finite(v) => write!(f, "${v}"),
            Bound::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Capital requirement and return profile for a classified spread.
///
/// All dollar figures are per contract (100 shares).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginResult {
    /// Total capital the broker ties up for the position.
    pub required_capital: Decimal,
    /// Net debit paid up front (zero for credit spreads).
    pub net_debit_investment: Decimal,
    /// Broker margin on top of the investment (calendar/diagonal debit).
    pub additional_margin: Decimal,
    pub max_profit: Bound,
    pub max_loss: Bound,
    pub break_even: Decimal,
    /// Return over the short leg's remaining life, as a percentage.
    pub total_roi: Decimal,
    /// `total_roi` scaled to a 7-day week.
    pub weekly_roi: Decimal,
    /// `weekly_roi` x 52.
    pub annual_roi: Decimal,
    /// Days to the short leg's expiry (floored at 1).
    pub short_dte: i64,
    /// Underlying level at which to roll or exit the position.
    pub roll_trigger: Decimal,
}

const CONTRACT_SIZE: Decimal = Decimal::ONE_HUNDRED;

/// Compute capital requirement and ROI for a classified spread under a
/// broker margin profile.
///
/// The match on `SpreadKind` is exhaustive; a new kind cannot be added
/// without this function being forced to handle it.
pub fn compute_margin(
    classification: &SpreadClassification,
    position: &SpreadPosition,
    profile: &MarginProfile,
    as_of: NaiveDate,
) -> HlResult<MarginResult> {
    let short = &position.short;
    let short_dte = short.days_to_expiry(as_of);
    let width = classification.spread_width;

    let result = if classification.is_credit {
        let net_credit = classification.net_amount;
        let max_profit = Bound::Finite(net_credit * CONTRACT_SIZE);
        let max_loss = if width > Decimal::ZERO {
            Bound::Finite((width - net_credit) * CONTRACT_SIZE)
        } else {
            Bound::Unbounded
        };

        let margin = match classification.kind {
            SpreadKind::VerticalCredit => width * CONTRACT_SIZE,
            SpreadKind::DiagonalCredit => {
                width * CONTRACT_SIZE * profile.diagonal_credit_mult
            }
            // Naked, single and calendar credit carry no defined width to
            // cap the loss; margin is a percentage of the underlying.
            _ => short.underlying * profile.naked_pct * CONTRACT_SIZE,
        };

        let break_even = match short.kind {
            OptionKind::Put => short.strike - net_credit,
            OptionKind::Call => short.strike + net_credit,
        };

        let (total_roi, weekly_roi, annual_roi) =
            roi(net_credit * CONTRACT_SIZE, margin, short_dte);

        // Level at which ~30% of the credit is lost; a direct formula on
        // strike and credit, not a delta solve.
        let trigger_loss = net_credit * Decimal::new(30, 2);
        let roll_trigger = match short.kind {
            OptionKind::Put => short.strike + trigger_loss,
            OptionKind::Call => short.strike - trigger_loss,
        };

        MarginResult {
            required_capital: margin,
            net_debit_investment: Decimal::ZERO,
            additional_margin: Decimal::ZERO,
            max_profit,
            max_loss,
            break_even,
            total_roi,
            weekly_roi,
            annual_roi,
            short_dte,
            roll_trigger,
        }
    } else {
        let long = position
            .long
            .as_ref()
            .ok_or(HlError::MissingField("long_leg"))?;
        let net_debit = -classification.net_amount;
        let max_loss = Bound::Finite(net_debit * CONTRACT_SIZE);

        let (max_profit, additional_margin) = match classification.kind {
            SpreadKind::VerticalDebit => (
                Bound::Finite((width - net_debit) * CONTRACT_SIZE),
                Decimal::ZERO,
            ),
            SpreadKind::CalendarDebit => (
                // Long leg's residual value after short expiry is uncapped.
                Bound::Unbounded,
                long.premium * CONTRACT_SIZE * profile.calendar_debit_long_pct,
            ),
            SpreadKind::DiagonalDebitCall | SpreadKind::DiagonalDebitPut => {
                let extra = match profile.diagonal_debit_rule {
                    DiagonalDebitRule::WidthOrUnderlyingPct { pct } => {
                        (width * CONTRACT_SIZE).max(short.underlying * pct * CONTRACT_SIZE)
                    }
                    DiagonalDebitRule::WidthMultiple { mult } => {
                        width * CONTRACT_SIZE * mult
                    }
                };
                (Bound::Unbounded, extra)
            }
            // Credit kinds are handled in the branch above.
            SpreadKind::Naked
            | SpreadKind::Single
            | SpreadKind::VerticalCredit
            | SpreadKind::CalendarCredit
            | SpreadKind::DiagonalCredit => {
                return Err(HlError::invalid_input("kind", classification.kind))
            }
        };

        let investment = net_debit * CONTRACT_SIZE;
        let total_capital = investment + additional_margin;
        let break_even = short.strike + net_debit;

        // Unbounded max profit cannot feed an ROI; use the short premium,
        // the capturable value if the short leg expires worthless.
        let profit_base = match max_profit {
            Bound::Finite(p) => p,
            Bound::Unbounded => short.premium * CONTRACT_SIZE,
        };
        let (total_roi, weekly_roi, annual_roi) = roi(profit_base, total_capital, short_dte);

        MarginResult {
            required_capital: total_capital,
            net_debit_investment: investment,
            additional_margin,
            max_profit,
            max_loss,
            break_even,
            total_roi,
            weekly_roi,
            annual_roi,
            short_dte,
            // Debit spreads exit/roll once the short leg goes ITM.
            roll_trigger: short.strike,
        }
    };

    debug!(
        kind = %classification.kind,
        capital = %result.required_capital,
        weekly_roi = %result.weekly_roi,
        "margin computed"
    );
    Ok(result)
}

/// (total, weekly, annual) ROI percentages. Zero capital yields zero ROI
/// rather than a division panic — degenerate inputs have already been
/// warned about by the classifier.
fn roi(profit: Decimal, capital: Decimal, dte: i64) -> (Decimal, Decimal, Decimal) {
    if capital <= Decimal::ZERO {
        return (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
    }
    let total = profit / capital * Decimal::ONE_HUNDRED;
    let weekly = total / Decimal::from(dte) * Decimal::from(7);
    let annual = weekly * Decimal::from(52);
    (total, weekly, annual)
}
