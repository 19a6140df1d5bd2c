use serde::{Deserialize, Serialize};

use crate::broker::Broker;
use crate::errors::{HlError, HlResult};
use crate::leg::OptionLeg;

/// A spread position: a short leg plus an optional long (cover) leg.
///
/// Absence of the long leg means a naked single-leg position. When present,
/// both legs must share the option type; legs on the same underlying is the
/// caller's responsibility since the engine never sees a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadPosition {
    pub short: OptionLeg,
    pub long: Option<OptionLeg>,
    pub broker: Broker,
}

impl SpreadPosition {
    pub fn new(short: OptionLeg, long: Option<OptionLeg>, broker: Broker) -> HlResult<Self> {
        if let Some(ref long_leg) = long {
            if long_leg.kind != short.kind {
                return Err(HlError::invalid_input("long.kind", long_leg.kind));
            }
        }
        Ok(Self {
            short,
            long,
            broker,
        })
    }

    /// Convenience constructor for a naked short position.
    pub fn naked(short: OptionLeg, broker: Broker) -> Self {
        Self {
            short,
            long: None,
            broker,
        }
    }
}
