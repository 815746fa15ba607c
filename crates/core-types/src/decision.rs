use serde::{Deserialize, Serialize};

use crate::enums::TradeDirection;

/// The outcome of evaluating a strategy against recent price history.
///
/// `Hold` is a normal value, not an error: insufficient history, an
/// unrecognized strategy, and "no condition met" all collapse into it.
/// Non-hold decisions carry a human-readable reason naming the strategy and
/// the condition that triggered, which ends up on the persisted trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decision {
    Buy { reason: String },
    Sell { reason: String },
    Hold,
}

impl Decision {
    /// The trade direction this decision maps to, if any.
    pub fn direction(&self) -> Option<TradeDirection> {
        match self {
            Decision::Buy { .. } => Some(TradeDirection::Buy),
            Decision::Sell { .. } => Some(TradeDirection::Sell),
            Decision::Hold => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Decision::Buy { reason } | Decision::Sell { reason } => Some(reason),
            Decision::Hold => None,
        }
    }
}
