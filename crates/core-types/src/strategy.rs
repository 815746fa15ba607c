use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named trading algorithm descriptor from the strategy catalog.
///
/// The name is the unique identity and drives resolution into a concrete
/// evaluator variant. The display fields (`time_frame`, `success_rate`,
/// `best_market_condition`, `risk_rating`) are presentation-only and never
/// consulted during evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub time_frame: String,
    pub success_rate: String,
    pub best_market_condition: String,
    pub risk_rating: String,
    pub created_at: DateTime<Utc>,
    pub parameters: StrategyParameters,
}

impl Strategy {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        time_frame: impl Into<String>,
        success_rate: impl Into<String>,
        best_market_condition: impl Into<String>,
        risk_rating: impl Into<String>,
        parameters: StrategyParameters,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            time_frame: time_frame.into(),
            success_rate: success_rate.into(),
            best_market_condition: best_market_condition.into(),
            risk_rating: risk_rating.into(),
            created_at: Utc::now(),
            parameters,
        }
    }
}

/// The shared parameter set for all catalog strategies.
///
/// The meaning of each field depends on the strategy that consumes it (e.g.
/// the RSI strategy reads `fast_period` as its lookback and the thresholds as
/// oversold/overbought levels). Simulations may carry an overlay of this
/// struct that takes precedence over the catalog values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParameters {
    pub fast_period: u32,
    pub slow_period: u32,
    pub signal_period: u32,
    pub buy_threshold: Decimal,
    pub sell_threshold: Decimal,
    pub stop_loss: Decimal,
}
