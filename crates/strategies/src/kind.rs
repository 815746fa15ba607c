use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use core_types::{Strategy, StrategyParameters};

use crate::error::StrategyError;

/// The canonical catalog names each variant resolves from.
pub mod names {
    pub const MA_CROSSOVER: &str = "Moving Average Crossover";
    pub const MACD_CROSSOVER: &str = "MACD Crossover";
    /// Older catalogs seeded the MACD strategy under this longer name.
    pub const MACD_SIGNAL_LINE_CROSSOVER: &str = "MACD Signal Line Crossover";
    pub const RSI_REVERSAL: &str = "RSI Overbought/Oversold";
    pub const BOLLINGER_BANDS: &str = "Bollinger Bands";
    /// Older catalogs seeded the Bollinger strategy under this longer name.
    pub const BOLLINGER_BANDS_BREAKOUT: &str = "Bollinger Bands Breakout";
}

/// A catalog strategy resolved into a concrete, fully-typed algorithm.
///
/// Resolution happens once, when a simulation is processed; evaluation then
/// dispatches on this enum instead of re-matching strategy names per tick.
/// Names outside the closed set resolve to `Unsupported`, which always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StrategyKind {
    MaCrossover {
        fast: usize,
        slow: usize,
        buy_threshold: f64,
        sell_threshold: f64,
    },
    MacdCrossover {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    RsiReversal {
        period: usize,
        oversold: f64,
        overbought: f64,
    },
    BollingerBands {
        period: usize,
        width: f64,
    },
    Unsupported,
}

impl StrategyKind {
    /// Resolves a catalog strategy, preferring the simulation's parameter
    /// overlay over the catalog defaults.
    ///
    /// Parameter validation happens here, not at evaluation time; a
    /// nonsensical parameter set is an error rather than a silent HOLD, so a
    /// misconfigured simulation is surfaced instead of idling forever.
    pub fn resolve(
        strategy: &Strategy,
        overlay: Option<&StrategyParameters>,
    ) -> Result<Self, StrategyError> {
        let params = overlay.unwrap_or(&strategy.parameters);

        match strategy.name.as_str() {
            names::MA_CROSSOVER => {
                let fast = params.fast_period as usize;
                let slow = params.slow_period as usize;
                if fast == 0 || slow == 0 {
                    return Err(StrategyError::InvalidParameters(
                        "moving average periods must be positive".to_string(),
                    ));
                }
                if fast >= slow {
                    return Err(StrategyError::InvalidParameters(
                        "fast period must be less than slow period".to_string(),
                    ));
                }
                Ok(StrategyKind::MaCrossover {
                    fast,
                    slow,
                    buy_threshold: decimal_to_f64(params.buy_threshold),
                    sell_threshold: decimal_to_f64(params.sell_threshold),
                })
            }
            names::MACD_CROSSOVER | names::MACD_SIGNAL_LINE_CROSSOVER => {
                let fast = params.fast_period as usize;
                let slow = params.slow_period as usize;
                let signal = params.signal_period as usize;
                if fast == 0 || slow == 0 || signal == 0 {
                    return Err(StrategyError::InvalidParameters(
                        "MACD periods must be positive".to_string(),
                    ));
                }
                if fast >= slow {
                    return Err(StrategyError::InvalidParameters(
                        "fast period must be less than slow period".to_string(),
                    ));
                }
                Ok(StrategyKind::MacdCrossover { fast, slow, signal })
            }
            names::RSI_REVERSAL => {
                let period = params.fast_period as usize;
                if period == 0 {
                    return Err(StrategyError::InvalidParameters(
                        "RSI period must be positive".to_string(),
                    ));
                }
                let oversold = decimal_to_f64(params.buy_threshold);
                let overbought = decimal_to_f64(params.sell_threshold);
                if oversold >= overbought {
                    return Err(StrategyError::InvalidParameters(
                        "oversold threshold must be below overbought threshold".to_string(),
                    ));
                }
                Ok(StrategyKind::RsiReversal {
                    period,
                    oversold,
                    overbought,
                })
            }
            names::BOLLINGER_BANDS | names::BOLLINGER_BANDS_BREAKOUT => {
                let period = params.fast_period as usize;
                // The shared parameter set has no dedicated band-width field;
                // the slow period slot carries it for this strategy.
                let width = params.slow_period as f64;
                if period == 0 || width <= 0.0 {
                    return Err(StrategyError::InvalidParameters(
                        "Bollinger period and width must be positive".to_string(),
                    ));
                }
                Ok(StrategyKind::BollingerBands { period, width })
            }
            other => {
                tracing::debug!(strategy = other, "unrecognized strategy name, holding");
                Ok(StrategyKind::Unsupported)
            }
        }
    }

    /// The minimum number of bars required before this strategy can produce
    /// anything other than HOLD.
    pub fn min_bars(&self) -> usize {
        match self {
            StrategyKind::MaCrossover { slow, .. } => slow + 2,
            StrategyKind::MacdCrossover { slow, signal, .. } => slow + signal + 2,
            StrategyKind::RsiReversal { period, .. } => period + 1,
            StrategyKind::BollingerBands { period, .. } => period + 1,
            StrategyKind::Unsupported => usize::MAX,
        }
    }
}

fn decimal_to_f64(value: rust_decimal::Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
