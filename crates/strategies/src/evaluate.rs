use rust_decimal::prelude::ToPrimitive;

use core_types::{Decision, PriceBar};
use indicators::{bollinger, macd, rsi, signal_line, sma};

use crate::kind::StrategyKind;

impl StrategyKind {
    /// Evaluates the strategy against recent bars ordered most-recent-first.
    ///
    /// Insufficient history always yields `Hold`; a non-hold decision names
    /// the strategy and the triggering value in its reason.
    pub fn evaluate(&self, bars: &[PriceBar]) -> Decision {
        if bars.is_empty() || bars.len() < self.min_bars() {
            return Decision::Hold;
        }

        // Indicator math runs on f64; the precision trade-off is accepted at
        // this boundary, the ledger itself stays in Decimal.
        let closes: Vec<f64> = bars
            .iter()
            .map(|bar| bar.close.to_f64().unwrap_or(f64::NAN))
            .collect();

        match *self {
            StrategyKind::MaCrossover {
                fast,
                slow,
                buy_threshold,
                sell_threshold,
            } => ma_crossover(&closes, fast, slow, buy_threshold, sell_threshold),
            StrategyKind::MacdCrossover { fast, slow, .. } => macd_crossover(&closes, fast, slow),
            StrategyKind::RsiReversal {
                period,
                oversold,
                overbought,
            } => rsi_reversal(&closes, period, oversold, overbought),
            StrategyKind::BollingerBands { period, width } => {
                bollinger_breakout(&closes, period, width)
            }
            StrategyKind::Unsupported => Decision::Hold,
        }
    }
}

fn ma_crossover(
    closes: &[f64],
    fast: usize,
    slow: usize,
    buy_threshold: f64,
    sell_threshold: f64,
) -> Decision {
    let (Some(fast_now), Some(slow_now), Some(fast_prev), Some(slow_prev)) = (
        sma(closes, fast),
        sma(closes, slow),
        sma(&closes[1..], fast),
        sma(&closes[1..], slow),
    ) else {
        return Decision::Hold;
    };

    // Normalized distance between the averages; the threshold form catches
    // strong divergence even without a fresh cross.
    let crossover = if slow_now == 0.0 {
        0.0
    } else {
        (fast_now - slow_now) / slow_now
    };

    let crossed_up = fast_prev <= slow_prev && fast_now > slow_now;
    let crossed_down = fast_prev >= slow_prev && fast_now < slow_now;

    if crossed_up {
        Decision::Buy {
            reason: format!(
                "Moving Average Crossover: fast SMA {fast_now:.2} crossed above slow SMA {slow_now:.2}"
            ),
        }
    } else if crossover > buy_threshold {
        Decision::Buy {
            reason: format!(
                "Moving Average Crossover: crossover value {crossover:.4} above buy threshold {buy_threshold:.4}"
            ),
        }
    } else if crossed_down {
        Decision::Sell {
            reason: format!(
                "Moving Average Crossover: fast SMA {fast_now:.2} crossed below slow SMA {slow_now:.2}"
            ),
        }
    } else if crossover < sell_threshold {
        Decision::Sell {
            reason: format!(
                "Moving Average Crossover: crossover value {crossover:.4} below sell threshold {sell_threshold:.4}"
            ),
        }
    } else {
        Decision::Hold
    }
}

fn macd_crossover(closes: &[f64], fast: usize, slow: usize) -> Decision {
    let Some(line) = macd(closes, fast, slow) else {
        return Decision::Hold;
    };
    let signal = signal_line(line);

    if line.previous <= signal.previous && line.current > signal.current {
        Decision::Buy {
            reason: format!(
                "MACD Crossover: MACD {:.4} crossed above signal line {:.4}",
                line.current, signal.current
            ),
        }
    } else if line.previous >= signal.previous && line.current < signal.current {
        Decision::Sell {
            reason: format!(
                "MACD Crossover: MACD {:.4} crossed below signal line {:.4}",
                line.current, signal.current
            ),
        }
    } else {
        Decision::Hold
    }
}

fn rsi_reversal(closes: &[f64], period: usize, oversold: f64, overbought: f64) -> Decision {
    let value = rsi(closes, period);

    if value < oversold {
        Decision::Buy {
            reason: format!(
                "RSI Overbought/Oversold: RSI {value:.2} below oversold threshold {oversold:.2}"
            ),
        }
    } else if value > overbought {
        Decision::Sell {
            reason: format!(
                "RSI Overbought/Oversold: RSI {value:.2} above overbought threshold {overbought:.2}"
            ),
        }
    } else {
        Decision::Hold
    }
}

fn bollinger_breakout(closes: &[f64], period: usize, width: f64) -> Decision {
    let Some(bands) = bollinger(closes, period, width) else {
        return Decision::Hold;
    };
    let current = closes[0];

    if current < bands.lower {
        Decision::Buy {
            reason: format!(
                "Bollinger Bands: close {current:.2} below lower band {:.2}",
                bands.lower
            ),
        }
    } else if current > bands.upper {
        Decision::Sell {
            reason: format!(
                "Bollinger Bands: close {current:.2} above upper band {:.2}",
                bands.upper
            ),
        }
    } else {
        Decision::Hold
    }
}
