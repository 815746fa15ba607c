//! Idempotent seeding of the default strategy catalog.

use rust_decimal_macros::dec;

use core_types::{Strategy, StrategyParameters};
use store::StrategyCatalog;
use strategies::names;

use crate::error::EngineError;

/// Seeds the four built-in strategies, skipping any name that already
/// exists. Returns how many were inserted.
pub async fn seed_default_strategies(
    catalog: &dyn StrategyCatalog,
) -> Result<usize, EngineError> {
    let mut seeded = 0;
    for strategy in default_strategies() {
        if catalog.get_by_name(&strategy.name).await?.is_some() {
            continue;
        }
        catalog.save(&strategy).await?;
        tracing::info!(strategy = %strategy.name, "seeded strategy");
        seeded += 1;
    }
    Ok(seeded)
}

fn default_strategies() -> Vec<Strategy> {
    vec![
        Strategy::new(
            names::MA_CROSSOVER,
            "Generates buy signals when a shorter-term moving average crosses \
             above a longer-term moving average, and sell signals on the \
             opposite cross.",
            "Medium-term",
            "60-70%",
            "Trending markets",
            "Medium",
            StrategyParameters {
                fast_period: 12,
                slow_period: 26,
                signal_period: 9,
                buy_threshold: dec!(0.05),
                sell_threshold: dec!(-0.05),
                stop_loss: dec!(5.0),
            },
        ),
        Strategy::new(
            names::RSI_REVERSAL,
            "Generates buy signals when the Relative Strength Index falls \
             below an oversold threshold and sell signals when it rises above \
             an overbought threshold.",
            "Short-term",
            "55-65%",
            "Range-bound markets",
            "Medium-High",
            StrategyParameters {
                fast_period: 14,
                slow_period: 26,
                signal_period: 9,
                buy_threshold: dec!(30),
                sell_threshold: dec!(70),
                stop_loss: dec!(5.0),
            },
        ),
        Strategy::new(
            names::MACD_CROSSOVER,
            "Generates buy signals when the MACD line crosses above its \
             signal line, and sell signals when it crosses below.",
            "Medium-term",
            "65-75%",
            "Trending markets",
            "Medium",
            StrategyParameters {
                fast_period: 12,
                slow_period: 26,
                signal_period: 9,
                buy_threshold: dec!(0),
                sell_threshold: dec!(0),
                stop_loss: dec!(5.0),
            },
        ),
        Strategy::new(
            names::BOLLINGER_BANDS,
            "Generates buy signals when the price closes below the lower \
             Bollinger band and sell signals when it closes above the upper \
             band. The slow-period slot carries the band width.",
            "Short-term",
            "60-70%",
            "Volatile markets",
            "High",
            StrategyParameters {
                fast_period: 20,
                slow_period: 2,
                signal_period: 9,
                buy_threshold: dec!(0),
                sell_threshold: dec!(0),
                stop_loss: dec!(5.0),
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;
    use strategies::StrategyKind;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = MemoryStore::new();
        assert_eq!(seed_default_strategies(&store).await.unwrap(), 4);
        assert_eq!(seed_default_strategies(&store).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn every_seeded_strategy_resolves() {
        let store = MemoryStore::new();
        seed_default_strategies(&store).await.unwrap();
        for name in [
            names::MA_CROSSOVER,
            names::RSI_REVERSAL,
            names::MACD_CROSSOVER,
            names::BOLLINGER_BANDS,
        ] {
            let strategy = store.get_by_name(name).await.unwrap().unwrap();
            let kind = StrategyKind::resolve(&strategy, None).unwrap();
            assert_ne!(kind, StrategyKind::Unsupported, "{name}");
        }
    }
}
