//! End-to-end engine scenarios over the in-memory store.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use configuration::TradingSettings;
use core_types::{
    InstrumentKind, NewSimulation, PriceBar, Quote, Simulation, Strategy, StrategyParameters,
    Symbol, Trade, TradeDirection, TradeStatus,
};
use engine::{
    ManualTradeRequest, ProcessOutcome, SimulationLocks, SimulationProcessor, SimulationService,
    Sweeper,
};
use market_data::{MarketDataService, ProviderChain, ProviderError, QuoteProvider};
use store::{
    MemoryStore, PriceSeriesStore, SimulationStore, StrategyCatalog, SymbolCatalog, TradeStore,
};
use strategies::names;

struct StaticProvider {
    close: Decimal,
}

#[async_trait]
impl QuoteProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_latest(&self, _symbol_code: &str) -> Result<Quote, ProviderError> {
        Ok(Quote {
            timestamp: Utc::now(),
            open: self.close,
            high: self.close,
            low: self.close,
            close: self.close,
            volume: 1_000,
            source: "static".to_string(),
        })
    }

    async fn fetch_history(
        &self,
        symbol_code: &str,
        _interval: &str,
        _range: &str,
    ) -> Result<Vec<Quote>, ProviderError> {
        Ok(vec![self.fetch_latest(symbol_code).await?])
    }
}

struct FailingProvider;

#[async_trait]
impl QuoteProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch_latest(&self, symbol_code: &str) -> Result<Quote, ProviderError> {
        Err(ProviderError::MissingData(symbol_code.to_string()))
    }

    async fn fetch_history(
        &self,
        symbol_code: &str,
        _interval: &str,
        _range: &str,
    ) -> Result<Vec<Quote>, ProviderError> {
        Err(ProviderError::MissingData(symbol_code.to_string()))
    }
}

struct Harness {
    store: Arc<MemoryStore>,
    processor: Arc<SimulationProcessor>,
    sweeper: Arc<Sweeper>,
    service: SimulationService,
    symbol: Symbol,
    strategy: Strategy,
}

async fn harness(providers: Vec<Arc<dyn QuoteProvider>>) -> Harness {
    let store = Arc::new(MemoryStore::new());

    let symbol = Symbol::new("RELIANCE", "Reliance Industries", "NSE", InstrumentKind::Equity);
    SymbolCatalog::save(store.as_ref(), &symbol).await.unwrap();

    // Small periods keep the history fixtures short; the thresholds match
    // the catalog defaults.
    let strategy = Strategy::new(
        names::MA_CROSSOVER,
        "test",
        "test",
        "test",
        "test",
        "test",
        StrategyParameters {
            fast_period: 2,
            slow_period: 4,
            signal_period: 9,
            buy_threshold: dec!(0.05),
            sell_threshold: dec!(-0.05),
            stop_loss: dec!(5.0),
        },
    );
    StrategyCatalog::save(store.as_ref(), &strategy).await.unwrap();

    let market_data = Arc::new(MarketDataService::new(
        store.clone(),
        store.clone(),
        ProviderChain::new(providers),
    ));
    let trading = TradingSettings {
        trade_fraction: dec!(0.1),
        history_window: 100,
        recent_trades_window: 5,
        duplicate_window_minutes: 60,
    };
    let locks = SimulationLocks::new();

    let processor = Arc::new(SimulationProcessor::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        market_data.clone(),
        trading.clone(),
        locks.clone(),
    ));
    let sweeper = Arc::new(Sweeper::new(
        processor.clone(),
        store.clone(),
        StdDuration::from_secs(60),
    ));
    let service = SimulationService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        market_data,
        trading,
        locks,
    );

    Harness {
        store,
        processor,
        sweeper,
        service,
        symbol,
        strategy,
    }
}

impl Harness {
    /// Stores bars for `closes` given most-recent-first, newest at "now".
    async fn push_bars(&self, closes: &[Decimal]) {
        let now = Utc::now();
        for (i, close) in closes.iter().enumerate() {
            let bar = PriceBar {
                id: Uuid::new_v4(),
                symbol_id: self.symbol.id,
                timestamp: now - Duration::minutes(i as i64),
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                volume: 10_000,
                source: "test".to_string(),
            };
            PriceSeriesStore::save(self.store.as_ref(), &bar).await.unwrap();
        }
    }

    async fn new_simulation(&self, initial: Decimal) -> Simulation {
        self.service
            .create(NewSimulation {
                user_id: "user-1".to_string(),
                symbol_id: self.symbol.id,
                strategy_id: self.strategy.id,
                initial_investment: initial,
                time_period: Some("30d".to_string()),
                reinvest_profits: false,
                parameters: None,
            })
            .await
            .unwrap()
    }

    async fn reload(&self, id: Uuid) -> Simulation {
        SimulationStore::get_by_id(self.store.as_ref(), id)
            .await
            .unwrap()
            .unwrap()
    }
}

/// Closes whose fast SMA sits more than 5% above the slow SMA, latest at 100.
fn buy_closes() -> Vec<Decimal> {
    vec![dec!(100), dec!(95), dec!(90), dec!(85), dec!(80), dec!(80)]
}

/// Closes whose fast SMA sits more than 5% below the slow SMA, latest at 120.
fn sell_closes() -> Vec<Decimal> {
    vec![dec!(120), dec!(128), dec!(136), dec!(144), dec!(152), dec!(160)]
}

#[tokio::test]
async fn buy_signal_executes_a_tenth_of_the_balance() {
    let h = harness(vec![]).await;
    h.push_bars(&buy_closes()).await;
    let sim = h.new_simulation(dec!(10000)).await;

    let outcome = h.processor.process_by_id(sim.id).await.unwrap();
    let ProcessOutcome::Traded(trade) = outcome else {
        panic!("expected a trade, got {outcome:?}");
    };

    assert_eq!(trade.direction, TradeDirection::Buy);
    assert_eq!(trade.price, dec!(100));
    assert_eq!(trade.quantity, 10);
    assert_eq!(trade.amount, dec!(1000));
    assert_eq!(trade.status, TradeStatus::Executed);
    assert!(trade.reason.contains("Moving Average Crossover"));

    let updated = h.reload(sim.id).await;
    assert_eq!(updated.current_balance, dec!(9000));
    assert_eq!(updated.profit_loss, dec!(-1000));
    assert_eq!(updated.profit_loss_pct, dec!(-10));
    assert_eq!(updated.total_trades, 1);
    assert_eq!(updated.successful_trades, 0);
}

#[tokio::test]
async fn sell_signal_closes_out_the_open_buy() {
    let h = harness(vec![]).await;
    h.push_bars(&sell_closes()).await;

    let sim = h.new_simulation(dec!(10000)).await;
    let mut funded = h.reload(sim.id).await;
    funded.set_balance(dec!(9000));
    SimulationStore::save(h.store.as_ref(), &funded).await.unwrap();

    // The open buy sits outside the suppression window but inside the
    // recent-trade window used for close-out matching.
    let mut buy = Trade::new(sim.id, TradeDirection::Buy, dec!(100), 10, "entry");
    buy.timestamp = Utc::now() - Duration::hours(2);
    buy.mark_executed();
    TradeStore::save(h.store.as_ref(), &buy).await.unwrap();

    let outcome = h.processor.process_by_id(sim.id).await.unwrap();
    let ProcessOutcome::Traded(sell) = outcome else {
        panic!("expected a trade, got {outcome:?}");
    };

    assert_eq!(sell.direction, TradeDirection::Sell);
    assert_eq!(sell.quantity, 10);
    assert_eq!(sell.amount, dec!(1200));
    assert_eq!(sell.profit_loss, Some(dec!(200)));
    assert_eq!(sell.profit_loss_pct, Some(dec!(20)));

    let updated = h.reload(sim.id).await;
    assert_eq!(updated.current_balance, dec!(10200));
    assert_eq!(updated.profit_loss, dec!(200));
    assert_eq!(updated.successful_trades, 1);
    // Only the sell went through apply_trade; the fixture buy was stored raw.
    assert_eq!(updated.total_trades, 1);
}

#[tokio::test]
async fn repeated_signal_is_suppressed_within_the_window() {
    let h = harness(vec![]).await;
    h.push_bars(&buy_closes()).await;
    let sim = h.new_simulation(dec!(10000)).await;

    let first = h.processor.process_by_id(sim.id).await.unwrap();
    assert!(matches!(first, ProcessOutcome::Traded(_)));

    // Same history, same signal, minutes later: only one trade persists.
    let second = h.processor.process_by_id(sim.id).await.unwrap();
    assert_eq!(second, ProcessOutcome::Suppressed(TradeDirection::Buy));
    assert_eq!(h.store.trade_count().await, 1);
}

#[tokio::test]
async fn sell_with_no_open_buy_is_skipped_without_a_trade() {
    let h = harness(vec![]).await;
    h.push_bars(&sell_closes()).await;
    let sim = h.new_simulation(dec!(10000)).await;

    let outcome = h.processor.process_by_id(sim.id).await.unwrap();
    assert!(matches!(outcome, ProcessOutcome::Skipped(_)));
    assert_eq!(h.store.trade_count().await, 0);

    let untouched = h.reload(sim.id).await;
    assert_eq!(untouched.current_balance, dec!(10000));
    assert_eq!(untouched.total_trades, 0);
}

#[tokio::test]
async fn insufficient_history_holds_with_no_side_effects() {
    let h = harness(vec![]).await;
    h.push_bars(&[dec!(100), dec!(101), dec!(102)]).await;
    let sim = h.new_simulation(dec!(10000)).await;

    let outcome = h.processor.process_by_id(sim.id).await.unwrap();
    assert_eq!(outcome, ProcessOutcome::Held);
    assert_eq!(h.store.trade_count().await, 0);
    assert_eq!(h.reload(sim.id).await.current_balance, dec!(10000));
}

#[tokio::test]
async fn missing_bars_trigger_a_single_provider_fetch() {
    // No bars stored; the processor pulls one bar through the provider chain
    // and then holds for lack of history.
    let h = harness(vec![Arc::new(StaticProvider { close: dec!(100) })]).await;
    let sim = h.new_simulation(dec!(10000)).await;

    let outcome = h.processor.process_by_id(sim.id).await.unwrap();
    assert_eq!(outcome, ProcessOutcome::Held);
    assert!(
        PriceSeriesStore::latest(h.store.as_ref(), h.symbol.id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn exhausted_providers_abort_only_that_simulation() {
    let h = harness(vec![Arc::new(FailingProvider)]).await;
    // This simulation's symbol has no bars and the providers are down.
    let starving = h.new_simulation(dec!(10000)).await;
    assert!(h.processor.process_by_id(starving.id).await.is_err());

    // A sweep over it still completes, recording the failure.
    let report = h.sweeper.run_sweep().await;
    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 1);
    assert!(!report.skipped_overlap);
}

#[tokio::test]
async fn sweep_isolates_a_broken_simulation_and_processes_the_rest() {
    let h = harness(vec![]).await;
    h.push_bars(&buy_closes()).await;

    let first = h.new_simulation(dec!(10000)).await;
    let third = h.new_simulation(dec!(10000)).await;

    // The middle simulation references a symbol missing from the catalog, so
    // its symbol resolution fails.
    let mut broken = h.new_simulation(dec!(10000)).await;
    broken.symbol_id = Uuid::new_v4();
    SimulationStore::save(h.store.as_ref(), &broken).await.unwrap();

    let report = h.sweeper.run_sweep().await;
    assert_eq!(report.processed, 3);
    assert_eq!(report.failed, 1);

    // The healthy simulations both traded (the second buy is not suppressed:
    // each simulation has its own trade history).
    assert_eq!(h.reload(first.id).await.total_trades, 1);
    assert_eq!(h.reload(third.id).await.total_trades, 1);
    assert_eq!(h.reload(broken.id).await.total_trades, 0);
}

#[tokio::test]
async fn sweep_skips_paused_simulations() {
    let h = harness(vec![]).await;
    h.push_bars(&buy_closes()).await;
    let sim = h.new_simulation(dec!(10000)).await;
    h.service.pause(sim.id).await.unwrap();

    let report = h.sweeper.run_sweep().await;
    assert_eq!(report.processed, 0);
    assert_eq!(h.store.trade_count().await, 0);
}

#[tokio::test]
async fn manual_trade_goes_through_the_same_ledger_rules() {
    let h = harness(vec![]).await;
    h.push_bars(&[dec!(100), dec!(100), dec!(100)]).await;
    let sim = h.new_simulation(dec!(10000)).await;

    let trade = h
        .service
        .execute_manual_trade(
            sim.id,
            ManualTradeRequest {
                direction: TradeDirection::Buy,
                reason: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(trade.amount, dec!(1000));
    assert_eq!(trade.reason, "Manual trade");
    assert_eq!(h.reload(sim.id).await.current_balance, dec!(9000));

    // Selling right back is sized by the open buy, not by the balance.
    let sell = h
        .service
        .execute_manual_trade(
            sim.id,
            ManualTradeRequest {
                direction: TradeDirection::Sell,
                reason: Some("take profit".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(sell.quantity, trade.quantity);
    assert_eq!(h.reload(sim.id).await.current_balance, dec!(10000));
}

#[tokio::test]
async fn manual_trade_rejections_surface_to_the_caller() {
    let h = harness(vec![]).await;
    h.push_bars(&[dec!(100)]).await;
    let sim = h.new_simulation(dec!(10000)).await;

    // No open buy: selling is rejected, not skipped.
    let sell = h
        .service
        .execute_manual_trade(
            sim.id,
            ManualTradeRequest {
                direction: TradeDirection::Sell,
                reason: None,
            },
        )
        .await;
    assert!(sell.is_err());

    // A paused simulation rejects trades outright.
    h.service.pause(sim.id).await.unwrap();
    let buy = h
        .service
        .execute_manual_trade(
            sim.id,
            ManualTradeRequest {
                direction: TradeDirection::Buy,
                reason: None,
            },
        )
        .await;
    assert!(buy.is_err());
    assert_eq!(h.store.trade_count().await, 0);
}

#[tokio::test]
async fn manual_duplicate_is_rejected() {
    let h = harness(vec![]).await;
    h.push_bars(&[dec!(100)]).await;
    let sim = h.new_simulation(dec!(10000)).await;

    h.service
        .execute_manual_trade(
            sim.id,
            ManualTradeRequest {
                direction: TradeDirection::Buy,
                reason: None,
            },
        )
        .await
        .unwrap();

    let repeat = h
        .service
        .execute_manual_trade(
            sim.id,
            ManualTradeRequest {
                direction: TradeDirection::Buy,
                reason: None,
            },
        )
        .await;
    assert!(repeat.is_err());
    assert_eq!(h.store.trade_count().await, 1);
}

#[tokio::test]
async fn lifecycle_round_trip_through_the_service() {
    let h = harness(vec![]).await;
    let sim = h.new_simulation(dec!(5000)).await;

    let paused = h.service.pause(sim.id).await.unwrap();
    assert_eq!(paused.status, core_types::SimulationStatus::Paused);

    let resumed = h.service.resume(sim.id).await.unwrap();
    assert_eq!(resumed.status, core_types::SimulationStatus::Active);

    let stopped = h.service.stop(sim.id).await.unwrap();
    assert_eq!(stopped.status, core_types::SimulationStatus::Completed);
    assert!(stopped.ended_at.is_some());

    // Stopping again is an invalid transition.
    assert!(h.service.stop(sim.id).await.is_err());
}
