//! Per-simulation processing: resolve, evaluate, trade, persist.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use configuration::TradingSettings;
use core_types::{Simulation, Trade, TradeDirection};
use market_data::MarketDataService;
use store::{SimulationStore, StrategyCatalog, SymbolCatalog, TradeStore};
use strategies::StrategyKind;

use crate::accounting::{is_duplicate, plan_trade};
use crate::error::EngineError;
use crate::locks::SimulationLocks;

/// What processing one simulation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// The strategy held; nothing was written.
    Held,
    /// A signal fired but an identical one was seen within the suppression
    /// window.
    Suppressed(TradeDirection),
    /// A signal fired but the ledger rejected the trade (sizing, no open
    /// position, simulation no longer active).
    Skipped(String),
    /// A trade was executed and persisted with the updated simulation.
    Traded(Trade),
}

/// Runs the processing pipeline for a single simulation.
pub struct SimulationProcessor {
    symbols: Arc<dyn SymbolCatalog>,
    strategies: Arc<dyn StrategyCatalog>,
    simulations: Arc<dyn SimulationStore>,
    trades: Arc<dyn TradeStore>,
    market_data: Arc<MarketDataService>,
    trading: TradingSettings,
    locks: SimulationLocks,
}

impl SimulationProcessor {
    pub fn new(
        symbols: Arc<dyn SymbolCatalog>,
        strategies: Arc<dyn StrategyCatalog>,
        simulations: Arc<dyn SimulationStore>,
        trades: Arc<dyn TradeStore>,
        market_data: Arc<MarketDataService>,
        trading: TradingSettings,
        locks: SimulationLocks,
    ) -> Self {
        Self {
            symbols,
            strategies,
            simulations,
            trades,
            market_data,
            trading,
            locks,
        }
    }

    /// Processes one simulation by id, serialized against any other in-flight
    /// work on the same simulation.
    pub async fn process_by_id(&self, id: Uuid) -> Result<ProcessOutcome, EngineError> {
        let _guard = self.locks.acquire(id).await;
        // Loaded inside the lock so a trade applied by a concurrent caller is
        // visible here.
        let simulation = self
            .simulations
            .get_by_id(id)
            .await?
            .ok_or(EngineError::SimulationNotFound(id))?;
        self.process_locked(&simulation).await
    }

    async fn process_locked(&self, simulation: &Simulation) -> Result<ProcessOutcome, EngineError> {
        let symbol = self
            .symbols
            .get_by_id(simulation.symbol_id)
            .await?
            .ok_or(EngineError::SymbolNotFound(simulation.symbol_id))?;
        let strategy = self
            .strategies
            .get_by_id(simulation.strategy_id)
            .await?
            .ok_or(EngineError::StrategyNotFound(simulation.strategy_id))?;

        let latest = self
            .market_data
            .ensure_latest(&symbol)
            .await?
            .ok_or(EngineError::NoMarketData(symbol.id))?;
        let history = self
            .market_data
            .history(symbol.id, self.trading.history_window)
            .await?;

        let kind = StrategyKind::resolve(&strategy, simulation.parameters.as_ref())?;
        let decision = kind.evaluate(&history);
        let Some(direction) = decision.direction() else {
            return Ok(ProcessOutcome::Held);
        };
        let reason = decision.reason().unwrap_or(&strategy.name);

        let recent = self
            .trades
            .recent_for_simulation(simulation.id, self.trading.recent_trades_window)
            .await?;
        let window = Duration::minutes(self.trading.duplicate_window_minutes);
        if is_duplicate(direction, &recent, Utc::now(), window) {
            tracing::debug!(
                simulation = %simulation.id,
                %direction,
                "suppressing repeated signal"
            );
            return Ok(ProcessOutcome::Suppressed(direction));
        }

        let mut trade = match plan_trade(
            simulation,
            direction,
            latest.close,
            reason,
            &recent,
            self.trading.trade_fraction,
        ) {
            Ok(trade) => trade,
            Err(error) if error.is_rejection() => {
                tracing::debug!(simulation = %simulation.id, %error, "trade rejected");
                return Ok(ProcessOutcome::Skipped(error.to_string()));
            }
            Err(error) => return Err(error),
        };

        trade.mark_executed();
        let mut updated = simulation.clone();
        updated.apply_trade(&trade);
        self.simulations.save_with_trade(&updated, &trade).await?;

        tracing::info!(
            simulation = %simulation.id,
            %direction,
            price = %trade.price,
            quantity = trade.quantity,
            amount = %trade.amount,
            balance = %updated.current_balance,
            "executed trade"
        );
        Ok(ProcessOutcome::Traded(trade))
    }
}
