//! Lifecycle operations and the on-demand trade entry point.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Deserialize;
use uuid::Uuid;

use configuration::TradingSettings;
use core_types::{NewSimulation, Simulation, SimulationUpdate, Trade, TradeDirection};
use market_data::MarketDataService;
use store::{SimulationStore, StrategyCatalog, SymbolCatalog, TradeStore};

use crate::accounting::{is_duplicate, plan_trade};
use crate::error::EngineError;
use crate::locks::SimulationLocks;

/// A manual trade request: the direction is the caller's, the sizing and the
/// atomic persistence rules are the same as for strategy-driven trades.
#[derive(Debug, Clone, Deserialize)]
pub struct ManualTradeRequest {
    pub direction: TradeDirection,
    pub reason: Option<String>,
}

/// The driving layer's interface to simulations: create, lifecycle
/// transitions, partial updates, queries, and manual trades.
///
/// Shares [`SimulationLocks`] with the processor so manual writes never race
/// the scheduled sweep on the same simulation.
pub struct SimulationService {
    symbols: Arc<dyn SymbolCatalog>,
    strategies: Arc<dyn StrategyCatalog>,
    simulations: Arc<dyn SimulationStore>,
    trades: Arc<dyn TradeStore>,
    market_data: Arc<MarketDataService>,
    trading: TradingSettings,
    locks: SimulationLocks,
}

impl SimulationService {
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

    /// Creates a simulation after checking its symbol and strategy exist.
    pub async fn create(&self, new: NewSimulation) -> Result<Simulation, EngineError> {
        self.symbols
            .get_by_id(new.symbol_id)
            .await?
            .ok_or(EngineError::SymbolNotFound(new.symbol_id))?;
        self.strategies
            .get_by_id(new.strategy_id)
            .await?
            .ok_or(EngineError::StrategyNotFound(new.strategy_id))?;

        let simulation = Simulation::create(new);
        self.simulations.save(&simulation).await?;
        tracing::info!(simulation = %simulation.id, user = %simulation.user_id, "created simulation");
        Ok(simulation)
    }

    pub async fn get(&self, id: Uuid) -> Result<Simulation, EngineError> {
        self.simulations
            .get_by_id(id)
            .await?
            .ok_or(EngineError::SimulationNotFound(id))
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Simulation>, EngineError> {
        Ok(self.simulations.find_by_user(user_id).await?)
    }

    pub async fn pause(&self, id: Uuid) -> Result<Simulation, EngineError> {
        self.transition(id, |sim| sim.pause()).await
    }

    pub async fn resume(&self, id: Uuid) -> Result<Simulation, EngineError> {
        self.transition(id, |sim| sim.resume()).await
    }

    pub async fn stop(&self, id: Uuid) -> Result<Simulation, EngineError> {
        self.transition(id, |sim| sim.stop()).await
    }

    /// Applies a partial update under the simulation's lock. Terminal status
    /// changes stamp the end timestamp through the entity itself.
    pub async fn update(&self, id: Uuid, update: SimulationUpdate) -> Result<Simulation, EngineError> {
        let _guard = self.locks.acquire(id).await;
        let mut simulation = self.get(id).await?;
        simulation.apply_update(update);
        self.simulations.save(&simulation).await?;
        Ok(simulation)
    }

    pub async fn recent_trades(&self, id: Uuid, limit: usize) -> Result<Vec<Trade>, EngineError> {
        // Surface a NotFound for unknown simulations rather than an empty list.
        self.get(id).await?;
        Ok(self.trades.recent_for_simulation(id, limit).await?)
    }

    /// Recent trades across every simulation owned by a user.
    pub async fn recent_trades_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Trade>, EngineError> {
        let owned = self.simulations.find_by_user(user_id).await?;
        if owned.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = owned.iter().map(|s| s.id).collect();
        Ok(self.trades.recent_for_simulations(&ids, limit).await?)
    }

    /// Executes a trade at the latest price, bypassing the strategy
    /// evaluator but keeping sizing, duplicate suppression, and the atomic
    /// simulation+trade write.
    ///
    /// Unlike the sweep, rejections here propagate to the caller.
    pub async fn execute_manual_trade(
        &self,
        id: Uuid,
        request: ManualTradeRequest,
    ) -> Result<Trade, EngineError> {
        let _guard = self.locks.acquire(id).await;
        let simulation = self.get(id).await?;

        let symbol = self
            .symbols
            .get_by_id(simulation.symbol_id)
            .await?
            .ok_or(EngineError::SymbolNotFound(simulation.symbol_id))?;
        let latest = self
            .market_data
            .ensure_latest(&symbol)
            .await?
            .ok_or(EngineError::NoMarketData(symbol.id))?;

        let recent = self
            .trades
            .recent_for_simulation(id, self.trading.recent_trades_window)
            .await?;
        let window = Duration::minutes(self.trading.duplicate_window_minutes);
        if is_duplicate(request.direction, &recent, Utc::now(), window) {
            return Err(EngineError::DuplicateSignal(request.direction));
        }

        let reason = request.reason.unwrap_or_else(|| "Manual trade".to_string());
        let mut trade = plan_trade(
            &simulation,
            request.direction,
            latest.close,
            &reason,
            &recent,
            self.trading.trade_fraction,
        )?;

        trade.mark_executed();
        let mut updated = simulation.clone();
        updated.apply_trade(&trade);
        self.simulations.save_with_trade(&updated, &trade).await?;

        tracing::info!(
            simulation = %id,
            direction = %trade.direction,
            amount = %trade.amount,
            "executed manual trade"
        );
        Ok(trade)
    }

    async fn transition<F>(&self, id: Uuid, apply: F) -> Result<Simulation, EngineError>
    where
        F: FnOnce(&mut Simulation) -> Result<(), core_types::CoreError>,
    {
        let _guard = self.locks.acquire(id).await;
        let mut simulation = self.get(id).await?;
        apply(&mut simulation)?;
        self.simulations.save(&simulation).await?;
        tracing::info!(simulation = %id, status = %simulation.status, "simulation transitioned");
        Ok(simulation)
    }
}
