//! In-memory store backing the engine's tests and local experimentation.
//!
//! All five store traits are implemented over a single `RwLock`-guarded
//! state, so `save_with_trade` is trivially atomic: both writes happen under
//! one write guard.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use core_types::{PriceBar, Simulation, Strategy, Symbol, Trade};

use crate::error::StoreError;
use crate::traits::{
    PriceSeriesStore, SimulationStore, StrategyCatalog, SymbolCatalog, TradeStore,
};

#[derive(Default)]
struct State {
    symbols: HashMap<Uuid, Symbol>,
    strategies: HashMap<Uuid, Strategy>,
    bars: HashMap<Uuid, Vec<PriceBar>>,
    simulations: HashMap<Uuid, Simulation>,
    trades: Vec<Trade>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted trades, across all simulations.
    pub async fn trade_count(&self) -> usize {
        self.state.read().await.trades.len()
    }
}

#[async_trait]
impl SymbolCatalog for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Symbol>, StoreError> {
        Ok(self.state.read().await.symbols.get(&id).cloned())
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<Symbol>, StoreError> {
        let state = self.state.read().await;
        Ok(state.symbols.values().find(|s| s.code == code).cloned())
    }

    async fn save(&self, symbol: &Symbol) -> Result<(), StoreError> {
        self.state
            .write()
            .await
            .symbols
            .insert(symbol.id, symbol.clone());
        Ok(())
    }
}

#[async_trait]
impl StrategyCatalog for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Strategy>, StoreError> {
        Ok(self.state.read().await.strategies.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Strategy>, StoreError> {
        let state = self.state.read().await;
        Ok(state.strategies.values().find(|s| s.name == name).cloned())
    }

    async fn save(&self, strategy: &Strategy) -> Result<(), StoreError> {
        self.state
            .write()
            .await
            .strategies
            .insert(strategy.id, strategy.clone());
        Ok(())
    }
}

#[async_trait]
impl PriceSeriesStore for MemoryStore {
    async fn latest(&self, symbol_id: Uuid) -> Result<Option<PriceBar>, StoreError> {
        let state = self.state.read().await;
        let latest = state
            .bars
            .get(&symbol_id)
            .and_then(|bars| bars.iter().max_by_key(|b| b.timestamp))
            .cloned();
        Ok(latest)
    }

    async fn recent(&self, symbol_id: Uuid, limit: usize) -> Result<Vec<PriceBar>, StoreError> {
        let state = self.state.read().await;
        let mut bars = state.bars.get(&symbol_id).cloned().unwrap_or_default();
        bars.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        bars.truncate(limit);
        Ok(bars)
    }

    async fn range(
        &self,
        symbol_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceBar>, StoreError> {
        let state = self.state.read().await;
        let mut bars: Vec<PriceBar> = state
            .bars
            .get(&symbol_id)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.timestamp >= start && b.timestamp < end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        bars.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(bars)
    }

    async fn save(&self, bar: &PriceBar) -> Result<(), StoreError> {
        self.state
            .write()
            .await
            .bars
            .entry(bar.symbol_id)
            .or_default()
            .push(bar.clone());
        Ok(())
    }

    async fn save_all(&self, bars: &[PriceBar]) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        for bar in bars {
            state.bars.entry(bar.symbol_id).or_default().push(bar.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl SimulationStore for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Simulation>, StoreError> {
        Ok(self.state.read().await.simulations.get(&id).cloned())
    }

    async fn find_active(&self) -> Result<Vec<Simulation>, StoreError> {
        let state = self.state.read().await;
        let mut active: Vec<Simulation> = state
            .simulations
            .values()
            .filter(|s| s.is_active())
            .cloned()
            .collect();
        // Stable iteration order keeps sweep tests deterministic.
        active.sort_by_key(|s| s.started_at);
        Ok(active)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Simulation>, StoreError> {
        let state = self.state.read().await;
        let mut owned: Vec<Simulation> = state
            .simulations
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|s| s.started_at);
        Ok(owned)
    }

    async fn save(&self, simulation: &Simulation) -> Result<(), StoreError> {
        self.state
            .write()
            .await
            .simulations
            .insert(simulation.id, simulation.clone());
        Ok(())
    }

    async fn save_with_trade(
        &self,
        simulation: &Simulation,
        trade: &Trade,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.simulations.insert(simulation.id, simulation.clone());
        state.trades.push(trade.clone());
        Ok(())
    }
}

#[async_trait]
impl TradeStore for MemoryStore {
    async fn save(&self, trade: &Trade) -> Result<(), StoreError> {
        self.state.write().await.trades.push(trade.clone());
        Ok(())
    }

    async fn recent_for_simulation(
        &self,
        simulation_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Trade>, StoreError> {
        let state = self.state.read().await;
        let mut trades: Vec<Trade> = state
            .trades
            .iter()
            .filter(|t| t.simulation_id == simulation_id)
            .cloned()
            .collect();
        trades.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        trades.truncate(limit);
        Ok(trades)
    }

    async fn recent_for_simulations(
        &self,
        simulation_ids: &[Uuid],
        limit: usize,
    ) -> Result<Vec<Trade>, StoreError> {
        let state = self.state.read().await;
        let mut trades: Vec<Trade> = state
            .trades
            .iter()
            .filter(|t| simulation_ids.contains(&t.simulation_id))
            .cloned()
            .collect();
        trades.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        trades.truncate(limit);
        Ok(trades)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use core_types::{InstrumentKind, NewSimulation, TradeDirection};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn bar(symbol_id: Uuid, minutes_ago: i64, close: Decimal) -> PriceBar {
        PriceBar {
            id: Uuid::new_v4(),
            symbol_id,
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100,
            source: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn latest_and_recent_follow_timestamp_order() {
        let store = MemoryStore::new();
        let symbol_id = Uuid::new_v4();
        // Several traits define `save`; qualify the price-series one.
        PriceSeriesStore::save(&store, &bar(symbol_id, 10, dec!(100))).await.unwrap();
        PriceSeriesStore::save(&store, &bar(symbol_id, 1, dec!(105))).await.unwrap();
        PriceSeriesStore::save(&store, &bar(symbol_id, 5, dec!(102))).await.unwrap();

        let latest = store.latest(symbol_id).await.unwrap().unwrap();
        assert_eq!(latest.close, dec!(105));

        let recent = store.recent(symbol_id, 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].close, dec!(105));
        assert_eq!(recent[1].close, dec!(102));
    }

    #[tokio::test]
    async fn range_is_chronological_and_half_open() {
        let store = MemoryStore::new();
        let symbol_id = Uuid::new_v4();
        let b1 = bar(symbol_id, 30, dec!(1));
        let b2 = bar(symbol_id, 20, dec!(2));
        let b3 = bar(symbol_id, 10, dec!(3));
        store.save_all(&[b1.clone(), b2.clone(), b3.clone()]).await.unwrap();

        let range = store
            .range(symbol_id, b1.timestamp, b3.timestamp)
            .await
            .unwrap();
        assert_eq!(range.len(), 2);
        assert_eq!(range[0].close, dec!(1));
        assert_eq!(range[1].close, dec!(2));
    }

    #[tokio::test]
    async fn find_active_skips_paused_and_completed() {
        let store = MemoryStore::new();
        let new = |status_fn: fn(&mut Simulation)| {
            let mut sim = Simulation::create(NewSimulation {
                user_id: "u".to_string(),
                symbol_id: Uuid::new_v4(),
                strategy_id: Uuid::new_v4(),
                initial_investment: dec!(1000),
                time_period: None,
                reinvest_profits: false,
                parameters: None,
            });
            status_fn(&mut sim);
            sim
        };

        let active = new(|_| {});
        let paused = new(|s| s.pause().unwrap());
        let stopped = new(|s| s.stop().unwrap());
        for sim in [&active, &paused, &stopped] {
            SimulationStore::save(&store, sim).await.unwrap();
        }

        let found = store.find_active().await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, active.id);
    }

    #[tokio::test]
    async fn save_with_trade_persists_both() {
        let store = MemoryStore::new();
        let sim = Simulation::create(NewSimulation {
            user_id: "u".to_string(),
            symbol_id: Uuid::new_v4(),
            strategy_id: Uuid::new_v4(),
            initial_investment: dec!(1000),
            time_period: None,
            reinvest_profits: false,
            parameters: None,
        });
        let trade = Trade::new(sim.id, TradeDirection::Buy, dec!(10), 5, "test");

        store.save_with_trade(&sim, &trade).await.unwrap();

        assert!(SimulationStore::get_by_id(&store, sim.id).await.unwrap().is_some());
        let trades = store.recent_for_simulation(sim.id, 10).await.unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].id, trade.id);

        let symbol = Symbol::new("RELIANCE", "Reliance Industries", "NSE", InstrumentKind::Equity);
        SymbolCatalog::save(&store, &symbol).await.unwrap();
        assert!(store.get_by_code("RELIANCE").await.unwrap().is_some());
    }
}
