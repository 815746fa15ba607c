use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use core_types::{PriceBar, Simulation, Strategy, Symbol, Trade};

use crate::error::StoreError;

/// Read access to the symbol catalog. The simulation engine never mutates
/// symbols; `save` exists for catalog seeding and ingestion support.
#[async_trait]
pub trait SymbolCatalog: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Symbol>, StoreError>;

    async fn get_by_code(&self, code: &str) -> Result<Option<Symbol>, StoreError>;

    async fn save(&self, symbol: &Symbol) -> Result<(), StoreError>;
}

/// Read access to the strategy catalog, plus idempotent seeding by name.
#[async_trait]
pub trait StrategyCatalog: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Strategy>, StoreError>;

    async fn get_by_name(&self, name: &str) -> Result<Option<Strategy>, StoreError>;

    async fn save(&self, strategy: &Strategy) -> Result<(), StoreError>;
}

/// The ordered OHLCV time series per symbol.
///
/// Bars are append-mostly and safely read concurrently; "latest" and the
/// range queries assume a total order by timestamp within a symbol.
#[async_trait]
pub trait PriceSeriesStore: Send + Sync {
    /// The most recent bar for a symbol, if any.
    async fn latest(&self, symbol_id: Uuid) -> Result<Option<PriceBar>, StoreError>;

    /// Up to `limit` bars, most-recent-first.
    async fn recent(&self, symbol_id: Uuid, limit: usize) -> Result<Vec<PriceBar>, StoreError>;

    /// Bars with `start <= timestamp < end`, in chronological order.
    async fn range(
        &self,
        symbol_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceBar>, StoreError>;

    async fn save(&self, bar: &PriceBar) -> Result<(), StoreError>;

    async fn save_all(&self, bars: &[PriceBar]) -> Result<(), StoreError>;
}

/// The simulation ledger.
#[async_trait]
pub trait SimulationStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Simulation>, StoreError>;

    /// Every simulation currently in the `Active` state.
    async fn find_active(&self) -> Result<Vec<Simulation>, StoreError>;

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Simulation>, StoreError>;

    async fn save(&self, simulation: &Simulation) -> Result<(), StoreError>;

    /// Persists a simulation and its newly executed trade as one atomic unit:
    /// either both writes commit or neither is considered applied.
    async fn save_with_trade(
        &self,
        simulation: &Simulation,
        trade: &Trade,
    ) -> Result<(), StoreError>;
}

/// The trade history per simulation.
#[async_trait]
pub trait TradeStore: Send + Sync {
    async fn save(&self, trade: &Trade) -> Result<(), StoreError>;

    /// Up to `limit` trades for one simulation, most-recent-first.
    async fn recent_for_simulation(
        &self,
        simulation_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Trade>, StoreError>;

    /// Up to `limit` trades across a set of simulations, most-recent-first.
    async fn recent_for_simulations(
        &self,
        simulation_ids: &[Uuid],
        limit: usize,
    ) -> Result<Vec<Trade>, StoreError>;
}
