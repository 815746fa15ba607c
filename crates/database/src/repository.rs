use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use sqlx::postgres::PgPool;
use uuid::Uuid;

use core_types::{PriceBar, Simulation, Strategy, StrategyParameters, Symbol, Trade};
use store::{
    PriceSeriesStore, SimulationStore, StoreError, StrategyCatalog, SymbolCatalog, TradeStore,
};

use crate::error::DbError;

/// The Postgres-backed implementation of every store trait. Encapsulates all
/// SQL; callers only ever see the trait contracts.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore` over a shared connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// --- Row structs ------------------------------------------------------------
// Enum-ish columns are stored as text and parsed on the way out; a value that
// fails to parse is a Decode error, not a silent default.

#[derive(Debug, FromRow)]
struct SymbolRow {
    id: Uuid,
    code: String,
    name: String,
    exchange: String,
    kind: String,
    sector: Option<String>,
    industry: Option<String>,
    active: bool,
}

impl TryFrom<SymbolRow> for Symbol {
    type Error = DbError;

    fn try_from(row: SymbolRow) -> Result<Self, Self::Error> {
        Ok(Symbol {
            id: row.id,
            code: row.code,
            name: row.name,
            exchange: row.exchange,
            kind: row.kind.parse().map_err(|_| decode("symbol kind"))?,
            sector: row.sector,
            industry: row.industry,
            active: row.active,
        })
    }
}

#[derive(Debug, FromRow)]
struct StrategyRow {
    id: Uuid,
    name: String,
    description: String,
    time_frame: String,
    success_rate: String,
    best_market_condition: String,
    risk_rating: String,
    created_at: DateTime<Utc>,
    parameters: JsonValue,
}

impl TryFrom<StrategyRow> for Strategy {
    type Error = DbError;

    fn try_from(row: StrategyRow) -> Result<Self, Self::Error> {
        let parameters: StrategyParameters = serde_json::from_value(row.parameters)
            .map_err(|e| DbError::Decode(e.to_string()))?;
        Ok(Strategy {
            id: row.id,
            name: row.name,
            description: row.description,
            time_frame: row.time_frame,
            success_rate: row.success_rate,
            best_market_condition: row.best_market_condition,
            risk_rating: row.risk_rating,
            created_at: row.created_at,
            parameters,
        })
    }
}

#[derive(Debug, FromRow)]
struct PriceBarRow {
    id: Uuid,
    symbol_id: Uuid,
    timestamp: DateTime<Utc>,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: i64,
    source: String,
}

impl From<PriceBarRow> for PriceBar {
    fn from(row: PriceBarRow) -> Self {
        PriceBar {
            id: row.id,
            symbol_id: row.symbol_id,
            timestamp: row.timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            source: row.source,
        }
    }
}

#[derive(Debug, FromRow)]
struct SimulationRow {
    id: Uuid,
    user_id: String,
    symbol_id: Uuid,
    strategy_id: Uuid,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    status: String,
    initial_investment: Decimal,
    current_balance: Decimal,
    profit_loss: Decimal,
    profit_loss_pct: Decimal,
    total_trades: i32,
    successful_trades: i32,
    time_period: Option<String>,
    reinvest_profits: bool,
    parameters: Option<JsonValue>,
}

impl TryFrom<SimulationRow> for Simulation {
    type Error = DbError;

    fn try_from(row: SimulationRow) -> Result<Self, Self::Error> {
        let parameters = row
            .parameters
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| DbError::Decode(e.to_string()))?;
        Ok(Simulation {
            id: row.id,
            user_id: row.user_id,
            symbol_id: row.symbol_id,
            strategy_id: row.strategy_id,
            started_at: row.started_at,
            ended_at: row.ended_at,
            status: row.status.parse().map_err(|_| decode("simulation status"))?,
            initial_investment: row.initial_investment,
            current_balance: row.current_balance,
            profit_loss: row.profit_loss,
            profit_loss_pct: row.profit_loss_pct,
            total_trades: row.total_trades,
            successful_trades: row.successful_trades,
            time_period: row.time_period,
            reinvest_profits: row.reinvest_profits,
            parameters,
        })
    }
}

#[derive(Debug, FromRow)]
struct TradeRow {
    id: Uuid,
    simulation_id: Uuid,
    timestamp: DateTime<Utc>,
    direction: String,
    price: Decimal,
    quantity: i64,
    amount: Decimal,
    profit_loss: Option<Decimal>,
    profit_loss_pct: Option<Decimal>,
    status: String,
    reason: String,
}

impl TryFrom<TradeRow> for Trade {
    type Error = DbError;

    fn try_from(row: TradeRow) -> Result<Self, Self::Error> {
        Ok(Trade {
            id: row.id,
            simulation_id: row.simulation_id,
            timestamp: row.timestamp,
            direction: row.direction.parse().map_err(|_| decode("trade direction"))?,
            price: row.price,
            quantity: row.quantity,
            amount: row.amount,
            profit_loss: row.profit_loss,
            profit_loss_pct: row.profit_loss_pct,
            status: row.status.parse().map_err(|_| decode("trade status"))?,
            reason: row.reason,
        })
    }
}

fn decode(what: &str) -> DbError {
    DbError::Decode(format!("unrecognized {what}"))
}

fn backend(err: impl std::fmt::Display) -> StoreError {
    StoreError::backend(err)
}

// --- Trait implementations --------------------------------------------------

#[async_trait]
impl SymbolCatalog for PgStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Symbol>, StoreError> {
        let row = sqlx::query_as::<_, SymbolRow>(
            "SELECT id, code, name, exchange, kind, sector, industry, active \
             FROM symbols WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        row.map(Symbol::try_from).transpose().map_err(backend)
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<Symbol>, StoreError> {
        let row = sqlx::query_as::<_, SymbolRow>(
            "SELECT id, code, name, exchange, kind, sector, industry, active \
             FROM symbols WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        row.map(Symbol::try_from).transpose().map_err(backend)
    }

    async fn save(&self, symbol: &Symbol) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO symbols (id, code, name, exchange, kind, sector, industry, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = EXCLUDED.name, exchange = EXCLUDED.exchange, \
                 kind = EXCLUDED.kind, sector = EXCLUDED.sector, \
                 industry = EXCLUDED.industry, active = EXCLUDED.active",
        )
        .bind(symbol.id)
        .bind(&symbol.code)
        .bind(&symbol.name)
        .bind(&symbol.exchange)
        .bind(symbol.kind.to_string())
        .bind(&symbol.sector)
        .bind(&symbol.industry)
        .bind(symbol.active)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }
}

#[async_trait]
impl StrategyCatalog for PgStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Strategy>, StoreError> {
        let row = sqlx::query_as::<_, StrategyRow>(
            "SELECT id, name, description, time_frame, success_rate, \
                    best_market_condition, risk_rating, created_at, parameters \
             FROM strategies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        row.map(Strategy::try_from).transpose().map_err(backend)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Strategy>, StoreError> {
        let row = sqlx::query_as::<_, StrategyRow>(
            "SELECT id, name, description, time_frame, success_rate, \
                    best_market_condition, risk_rating, created_at, parameters \
             FROM strategies WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        row.map(Strategy::try_from).transpose().map_err(backend)
    }

    async fn save(&self, strategy: &Strategy) -> Result<(), StoreError> {
        let parameters = serde_json::to_value(&strategy.parameters).map_err(backend)?;
        sqlx::query(
            "INSERT INTO strategies (id, name, description, time_frame, success_rate, \
                                     best_market_condition, risk_rating, created_at, parameters) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (name) DO UPDATE SET \
                 description = EXCLUDED.description, time_frame = EXCLUDED.time_frame, \
                 success_rate = EXCLUDED.success_rate, \
                 best_market_condition = EXCLUDED.best_market_condition, \
                 risk_rating = EXCLUDED.risk_rating, parameters = EXCLUDED.parameters",
        )
        .bind(strategy.id)
        .bind(&strategy.name)
        .bind(&strategy.description)
        .bind(&strategy.time_frame)
        .bind(&strategy.success_rate)
        .bind(&strategy.best_market_condition)
        .bind(&strategy.risk_rating)
        .bind(strategy.created_at)
        .bind(parameters)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }
}

#[async_trait]
impl PriceSeriesStore for PgStore {
    async fn latest(&self, symbol_id: Uuid) -> Result<Option<PriceBar>, StoreError> {
        let row = sqlx::query_as::<_, PriceBarRow>(
            "SELECT id, symbol_id, timestamp, open, high, low, close, volume, source \
             FROM price_bars WHERE symbol_id = $1 \
             ORDER BY timestamp DESC LIMIT 1",
        )
        .bind(symbol_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        Ok(row.map(PriceBar::from))
    }

    async fn recent(&self, symbol_id: Uuid, limit: usize) -> Result<Vec<PriceBar>, StoreError> {
        let rows = sqlx::query_as::<_, PriceBarRow>(
            "SELECT id, symbol_id, timestamp, open, high, low, close, volume, source \
             FROM price_bars WHERE symbol_id = $1 \
             ORDER BY timestamp DESC LIMIT $2",
        )
        .bind(symbol_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows.into_iter().map(PriceBar::from).collect())
    }

    async fn range(
        &self,
        symbol_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceBar>, StoreError> {
        let rows = sqlx::query_as::<_, PriceBarRow>(
            "SELECT id, symbol_id, timestamp, open, high, low, close, volume, source \
             FROM price_bars \
             WHERE symbol_id = $1 AND timestamp >= $2 AND timestamp < $3 \
             ORDER BY timestamp ASC",
        )
        .bind(symbol_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows.into_iter().map(PriceBar::from).collect())
    }

    async fn save(&self, bar: &PriceBar) -> Result<(), StoreError> {
        insert_bar(&self.pool, bar).await.map_err(backend)
    }

    async fn save_all(&self, bars: &[PriceBar]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        for bar in bars {
            insert_bar(&mut *tx, bar).await.map_err(backend)?;
        }
        tx.commit().await.map_err(backend)?;
        Ok(())
    }
}

/// Idempotent bar insert: re-ingesting the same observation is a no-op.
async fn insert_bar<'e, E>(executor: E, bar: &PriceBar) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query(
        "INSERT INTO price_bars (id, symbol_id, timestamp, open, high, low, close, volume, source) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (symbol_id, timestamp, source) DO NOTHING",
    )
    .bind(bar.id)
    .bind(bar.symbol_id)
    .bind(bar.timestamp)
    .bind(bar.open)
    .bind(bar.high)
    .bind(bar.low)
    .bind(bar.close)
    .bind(bar.volume)
    .bind(&bar.source)
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl SimulationStore for PgStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Simulation>, StoreError> {
        let row = sqlx::query_as::<_, SimulationRow>(
            "SELECT id, user_id, symbol_id, strategy_id, started_at, ended_at, status, \
                    initial_investment, current_balance, profit_loss, profit_loss_pct, \
                    total_trades, successful_trades, time_period, reinvest_profits, parameters \
             FROM simulations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        row.map(Simulation::try_from).transpose().map_err(backend)
    }

    async fn find_active(&self) -> Result<Vec<Simulation>, StoreError> {
        let rows = sqlx::query_as::<_, SimulationRow>(
            "SELECT id, user_id, symbol_id, strategy_id, started_at, ended_at, status, \
                    initial_investment, current_balance, profit_loss, profit_loss_pct, \
                    total_trades, successful_trades, time_period, reinvest_profits, parameters \
             FROM simulations WHERE status = 'active' ORDER BY started_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        rows.into_iter()
            .map(|row| Simulation::try_from(row).map_err(backend))
            .collect()
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Simulation>, StoreError> {
        let rows = sqlx::query_as::<_, SimulationRow>(
            "SELECT id, user_id, symbol_id, strategy_id, started_at, ended_at, status, \
                    initial_investment, current_balance, profit_loss, profit_loss_pct, \
                    total_trades, successful_trades, time_period, reinvest_profits, parameters \
             FROM simulations WHERE user_id = $1 ORDER BY started_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        rows.into_iter()
            .map(|row| Simulation::try_from(row).map_err(backend))
            .collect()
    }

    async fn save(&self, simulation: &Simulation) -> Result<(), StoreError> {
        upsert_simulation(&self.pool, simulation).await.map_err(backend)
    }

    async fn save_with_trade(
        &self,
        simulation: &Simulation,
        trade: &Trade,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        upsert_simulation(&mut *tx, simulation).await.map_err(backend)?;
        insert_trade(&mut *tx, trade).await.map_err(backend)?;
        tx.commit().await.map_err(backend)?;
        Ok(())
    }
}

async fn upsert_simulation<'e, E>(executor: E, simulation: &Simulation) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let parameters = simulation
        .parameters
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    sqlx::query(
        "INSERT INTO simulations (id, user_id, symbol_id, strategy_id, started_at, ended_at, \
                                  status, initial_investment, current_balance, profit_loss, \
                                  profit_loss_pct, total_trades, successful_trades, time_period, \
                                  reinvest_profits, parameters) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
         ON CONFLICT (id) DO UPDATE SET \
             ended_at = EXCLUDED.ended_at, status = EXCLUDED.status, \
             current_balance = EXCLUDED.current_balance, profit_loss = EXCLUDED.profit_loss, \
             profit_loss_pct = EXCLUDED.profit_loss_pct, total_trades = EXCLUDED.total_trades, \
             successful_trades = EXCLUDED.successful_trades, parameters = EXCLUDED.parameters",
    )
    .bind(simulation.id)
    .bind(&simulation.user_id)
    .bind(simulation.symbol_id)
    .bind(simulation.strategy_id)
    .bind(simulation.started_at)
    .bind(simulation.ended_at)
    .bind(simulation.status.to_string())
    .bind(simulation.initial_investment)
    .bind(simulation.current_balance)
    .bind(simulation.profit_loss)
    .bind(simulation.profit_loss_pct)
    .bind(simulation.total_trades)
    .bind(simulation.successful_trades)
    .bind(&simulation.time_period)
    .bind(simulation.reinvest_profits)
    .bind(parameters)
    .execute(executor)
    .await?;
    Ok(())
}

async fn insert_trade<'e, E>(executor: E, trade: &Trade) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query(
        "INSERT INTO trades (id, simulation_id, timestamp, direction, price, quantity, amount, \
                             profit_loss, profit_loss_pct, status, reason) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         ON CONFLICT (id) DO UPDATE SET status = EXCLUDED.status",
    )
    .bind(trade.id)
    .bind(trade.simulation_id)
    .bind(trade.timestamp)
    .bind(trade.direction.to_string())
    .bind(trade.price)
    .bind(trade.quantity)
    .bind(trade.amount)
    .bind(trade.profit_loss)
    .bind(trade.profit_loss_pct)
    .bind(trade.status.to_string())
    .bind(&trade.reason)
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl TradeStore for PgStore {
    async fn save(&self, trade: &Trade) -> Result<(), StoreError> {
        insert_trade(&self.pool, trade).await.map_err(backend)
    }

    async fn recent_for_simulation(
        &self,
        simulation_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Trade>, StoreError> {
        let rows = sqlx::query_as::<_, TradeRow>(
            "SELECT id, simulation_id, timestamp, direction, price, quantity, amount, \
                    profit_loss, profit_loss_pct, status, reason \
             FROM trades WHERE simulation_id = $1 \
             ORDER BY timestamp DESC LIMIT $2",
        )
        .bind(simulation_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        rows.into_iter()
            .map(|row| Trade::try_from(row).map_err(backend))
            .collect()
    }

    async fn recent_for_simulations(
        &self,
        simulation_ids: &[Uuid],
        limit: usize,
    ) -> Result<Vec<Trade>, StoreError> {
        let rows = sqlx::query_as::<_, TradeRow>(
            "SELECT id, simulation_id, timestamp, direction, price, quantity, amount, \
                    profit_loss, profit_loss_pct, status, reason \
             FROM trades WHERE simulation_id = ANY($1) \
             ORDER BY timestamp DESC LIMIT $2",
        )
        .bind(simulation_ids)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        rows.into_iter()
            .map(|row| Trade::try_from(row).map_err(backend))
            .collect()
    }
}
