use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use core_types::{CoreError, TradeDirection};
use market_data::MarketDataError;
use store::StoreError;
use strategies::StrategyError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Simulation {0} not found")]
    SimulationNotFound(Uuid),

    #[error("Symbol {0} not found")]
    SymbolNotFound(Uuid),

    #[error("Strategy {0} not found")]
    StrategyNotFound(Uuid),

    #[error("No market data available for symbol {0}")]
    NoMarketData(Uuid),

    #[error("Simulation {0} is not active")]
    NotActive(Uuid),

    #[error("Invalid trade price {0}")]
    InvalidPrice(Decimal),

    #[error("Trade quantity rounded to zero at price {0}")]
    ZeroQuantity(Decimal),

    #[error("Insufficient funds: trade amount {required} exceeds balance {balance}")]
    InsufficientFunds { required: Decimal, balance: Decimal },

    #[error("No open buy trade to close")]
    NoOpenPosition,

    #[error("Duplicate {0} signal within the suppression window")]
    DuplicateSignal(TradeDirection),

    #[error(transparent)]
    Lifecycle(#[from] CoreError),

    #[error(transparent)]
    Strategy(#[from] StrategyError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}

impl EngineError {
    /// True for errors that reject a single trade rather than signal a
    /// broken collaborator. The sweep downgrades these to a skip; the direct
    /// API surfaces them to the caller.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            EngineError::NotActive(_)
                | EngineError::InvalidPrice(_)
                | EngineError::ZeroQuantity(_)
                | EngineError::InsufficientFunds { .. }
                | EngineError::NoOpenPosition
                | EngineError::DuplicateSignal(_)
                | EngineError::Lifecycle(_)
        )
    }
}
