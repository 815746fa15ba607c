//! # Meridian Store Interfaces
//!
//! Repository-style collaborator traits for everything the simulation engine
//! reads and writes: the symbol and strategy catalogs, the price-bar time
//! series, and the simulation/trade ledger.
//!
//! ## Architectural Principles
//!
//! - **Ports, not adapters:** this crate defines the contracts; the
//!   `database` crate provides the Postgres adapter and [`memory::MemoryStore`]
//!   provides the in-process double used by tests.
//! - **Atomicity is part of the contract:** a trade and its simulation's
//!   balance effect commit together through
//!   [`SimulationStore::save_with_trade`]; there is no API to apply one
//!   without the other.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use traits::{
    PriceSeriesStore, SimulationStore, StrategyCatalog, SymbolCatalog, TradeStore,
};
