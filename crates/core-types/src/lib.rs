//! # Meridian Core Types
//!
//! This crate defines the domain model shared by every other crate in the
//! system: tradable symbols, OHLCV price bars, strategy descriptors,
//! paper-trading simulations, and the trades they produce.
//!
//! ## Architectural Principles
//!
//! - **Layer 0:** This crate has no knowledge of databases, HTTP, or
//!   scheduling. Everything here is plain data plus the entity behavior that
//!   must hold everywhere (lifecycle transitions, balance accounting).
//! - **Invariants live with the data:** a `Simulation`'s profit/loss is never
//!   written directly; it is recomputed from the balance and the initial
//!   investment inside this crate, so no caller can leave the three fields
//!   inconsistent.

pub mod decision;
pub mod enums;
pub mod error;
pub mod market;
pub mod simulation;
pub mod strategy;
pub mod trade;

// Re-export the core types to provide a clean public API.
pub use decision::Decision;
pub use enums::{InstrumentKind, SimulationStatus, TradeDirection, TradeStatus};
pub use error::CoreError;
pub use market::{PriceBar, Quote, Symbol};
pub use simulation::{NewSimulation, Simulation, SimulationUpdate};
pub use strategy::{Strategy, StrategyParameters};
pub use trade::Trade;
