//! # Meridian Simulation Engine
//!
//! The orchestration layer: given the catalogs, the price series, and the
//! provider chain, this crate evaluates each active simulation's strategy,
//! sizes and applies trades against the virtual balance, and drives the
//! scheduled sweep.
//!
//! ## Architectural Principles
//!
//! - **Fault isolation per simulation:** a failure while processing one
//!   simulation is logged with its id and never aborts the sweep.
//! - **One writer per simulation:** the scheduled sweep and the on-demand
//!   entry points (manual trades, process-now) serialize on a per-simulation
//!   async lock, so a balance is never raced.
//! - **Single-slot sweeps:** a tick that fires while the previous sweep is
//!   still running is skipped through a try-acquire gate, never overlapped.
//! - **Atomic trade application:** the updated simulation and its new trade
//!   are persisted through `SimulationStore::save_with_trade`; there is no
//!   code path that writes one without the other.

pub mod accounting;
pub mod catalog;
pub mod error;
pub mod locks;
pub mod processor;
pub mod service;
pub mod sweep;

pub use error::EngineError;
pub use locks::SimulationLocks;
pub use processor::{ProcessOutcome, SimulationProcessor};
pub use service::{ManualTradeRequest, SimulationService};
pub use sweep::{SweepReport, Sweeper};
