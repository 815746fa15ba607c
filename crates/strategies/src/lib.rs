//! # Meridian Strategy Library
//!
//! This crate turns catalog strategy descriptors into trading decisions.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** A pure logic crate. It has no knowledge of stores,
//!   providers, or scheduling; it depends only on `core-types` and
//!   `indicators`.
//! - **Resolve once, evaluate many:** the catalog's string-named `Strategy`
//!   (plus an optional per-simulation parameter overlay) is resolved into a
//!   closed [`StrategyKind`] enum exactly once. Evaluation dispatches on the
//!   enum, not on strings, and each variant carries its own typed parameters
//!   validated at construction.
//! - **HOLD is not an error:** insufficient history and unrecognized
//!   strategy names both evaluate to `Decision::Hold`.

pub mod error;
pub mod kind;

mod evaluate;

pub use error::StrategyError;
pub use kind::StrategyKind;
pub use kind::names;
