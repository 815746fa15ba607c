//! # Meridian Database Crate
//!
//! The Postgres adapter behind the `store` trait contracts.
//!
//! ## Architectural Principles
//!
//! - **Adapter, not authority:** all SQL lives here; the rest of the system
//!   only sees the `store` traits.
//! - **Atomic paired writes:** `save_with_trade` wraps the simulation upsert
//!   and the trade insert in one transaction, honoring the engine's
//!   consistency contract.
//! - **Asynchronous & pooled:** all operations are async over a shared
//!   `PgPool`.

pub mod connection;
pub mod error;
pub mod repository;

pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::PgStore;
