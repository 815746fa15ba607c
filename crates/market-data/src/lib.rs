//! # Meridian Market Data
//!
//! The bridge to external quote providers and the read-through service the
//! engine uses to get price history.
//!
//! ## Architectural Principles
//!
//! - **Redundant providers, typed fallback:** quotes come from an ordered
//!   [`ProviderChain`] of [`QuoteProvider`] implementations. A provider
//!   failure moves on to the next one; exhausting the chain is a normal,
//!   typed terminal value (`ProviderError::AllProvidersFailed`), not an
//!   exception to catch.
//! - **Quotes become bars at the boundary:** providers only know exchange
//!   tickers, so they return `Quote`s; [`MarketDataService`] stamps the
//!   symbol id on and persists the resulting `PriceBar`s.

pub mod alpha_vantage;
pub mod chain;
pub mod error;
pub mod provider;
pub mod service;
pub mod yahoo;

pub use alpha_vantage::AlphaVantageProvider;
pub use chain::ProviderChain;
pub use error::{MarketDataError, ProviderError};
pub use provider::QuoteProvider;
pub use service::MarketDataService;
pub use yahoo::YahooProvider;
