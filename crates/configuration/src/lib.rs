//! # Meridian Configuration
//!
//! Typed application settings loaded from `config.toml` with environment
//! overrides (prefix `MERIDIAN_`, `__` as the section separator). Every
//! setting has a default, so the application starts without a config file.

pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{
    ProviderSettings, SchedulerSettings, ServerSettings, Settings, TradingSettings, load,
};
