use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub scheduler: SchedulerSettings,
    pub providers: ProviderSettings,
    pub trading: TradingSettings,
}

/// Where the HTTP surface listens.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Parameters for the scheduled simulation sweep.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    /// Seconds between sweep ticks. A tick that fires while the previous
    /// sweep is still running is skipped, never overlapped.
    pub sweep_interval_secs: u64,
}

/// External quote-provider endpoints and credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    pub yahoo_base_url: String,
    pub alpha_vantage_base_url: String,
    /// Alpha Vantage issues free keys; the "demo" key only serves IBM.
    pub alpha_vantage_api_key: String,
    /// Upper bound on any single provider request.
    pub request_timeout_secs: u64,
}

/// Parameters for trade sizing and signal handling.
#[derive(Debug, Clone, Deserialize)]
pub struct TradingSettings {
    /// The fraction of the current balance committed to each buy (0.1 = 10%).
    pub trade_fraction: Decimal,
    /// How many bars of history the strategy evaluator sees.
    pub history_window: usize,
    /// How many recent trades are inspected for duplicate-signal suppression
    /// and sell close-out matching.
    pub recent_trades_window: usize,
    /// Minutes within which a repeated same-direction signal is suppressed.
    pub duplicate_window_minutes: i64,
}

/// Loads settings from `config.toml` (optional) and `MERIDIAN_*` environment
/// variables, on top of built-in defaults.
pub fn load() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("scheduler.sweep_interval_secs", 60)?
        .set_default("providers.yahoo_base_url", "https://query1.finance.yahoo.com")?
        .set_default("providers.alpha_vantage_base_url", "https://www.alphavantage.co/query")?
        .set_default("providers.alpha_vantage_api_key", "demo")?
        .set_default("providers.request_timeout_secs", 10)?
        .set_default("trading.trade_fraction", "0.1")?
        .set_default("trading.history_window", 100)?
        .set_default("trading.recent_trades_window", 5)?
        .set_default("trading.duplicate_window_minutes", 60)?
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("MERIDIAN").separator("__"))
        .build()?
        .try_deserialize()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults_cover_every_section() {
        let settings = load().unwrap();
        assert_eq!(settings.scheduler.sweep_interval_secs, 60);
        assert_eq!(settings.trading.trade_fraction, dec!(0.1));
        assert_eq!(settings.trading.history_window, 100);
        assert_eq!(settings.trading.recent_trades_window, 5);
        assert_eq!(settings.trading.duplicate_window_minutes, 60);
        assert!(settings.providers.request_timeout_secs > 0);
    }
}
