use thiserror::Error;

use store::StoreError;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to deserialize provider response: {0}")]
    Deserialization(String),

    #[error("Provider returned no usable data for {0}")]
    MissingData(String),

    /// The terminal value of the fallback chain: every configured provider
    /// failed for this symbol. Callers inspect this instead of catching
    /// per-provider failures.
    #[error("All quote providers failed for {symbol}")]
    AllProvidersFailed { symbol: String },
}

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Symbol not found in catalog: {0}")]
    SymbolNotFound(String),
}
