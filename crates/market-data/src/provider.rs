use async_trait::async_trait;

use core_types::Quote;

use crate::error::ProviderError;

/// The abstract interface to an external market-data source.
///
/// Implementations fetch by exchange ticker and return provider-tagged
/// quotes. Failures are typed so the fallback chain can move on to the next
/// provider instead of unwinding.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// A short tag identifying this provider; stamped onto every bar it
    /// produces as the `source`.
    fn name(&self) -> &str;

    /// Fetches the most recent quote for a ticker.
    async fn fetch_latest(&self, symbol_code: &str) -> Result<Quote, ProviderError>;

    /// Fetches historical quotes for a ticker over the given interval and
    /// range (provider-native strings, e.g. "5m" / "1mo").
    async fn fetch_history(
        &self,
        symbol_code: &str,
        interval: &str,
        range: &str,
    ) -> Result<Vec<Quote>, ProviderError>;
}
