//! Read-through access to price history.

use std::sync::Arc;

use uuid::Uuid;

use core_types::{PriceBar, Symbol};
use store::{PriceSeriesStore, SymbolCatalog};

use crate::chain::ProviderChain;
use crate::error::MarketDataError;

/// Serves price bars from the local store, reaching out to the provider
/// chain (and persisting the result) when the store has nothing.
pub struct MarketDataService {
    symbols: Arc<dyn SymbolCatalog>,
    bars: Arc<dyn PriceSeriesStore>,
    providers: ProviderChain,
}

impl MarketDataService {
    pub fn new(
        symbols: Arc<dyn SymbolCatalog>,
        bars: Arc<dyn PriceSeriesStore>,
        providers: ProviderChain,
    ) -> Self {
        Self {
            symbols,
            bars,
            providers,
        }
    }

    /// The most recent stored bar for a symbol.
    pub async fn latest(&self, symbol_id: Uuid) -> Result<Option<PriceBar>, MarketDataError> {
        Ok(self.bars.latest(symbol_id).await?)
    }

    /// Up to `limit` stored bars, most-recent-first.
    pub async fn history(
        &self,
        symbol_id: Uuid,
        limit: usize,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        Ok(self.bars.recent(symbol_id, limit).await?)
    }

    /// The most recent bar, fetching from the providers once on a store miss
    /// and retrying the lookup once afterwards.
    ///
    /// Returns `Ok(None)` only when the store is still empty after a
    /// successful fetch; provider failures propagate so the caller can abort
    /// just the operation at hand.
    pub async fn ensure_latest(
        &self,
        symbol: &Symbol,
    ) -> Result<Option<PriceBar>, MarketDataError> {
        if let Some(bar) = self.bars.latest(symbol.id).await? {
            return Ok(Some(bar));
        }

        tracing::debug!(symbol = %symbol.code, "no stored bar, fetching from providers");
        self.fetch_and_store_latest(symbol).await?;
        Ok(self.bars.latest(symbol.id).await?)
    }

    /// Fetches the latest quote through the fallback chain and persists it.
    pub async fn fetch_and_store_latest(
        &self,
        symbol: &Symbol,
    ) -> Result<PriceBar, MarketDataError> {
        let quote = self.providers.fetch_latest(&symbol.code).await?;
        let bar = PriceBar::from_quote(symbol.id, quote);
        self.bars.save(&bar).await?;
        Ok(bar)
    }

    /// Fetches historical quotes for a ticker and persists them all.
    pub async fn fetch_and_store_history(
        &self,
        symbol_code: &str,
        interval: &str,
        range: &str,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        let symbol = self
            .symbols
            .get_by_code(symbol_code)
            .await?
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol_code.to_string()))?;

        let quotes = self
            .providers
            .fetch_history(symbol_code, interval, range)
            .await?;
        let bars: Vec<PriceBar> = quotes
            .into_iter()
            .map(|quote| PriceBar::from_quote(symbol.id, quote))
            .collect();
        self.bars.save_all(&bars).await?;
        Ok(bars)
    }
}
