//! Ordered provider fallback.

use std::sync::Arc;

use core_types::Quote;

use crate::error::ProviderError;
use crate::provider::QuoteProvider;

/// An ordered list of quote providers tried in sequence.
///
/// Each failure is logged and the next provider is tried; only when every
/// provider has failed does the chain return
/// [`ProviderError::AllProvidersFailed`].
#[derive(Clone)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn QuoteProvider>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn QuoteProvider>>) -> Self {
        Self { providers }
    }

    pub async fn fetch_latest(&self, symbol_code: &str) -> Result<Quote, ProviderError> {
        for provider in &self.providers {
            match provider.fetch_latest(symbol_code).await {
                Ok(quote) => return Ok(quote),
                Err(error) => {
                    tracing::warn!(
                        provider = provider.name(),
                        symbol = symbol_code,
                        %error,
                        "quote fetch failed, trying next provider"
                    );
                }
            }
        }
        Err(ProviderError::AllProvidersFailed {
            symbol: symbol_code.to_string(),
        })
    }

    pub async fn fetch_history(
        &self,
        symbol_code: &str,
        interval: &str,
        range: &str,
    ) -> Result<Vec<Quote>, ProviderError> {
        for provider in &self.providers {
            match provider.fetch_history(symbol_code, interval, range).await {
                Ok(quotes) => return Ok(quotes),
                Err(error) => {
                    tracing::warn!(
                        provider = provider.name(),
                        symbol = symbol_code,
                        %error,
                        "history fetch failed, trying next provider"
                    );
                }
            }
        }
        Err(ProviderError::AllProvidersFailed {
            symbol: symbol_code.to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;

    /// A provider that always fails, for exercising the fallback path.
    pub struct FailingProvider;

    #[async_trait]
    impl QuoteProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch_latest(&self, symbol_code: &str) -> Result<Quote, ProviderError> {
            Err(ProviderError::MissingData(symbol_code.to_string()))
        }

        async fn fetch_history(
            &self,
            symbol_code: &str,
            _interval: &str,
            _range: &str,
        ) -> Result<Vec<Quote>, ProviderError> {
            Err(ProviderError::MissingData(symbol_code.to_string()))
        }
    }

    /// A provider that returns a fixed close price.
    pub struct StaticProvider {
        pub close: Decimal,
    }

    #[async_trait]
    impl QuoteProvider for StaticProvider {
        fn name(&self) -> &str {
            "static"
        }

        async fn fetch_latest(&self, _symbol_code: &str) -> Result<Quote, ProviderError> {
            Ok(Quote {
                timestamp: Utc::now(),
                open: self.close,
                high: self.close,
                low: self.close,
                close: self.close,
                volume: 1_000,
                source: "static".to_string(),
            })
        }

        async fn fetch_history(
            &self,
            symbol_code: &str,
            _interval: &str,
            _range: &str,
        ) -> Result<Vec<Quote>, ProviderError> {
            Ok(vec![self.fetch_latest(symbol_code).await?])
        }
    }
}
