//! Quote provider backed by the Yahoo Finance chart API.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use std::time::Duration;

use core_types::Quote;

use crate::error::ProviderError;
use crate::provider::QuoteProvider;

pub const PROVIDER_NAME: &str = "yahoo";

pub struct YahooProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build reqwest client"),
            base_url: base_url.into(),
        }
    }

    async fn fetch_chart(
        &self,
        symbol_code: &str,
        interval: &str,
        range: &str,
    ) -> Result<Vec<Quote>, ProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol_code);
        let response = self
            .client
            .get(&url)
            .query(&[("interval", interval), ("range", range)])
            .send()
            .await?
            .json::<ChartResponse>()
            .await?;

        quotes_from_chart(symbol_code, response)
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_latest(&self, symbol_code: &str) -> Result<Quote, ProviderError> {
        // The chart endpoint with a tight range doubles as a quote endpoint;
        // the newest complete row is the latest observation.
        let quotes = self.fetch_chart(symbol_code, "5m", "1d").await?;
        quotes
            .into_iter()
            .max_by_key(|q| q.timestamp)
            .ok_or_else(|| ProviderError::MissingData(symbol_code.to_string()))
    }

    async fn fetch_history(
        &self,
        symbol_code: &str,
        interval: &str,
        range: &str,
    ) -> Result<Vec<Quote>, ProviderError> {
        self.fetch_chart(symbol_code, interval, range).await
    }
}

// --- Raw response shape -----------------------------------------------------

#[derive(Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Deserialize)]
struct ChartQuote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<i64>>,
}

/// Flattens the chart arrays into quotes, skipping rows with missing fields
/// (Yahoo pads non-trading minutes with nulls).
fn quotes_from_chart(
    symbol_code: &str,
    response: ChartResponse,
) -> Result<Vec<Quote>, ProviderError> {
    if let Some(error) = response.chart.error {
        return Err(ProviderError::Deserialization(error.to_string()));
    }

    let result = response
        .chart
        .result
        .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
        .ok_or_else(|| ProviderError::MissingData(symbol_code.to_string()))?;

    let timestamps = result
        .timestamp
        .ok_or_else(|| ProviderError::MissingData(symbol_code.to_string()))?;
    let series = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::MissingData(symbol_code.to_string()))?;

    let mut quotes = Vec::with_capacity(timestamps.len());
    for (i, unix) in timestamps.iter().enumerate() {
        let row = (
            series.open.get(i).copied().flatten(),
            series.high.get(i).copied().flatten(),
            series.low.get(i).copied().flatten(),
            series.close.get(i).copied().flatten(),
            series.volume.get(i).copied().flatten(),
        );
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = row else {
            continue;
        };
        let Some(timestamp) = Utc.timestamp_opt(*unix, 0).single() else {
            continue;
        };
        quotes.push(Quote {
            timestamp,
            open: decimal(open)?,
            high: decimal(high)?,
            low: decimal(low)?,
            close: decimal(close)?,
            volume,
            source: PROVIDER_NAME.to_string(),
        });
    }

    if quotes.is_empty() {
        return Err(ProviderError::MissingData(symbol_code.to_string()));
    }
    Ok(quotes)
}

fn decimal(value: f64) -> Result<Decimal, ProviderError> {
    Decimal::from_f64(value)
        .ok_or_else(|| ProviderError::Deserialization(format!("non-finite price {value}")))
}
