//! Quote provider backed by the Alpha Vantage REST API.
//!
//! Alpha Vantage serves every numeric field as a string and keys its time
//! series by interval-dependent object names, so history parsing walks the
//! raw JSON value instead of a fixed struct.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

use core_types::Quote;

use crate::error::ProviderError;
use crate::provider::QuoteProvider;

pub const PROVIDER_NAME: &str = "alpha_vantage";

pub struct AlphaVantageProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build reqwest client"),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_latest(&self, symbol_code: &str) -> Result<Quote, ProviderError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol_code),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json::<GlobalQuoteResponse>()
            .await?;

        quote_from_global(symbol_code, response)
    }

    async fn fetch_history(
        &self,
        symbol_code: &str,
        interval: &str,
        _range: &str,
    ) -> Result<Vec<Quote>, ProviderError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "TIME_SERIES_INTRADAY"),
                ("symbol", symbol_code),
                ("interval", interval),
                ("outputsize", "full"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        quotes_from_intraday(symbol_code, interval, &response)
    }
}

// --- Raw response shapes ----------------------------------------------------

#[derive(Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    quote: Option<GlobalQuote>,
}

#[derive(Deserialize)]
struct GlobalQuote {
    #[serde(rename = "02. open")]
    open: String,
    #[serde(rename = "03. high")]
    high: String,
    #[serde(rename = "04. low")]
    low: String,
    #[serde(rename = "05. price")]
    price: String,
    #[serde(rename = "06. volume")]
    volume: String,
    #[serde(rename = "07. latest trading day")]
    latest_trading_day: String,
}

fn quote_from_global(
    symbol_code: &str,
    response: GlobalQuoteResponse,
) -> Result<Quote, ProviderError> {
    let raw = response
        .quote
        .ok_or_else(|| ProviderError::MissingData(symbol_code.to_string()))?;

    let day = NaiveDate::parse_from_str(&raw.latest_trading_day, "%Y-%m-%d")
        .map_err(|e| ProviderError::Deserialization(e.to_string()))?;
    let timestamp = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ProviderError::Deserialization("invalid trading day".to_string()))?
        .and_utc();

    Ok(Quote {
        timestamp,
        open: decimal(&raw.open)?,
        high: decimal(&raw.high)?,
        low: decimal(&raw.low)?,
        close: decimal(&raw.price)?,
        volume: i64::from_str(&raw.volume)
            .map_err(|e| ProviderError::Deserialization(e.to_string()))?,
        source: PROVIDER_NAME.to_string(),
    })
}

fn quotes_from_intraday(
    symbol_code: &str,
    interval: &str,
    response: &serde_json::Value,
) -> Result<Vec<Quote>, ProviderError> {
    let key = format!("Time Series ({interval})");
    let series = response
        .get(&key)
        .and_then(|v| v.as_object())
        .ok_or_else(|| ProviderError::MissingData(symbol_code.to_string()))?;

    let mut quotes = Vec::with_capacity(series.len());
    for (stamp, fields) in series {
        let naive = NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S")
            .map_err(|e| ProviderError::Deserialization(e.to_string()))?;
        quotes.push(Quote {
            timestamp: naive.and_utc(),
            open: decimal(field(fields, "1. open")?)?,
            high: decimal(field(fields, "2. high")?)?,
            low: decimal(field(fields, "3. low")?)?,
            close: decimal(field(fields, "4. close")?)?,
            volume: i64::from_str(field(fields, "5. volume")?)
                .map_err(|e| ProviderError::Deserialization(e.to_string()))?,
            source: PROVIDER_NAME.to_string(),
        });
    }

    if quotes.is_empty() {
        return Err(ProviderError::MissingData(symbol_code.to_string()));
    }
    // Alpha Vantage keys newest-first as strings; normalize to chronological.
    quotes.sort_by_key(|q| q.timestamp);
    Ok(quotes)
}

fn field<'a>(fields: &'a serde_json::Value, name: &str) -> Result<&'a str, ProviderError> {
    fields
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ProviderError::Deserialization(format!("missing field {name}")))
}

fn decimal(raw: &str) -> Result<Decimal, ProviderError> {
    Decimal::from_str(raw).map_err(|e| ProviderError::Deserialization(e.to_string()))
}
