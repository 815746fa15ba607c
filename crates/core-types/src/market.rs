use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::InstrumentKind;

/// A tradable instrument tracked by the catalog.
///
/// The exchange ticker `code` is the immutable identity; everything else is
/// descriptive metadata maintained by the catalog layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub exchange: String,
    pub kind: InstrumentKind,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub active: bool,
}

impl Symbol {
    pub fn new(code: impl Into<String>, name: impl Into<String>, exchange: impl Into<String>, kind: InstrumentKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: code.into(),
            name: name.into(),
            exchange: exchange.into(),
            kind,
            sector: None,
            industry: None,
            active: true,
        }
    }
}

/// One OHLCV observation for a symbol at a timestamp.
///
/// Bars are append-only: once persisted they are never mutated. The `source`
/// tag records which market-data provider produced the observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub id: Uuid,
    pub symbol_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: i64,
    pub source: String,
}

impl PriceBar {
    /// Stamps a provider quote with the symbol it belongs to, producing a
    /// persistable bar.
    pub fn from_quote(symbol_id: Uuid, quote: Quote) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol_id,
            timestamp: quote.timestamp,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            close: quote.close,
            volume: quote.volume,
            source: quote.source,
        }
    }
}

/// A bar-shaped observation as returned by an external quote provider.
///
/// Providers only know the exchange ticker, not our symbol ids, so a quote
/// carries no `symbol_id`; the market-data service stamps one on when it
/// converts the quote into a [`PriceBar`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: i64,
    pub source: String,
}
