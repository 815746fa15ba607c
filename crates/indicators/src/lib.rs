//! # Meridian Indicator Library
//!
//! Pure technical-indicator math over close-price sequences.
//!
//! Every function here takes a slice of closes ordered **most-recent-first**
//! (index 0 is the latest bar), matching how the price-series store serves
//! recent history. All functions are deterministic, allocate nothing, and
//! never mutate their input.
//!
//! Insufficient data is reported through the return type (`None`, or a
//! documented neutral default for RSI); callers translate that into a HOLD
//! decision, never into an error.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use bollinger::{BollingerBands, bollinger};
pub use ema::ema;
pub use macd::{MacdPoint, macd, signal_line};
pub use rsi::rsi;
pub use sma::sma;
pub use stddev::std_dev;
