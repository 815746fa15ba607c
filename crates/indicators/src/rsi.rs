//! Relative Strength Index.
//!
//! Average gain over average loss across `period` bar-to-bar changes,
//! mapped to a 0-100 oscillator: RSI = 100 - 100 / (1 + RS).
//! Lookback: period + 1 closes. Average loss is floored at a small epsilon so
//! a loss-free window saturates near 100 instead of dividing by zero.

/// Floor applied to the average loss before taking the gain/loss ratio.
const LOSS_EPSILON: f64 = 0.001;

/// The value returned when there are not enough closes to compute RSI.
const NEUTRAL: f64 = 50.0;

/// Computes the RSI over the `period` most recent changes.
///
/// `closes` is ordered most-recent-first. Returns the neutral default of 50
/// when fewer than `period + 1` closes are available.
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() <= period {
        return NEUTRAL;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = closes[i - 1] - closes[i];
        if change >= 0.0 {
            avg_gain += change;
        } else {
            avg_loss += change.abs();
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    let rs = avg_gain / avg_loss.max(LOSS_EPSILON);
    100.0 - 100.0 / (1.0 + rs)
}
