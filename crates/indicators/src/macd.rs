//! Moving Average Convergence Divergence.
//!
//! MACD = EMA(fast) - EMA(slow), evaluated at offsets 0 and 1 so a caller can
//! compare the current value against the previous one for crossover
//! detection. The signal line is a lagging smoothed version of the MACD pair.

use crate::ema::ema;

/// A current/previous pair of an indicator evaluated one bar apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub current: f64,
    pub previous: f64,
}

/// Computes the MACD line at the latest and previous bar.
///
/// `closes` is ordered most-recent-first. Returns `None` when there are not
/// enough closes to evaluate both offsets.
pub fn macd(closes: &[f64], fast_period: usize, slow_period: usize) -> Option<MacdPoint> {
    let current = ema(closes, fast_period, 0)? - ema(closes, slow_period, 0)?;
    let previous = ema(closes, fast_period, 1)? - ema(closes, slow_period, 1)?;
    Some(MacdPoint { current, previous })
}

/// Smoothing weight for the current MACD value in the signal line blend.
const SIGNAL_BLEND: f64 = 0.2;

/// Derives the signal line from a MACD pair.
///
/// The current signal is a fixed blend of the current and previous MACD
/// values; the previous signal is the previous MACD itself. This is a
/// windowless stand-in for an EMA of the MACD series that preserves the
/// lagging behavior crossover detection relies on.
pub fn signal_line(macd: MacdPoint) -> MacdPoint {
    MacdPoint {
        current: macd.current * SIGNAL_BLEND + macd.previous * (1.0 - SIGNAL_BLEND),
        previous: macd.previous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_is_fast_minus_slow() {
        let closes = [10.0, 12.0, 14.0, 16.0, 18.0];
        let point = macd(&closes, 2, 4).unwrap();
        let expected_current = ema(&closes, 2, 0).unwrap() - ema(&closes, 4, 0).unwrap();
        let expected_previous = ema(&closes, 2, 1).unwrap() - ema(&closes, 4, 1).unwrap();
        assert_eq!(point.current, expected_current);
        assert_eq!(point.previous, expected_previous);
    }

    #[test]
    fn macd_undefined_without_a_previous_bar() {
        assert_eq!(macd(&[10.0], 2, 3), None);
    }

    #[test]
    fn signal_lags_the_macd() {
        let point = MacdPoint { current: 10.0, previous: 0.0 };
        let signal = signal_line(point);
        // The signal only moves 20% of the way toward the current MACD.
        assert_eq!(signal.current, 2.0);
        assert_eq!(signal.previous, 0.0);
        assert!(signal.current < point.current);
    }
}
