//! Bollinger Bands.
//!
//! Middle band = SMA(period); upper/lower = middle +/- width * population
//! standard deviation. Lookback: period.

use crate::sma::sma;
use crate::stddev::std_dev;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub lower: f64,
    pub middle: f64,
    pub upper: f64,
}

/// Computes the Bollinger bands over the `period` most recent closes.
///
/// `closes` is ordered most-recent-first. Returns `None` when fewer than
/// `period` closes are available.
pub fn bollinger(closes: &[f64], period: usize, width: f64) -> Option<BollingerBands> {
    let middle = sma(closes, period)?;
    let deviation = std_dev(closes, period, middle);
    Some(BollingerBands {
        lower: middle - width * deviation,
        middle,
        upper: middle + width * deviation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_center_on_the_sma() {
        let bands = bollinger(&[10.0, 12.0, 14.0], 3, 2.0).unwrap();
        assert_eq!(bands.middle, 12.0);
        let half_width = bands.upper - bands.middle;
        assert!((bands.middle - bands.lower - half_width).abs() < 1e-12);
    }

    #[test]
    fn width_scales_the_band_distance() {
        let narrow = bollinger(&[10.0, 12.0, 14.0], 3, 1.0).unwrap();
        let wide = bollinger(&[10.0, 12.0, 14.0], 3, 2.0).unwrap();
        let narrow_span = narrow.upper - narrow.lower;
        let wide_span = wide.upper - wide.lower;
        assert!((wide_span - 2.0 * narrow_span).abs() < 1e-12);
    }

    #[test]
    fn flat_market_collapses_the_bands() {
        let bands = bollinger(&[7.0, 7.0, 7.0, 7.0], 4, 2.0).unwrap();
        assert_eq!(bands.lower, 7.0);
        assert_eq!(bands.upper, 7.0);
    }

    #[test]
    fn undefined_when_history_is_short() {
        assert_eq!(bollinger(&[10.0], 3, 2.0), None);
    }
}
