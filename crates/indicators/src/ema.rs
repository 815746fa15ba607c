//! Exponential Moving Average, offset form.
//!
//! Seeded at the close `offset` positions back, smoothing factor
//! alpha = 2 / (period + 1), folded across the next `period - 1` available
//! closes. The offset allows evaluating the "current" EMA (offset 0) and the
//! "previous" EMA (offset 1) side by side for crossover comparison.

/// Computes the EMA seeded at `closes[offset]`.
///
/// `closes` is ordered most-recent-first. Returns `None` when `offset` is out
/// of range or `period` is zero.
pub fn ema(closes: &[f64], period: usize, offset: usize) -> Option<f64> {
    if period == 0 || offset >= closes.len() {
        return None;
    }
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut value = closes[offset];
    let end = (offset + period).min(closes.len());
    for close in &closes[offset + 1..end] {
        value = close * alpha + value * (1.0 - alpha);
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_close_is_its_own_ema() {
        assert_eq!(ema(&[42.0], 5, 0), Some(42.0));
    }

    #[test]
    fn period_one_never_smooths() {
        assert_eq!(ema(&[10.0, 20.0, 30.0], 1, 0), Some(10.0));
    }

    #[test]
    fn folds_forward_with_alpha() {
        // period 3 => alpha = 0.5; seed 10, then 12, then 14:
        // 10 -> 12*0.5 + 10*0.5 = 11 -> 14*0.5 + 11*0.5 = 12.5
        let closes = [10.0, 12.0, 14.0];
        assert_eq!(ema(&closes, 3, 0), Some(12.5));
    }

    #[test]
    fn offset_shifts_the_seed() {
        let closes = [10.0, 12.0, 14.0, 16.0];
        // Seeded at index 1 with period 3: 12 -> 13 -> 14.5
        assert_eq!(ema(&closes, 3, 1), Some(14.5));
    }

    #[test]
    fn undefined_when_offset_out_of_range() {
        assert_eq!(ema(&[10.0], 3, 1), None);
        assert_eq!(ema(&[], 3, 0), None);
    }

    #[test]
    fn truncated_history_still_produces_a_value() {
        // Only one close remains after the seed; the fold stops early.
        let closes = [10.0, 12.0];
        assert_eq!(ema(&closes, 5, 0), Some(12.0 * (1.0 / 3.0) + 10.0 * (2.0 / 3.0)));
    }
}
