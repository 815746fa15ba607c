use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::{TradeDirection, TradeStatus};

/// One executed (or attempted) buy/sell event belonging to a simulation.
///
/// Trades are immutable once persisted except for the status transition.
/// `amount` is always `price * quantity`; it is computed at construction and
/// there is no path that changes price or quantity afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    pub simulation_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub direction: TradeDirection,
    pub price: Decimal,
    pub quantity: i64,
    pub amount: Decimal,
    /// Realized profit/loss versus the matched buy. Only meaningful for sells.
    pub profit_loss: Option<Decimal>,
    pub profit_loss_pct: Option<Decimal>,
    pub status: TradeStatus,
    pub reason: String,
}

impl Trade {
    /// Creates a pending trade with `amount` derived from price and quantity.
    pub fn new(
        simulation_id: Uuid,
        direction: TradeDirection,
        price: Decimal,
        quantity: i64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            simulation_id,
            timestamp: Utc::now(),
            direction,
            price,
            quantity,
            amount: price * Decimal::from(quantity),
            profit_loss: None,
            profit_loss_pct: None,
            status: TradeStatus::Pending,
            reason: reason.into(),
        }
    }

    /// Records the realized profit/loss of a sell against the buy it closes.
    ///
    /// A zero buy amount leaves the percentage unset rather than dividing.
    pub fn realize_against(&mut self, buy_amount: Decimal) {
        let profit_loss = self.amount - buy_amount;
        self.profit_loss = Some(profit_loss);
        self.profit_loss_pct = if buy_amount.is_zero() {
            None
        } else {
            Some(profit_loss / buy_amount * dec!(100))
        };
    }

    /// Marks the trade as executed once its balance effect has been applied.
    pub fn mark_executed(&mut self) {
        self.status = TradeStatus::Executed;
    }

    /// True when the realized profit/loss is strictly positive.
    pub fn is_winner(&self) -> bool {
        self.profit_loss.is_some_and(|pl| pl > Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_is_price_times_quantity() {
        let trade = Trade::new(Uuid::new_v4(), TradeDirection::Buy, dec!(100), 10, "test");
        assert_eq!(trade.amount, dec!(1000));
        assert_eq!(trade.status, TradeStatus::Pending);
        assert!(trade.profit_loss.is_none());
    }

    #[test]
    fn realize_computes_profit_and_percentage() {
        let mut sell = Trade::new(Uuid::new_v4(), TradeDirection::Sell, dec!(120), 10, "test");
        sell.realize_against(dec!(1000));
        assert_eq!(sell.profit_loss, Some(dec!(200)));
        assert_eq!(sell.profit_loss_pct, Some(dec!(20)));
        assert!(sell.is_winner());
    }

    #[test]
    fn realize_against_zero_buy_guards_percentage() {
        let mut sell = Trade::new(Uuid::new_v4(), TradeDirection::Sell, dec!(50), 1, "test");
        sell.realize_against(Decimal::ZERO);
        assert_eq!(sell.profit_loss, Some(dec!(50)));
        assert_eq!(sell.profit_loss_pct, None);
    }

    #[test]
    fn losing_sell_is_not_a_winner() {
        let mut sell = Trade::new(Uuid::new_v4(), TradeDirection::Sell, dec!(90), 10, "test");
        sell.realize_against(dec!(1000));
        assert_eq!(sell.profit_loss, Some(dec!(-100)));
        assert!(!sell.is_winner());
    }
}
