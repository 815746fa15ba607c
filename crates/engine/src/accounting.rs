//! Position sizing and ledger rules for trade application.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use core_types::{Simulation, Trade, TradeDirection};

use crate::error::EngineError;

/// True when a same-direction trade already exists inside the suppression
/// window. `recent` is the bounded most-recent-first trade window.
pub fn is_duplicate(
    direction: TradeDirection,
    recent: &[Trade],
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    recent
        .iter()
        .any(|trade| trade.direction == direction && trade.timestamp > now - window)
}

/// Sizes a trade against the simulation's ledger.
///
/// Buys commit `trade_fraction` of the current balance, floor-divided into a
/// whole-share quantity, and never overdraw. Sells close out the most recent
/// open buy in the recent-trade window symmetrically and carry the realized
/// profit/loss against that buy; a buy already closed by a later sell does
/// not count as open.
///
/// The returned trade is still `Pending`; the caller marks it executed when
/// it is applied and persisted.
pub fn plan_trade(
    simulation: &Simulation,
    direction: TradeDirection,
    price: Decimal,
    reason: &str,
    recent: &[Trade],
    trade_fraction: Decimal,
) -> Result<Trade, EngineError> {
    if !simulation.is_active() {
        return Err(EngineError::NotActive(simulation.id));
    }
    if price <= Decimal::ZERO {
        return Err(EngineError::InvalidPrice(price));
    }

    match direction {
        TradeDirection::Buy => {
            let budget = simulation.current_balance * trade_fraction;
            let quantity = (budget / price)
                .floor()
                .to_i64()
                .ok_or(EngineError::ZeroQuantity(price))?;
            if quantity == 0 {
                return Err(EngineError::ZeroQuantity(price));
            }

            let trade = Trade::new(simulation.id, TradeDirection::Buy, price, quantity, reason);
            if trade.amount > simulation.current_balance {
                return Err(EngineError::InsufficientFunds {
                    required: trade.amount,
                    balance: simulation.current_balance,
                });
            }
            Ok(trade)
        }
        TradeDirection::Sell => {
            // A sell more recent than the last buy means the position is
            // already closed.
            let last_buy = recent
                .iter()
                .take_while(|trade| trade.direction != TradeDirection::Sell)
                .find(|trade| trade.direction == TradeDirection::Buy)
                .ok_or(EngineError::NoOpenPosition)?;

            let mut trade = Trade::new(
                simulation.id,
                TradeDirection::Sell,
                price,
                last_buy.quantity,
                reason,
            );
            trade.realize_against(last_buy.amount);
            Ok(trade)
        }
    }
}
