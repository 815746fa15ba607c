use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::{SimulationStatus, TradeDirection};
use crate::error::CoreError;
use crate::strategy::StrategyParameters;
use crate::trade::Trade;

/// One paper-trading run: a user, a symbol, a strategy, and a virtual balance
/// that executed trades mutate over time.
///
/// Invariant: `profit_loss` and `profit_loss_pct` are always derived from
/// `current_balance` and `initial_investment`. Every balance mutation goes
/// through [`Simulation::set_balance`], which recomputes both; nothing else
/// writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub id: Uuid,
    pub user_id: String,
    pub symbol_id: Uuid,
    pub strategy_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: SimulationStatus,
    /// Fixed at creation; never mutated afterwards.
    pub initial_investment: Decimal,
    pub current_balance: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_pct: Decimal,
    pub total_trades: i32,
    pub successful_trades: i32,
    /// Display-only description of the intended run length (e.g. "30d").
    pub time_period: Option<String>,
    /// Whether winnings compound into the tradable balance. Stored and
    /// served; sizing always reads the live balance, which already compounds.
    pub reinvest_profits: bool,
    /// Optional per-simulation override of the strategy's parameters.
    pub parameters: Option<StrategyParameters>,
}

/// The fields a caller supplies when creating a simulation; everything else
/// is initialized by [`Simulation::create`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewSimulation {
    pub user_id: String,
    pub symbol_id: Uuid,
    pub strategy_id: Uuid,
    pub initial_investment: Decimal,
    pub time_period: Option<String>,
    #[serde(default)]
    pub reinvest_profits: bool,
    pub parameters: Option<StrategyParameters>,
}

/// A partial-field update applied through the generic update path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulationUpdate {
    pub status: Option<SimulationStatus>,
    pub current_balance: Option<Decimal>,
    pub parameters: Option<StrategyParameters>,
}

impl Simulation {
    /// Creates a new simulation in the `Active` state with the balance equal
    /// to the initial investment.
    pub fn create(new: NewSimulation) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            symbol_id: new.symbol_id,
            strategy_id: new.strategy_id,
            started_at: Utc::now(),
            ended_at: None,
            status: SimulationStatus::Active,
            initial_investment: new.initial_investment,
            current_balance: new.initial_investment,
            profit_loss: Decimal::ZERO,
            profit_loss_pct: Decimal::ZERO,
            total_trades: 0,
            successful_trades: 0,
            time_period: new.time_period,
            reinvest_profits: new.reinvest_profits,
            parameters: new.parameters,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SimulationStatus::Active
    }

    /// Active -> Paused. The scheduler skips paused simulations without error.
    pub fn pause(&mut self) -> Result<(), CoreError> {
        match self.status {
            SimulationStatus::Active => {
                self.status = SimulationStatus::Paused;
                Ok(())
            }
            from => Err(CoreError::InvalidTransition {
                from,
                to: SimulationStatus::Paused,
            }),
        }
    }

    /// Paused -> Active.
    pub fn resume(&mut self) -> Result<(), CoreError> {
        match self.status {
            SimulationStatus::Paused => {
                self.status = SimulationStatus::Active;
                Ok(())
            }
            from => Err(CoreError::InvalidTransition {
                from,
                to: SimulationStatus::Active,
            }),
        }
    }

    /// Active|Paused -> Completed; stamps the end timestamp.
    pub fn stop(&mut self) -> Result<(), CoreError> {
        match self.status {
            SimulationStatus::Active | SimulationStatus::Paused => {
                self.status = SimulationStatus::Completed;
                self.ended_at = Some(Utc::now());
                Ok(())
            }
            from => Err(CoreError::InvalidTransition {
                from,
                to: SimulationStatus::Completed,
            }),
        }
    }

    /// Applies a partial update. A status change to a terminal state goes
    /// through the same end-timestamp rule as [`Simulation::stop`], so a
    /// terminal record always carries `ended_at`.
    pub fn apply_update(&mut self, update: SimulationUpdate) {
        if let Some(status) = update.status {
            self.status = status;
            if status.is_terminal() && self.ended_at.is_none() {
                self.ended_at = Some(Utc::now());
            }
        }
        if let Some(balance) = update.current_balance {
            self.set_balance(balance);
        }
        if let Some(parameters) = update.parameters {
            self.parameters = Some(parameters);
        }
    }

    /// Applies an executed trade's balance effect and statistics.
    ///
    /// Buys subtract their amount from the balance; sells add it back and, if
    /// they realized a positive profit, count as a successful trade.
    pub fn apply_trade(&mut self, trade: &Trade) {
        let new_balance = match trade.direction {
            TradeDirection::Buy => self.current_balance - trade.amount,
            TradeDirection::Sell => self.current_balance + trade.amount,
        };
        self.set_balance(new_balance);
        self.total_trades += 1;
        if trade.is_winner() {
            self.successful_trades += 1;
        }
    }

    /// The single balance write path: recomputes profit/loss and its
    /// percentage from the new balance and the initial investment.
    pub fn set_balance(&mut self, balance: Decimal) {
        self.current_balance = balance;
        self.profit_loss = self.current_balance - self.initial_investment;
        self.profit_loss_pct = if self.initial_investment.is_zero() {
            Decimal::ZERO
        } else {
            self.profit_loss / self.initial_investment * dec!(100)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::TradeStatus;

    fn simulation(initial: Decimal) -> Simulation {
        Simulation::create(NewSimulation {
            user_id: "user-1".to_string(),
            symbol_id: Uuid::new_v4(),
            strategy_id: Uuid::new_v4(),
            initial_investment: initial,
            time_period: None,
            reinvest_profits: false,
            parameters: None,
        })
    }

    #[test]
    fn create_initializes_balance_and_counters() {
        let sim = simulation(dec!(10000));
        assert_eq!(sim.status, SimulationStatus::Active);
        assert_eq!(sim.current_balance, dec!(10000));
        assert_eq!(sim.profit_loss, Decimal::ZERO);
        assert_eq!(sim.profit_loss_pct, Decimal::ZERO);
        assert_eq!(sim.total_trades, 0);
        assert_eq!(sim.successful_trades, 0);
        assert!(sim.ended_at.is_none());
    }

    #[test]
    fn buy_trade_reduces_balance_and_recomputes_profit_loss() {
        let mut sim = simulation(dec!(10000));
        let mut trade = Trade::new(sim.id, TradeDirection::Buy, dec!(100), 10, "test");
        trade.mark_executed();
        sim.apply_trade(&trade);

        assert_eq!(sim.current_balance, dec!(9000));
        assert_eq!(sim.profit_loss, dec!(-1000));
        assert_eq!(sim.profit_loss_pct, dec!(-10));
        assert_eq!(sim.total_trades, 1);
        assert_eq!(sim.successful_trades, 0);
    }

    #[test]
    fn winning_sell_increments_successful_trades() {
        let mut sim = simulation(dec!(10000));
        sim.set_balance(dec!(9000));

        let mut sell = Trade::new(sim.id, TradeDirection::Sell, dec!(120), 10, "test");
        sell.realize_against(dec!(1000));
        sell.mark_executed();
        sim.apply_trade(&sell);

        assert_eq!(sim.current_balance, dec!(10200));
        assert_eq!(sim.profit_loss, dec!(200));
        assert_eq!(sim.profit_loss_pct, dec!(2));
        assert_eq!(sim.successful_trades, 1);
    }

    #[test]
    fn profit_loss_guarded_for_zero_initial_investment() {
        let mut sim = simulation(Decimal::ZERO);
        sim.set_balance(dec!(50));
        assert_eq!(sim.profit_loss, dec!(50));
        assert_eq!(sim.profit_loss_pct, Decimal::ZERO);
    }

    #[test]
    fn pause_and_resume_round_trip() {
        let mut sim = simulation(dec!(1000));
        sim.pause().unwrap();
        assert_eq!(sim.status, SimulationStatus::Paused);
        sim.resume().unwrap();
        assert_eq!(sim.status, SimulationStatus::Active);
    }

    #[test]
    fn pause_does_not_touch_investment_counters_or_end_time() {
        let mut sim = simulation(dec!(1000));
        let before = sim.clone();
        sim.pause().unwrap();
        assert_eq!(sim.initial_investment, before.initial_investment);
        assert_eq!(sim.total_trades, before.total_trades);
        assert_eq!(sim.successful_trades, before.successful_trades);
        assert_eq!(sim.ended_at, None);
    }

    #[test]
    fn stop_sets_end_timestamp_and_completed_status() {
        let mut sim = simulation(dec!(1000));
        sim.stop().unwrap();
        assert_eq!(sim.status, SimulationStatus::Completed);
        assert!(sim.ended_at.is_some());
    }

    #[test]
    fn stop_from_paused_is_allowed() {
        let mut sim = simulation(dec!(1000));
        sim.pause().unwrap();
        sim.stop().unwrap();
        assert_eq!(sim.status, SimulationStatus::Completed);
    }

    #[test]
    fn terminal_states_reject_further_transitions() {
        let mut sim = simulation(dec!(1000));
        sim.stop().unwrap();
        assert!(sim.pause().is_err());
        assert!(sim.resume().is_err());
        assert!(sim.stop().is_err());
    }

    #[test]
    fn resume_requires_paused() {
        let mut sim = simulation(dec!(1000));
        assert!(sim.resume().is_err());
    }

    #[test]
    fn update_to_failed_stamps_end_timestamp() {
        let mut sim = simulation(dec!(1000));
        sim.apply_update(SimulationUpdate {
            status: Some(SimulationStatus::Failed),
            ..Default::default()
        });
        assert_eq!(sim.status, SimulationStatus::Failed);
        assert!(sim.ended_at.is_some());
    }

    #[test]
    fn update_balance_recomputes_profit_loss() {
        let mut sim = simulation(dec!(10000));
        sim.apply_update(SimulationUpdate {
            current_balance: Some(dec!(11000)),
            ..Default::default()
        });
        assert_eq!(sim.profit_loss, dec!(1000));
        assert_eq!(sim.profit_loss_pct, dec!(10));
    }

    #[test]
    fn executed_trade_status_is_visible() {
        let mut trade = Trade::new(Uuid::new_v4(), TradeDirection::Buy, dec!(10), 1, "test");
        trade.mark_executed();
        assert_eq!(trade.status, TradeStatus::Executed);
    }
}
