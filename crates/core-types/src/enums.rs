use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Lifecycle status of a paper-trading simulation.
///
/// `Active` is the initial state. `Completed` and `Failed` are terminal;
/// a simulation that reaches either is never revisited by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    Active,
    Paused,
    Completed,
    Failed,
}

impl SimulationStatus {
    /// Returns true for states that end the simulation permanently.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SimulationStatus::Completed | SimulationStatus::Failed)
    }
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SimulationStatus::Active => "active",
            SimulationStatus::Paused => "paused",
            SimulationStatus::Completed => "completed",
            SimulationStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

impl FromStr for SimulationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SimulationStatus::Active),
            "paused" => Ok(SimulationStatus::Paused),
            "completed" => Ok(SimulationStatus::Completed),
            "failed" => Ok(SimulationStatus::Failed),
            other => Err(CoreError::InvalidInput(
                "simulation status".to_string(),
                other.to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeDirection {
    Buy,
    Sell,
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeDirection::Buy => "buy",
            TradeDirection::Sell => "sell",
        };
        f.write_str(s)
    }
}

impl FromStr for TradeDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(TradeDirection::Buy),
            "sell" => Ok(TradeDirection::Sell),
            other => Err(CoreError::InvalidInput(
                "trade direction".to_string(),
                other.to_string(),
            )),
        }
    }
}

/// Persistence status of a trade. A trade is created `Pending` and flipped to
/// `Executed` once its balance effect has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeStatus {
    Pending,
    Executed,
    Cancelled,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeStatus::Pending => "pending",
            TradeStatus::Executed => "executed",
            TradeStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

impl FromStr for TradeStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TradeStatus::Pending),
            "executed" => Ok(TradeStatus::Executed),
            "cancelled" => Ok(TradeStatus::Cancelled),
            other => Err(CoreError::InvalidInput(
                "trade status".to_string(),
                other.to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    Equity,
    Index,
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstrumentKind::Equity => "equity",
            InstrumentKind::Index => "index",
        };
        f.write_str(s)
    }
}

impl FromStr for InstrumentKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equity" => Ok(InstrumentKind::Equity),
            "index" => Ok(InstrumentKind::Index),
            other => Err(CoreError::InvalidInput(
                "instrument kind".to_string(),
                other.to_string(),
            )),
        }
    }
}
