use thiserror::Error;

use crate::enums::SimulationStatus;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Invalid lifecycle transition from {from} to {to}")]
    InvalidTransition {
        from: SimulationStatus,
        to: SimulationStatus,
    },
}
