use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_types::{NewSimulation, Simulation, SimulationUpdate, Trade};
use engine::{ManualTradeRequest, ProcessOutcome, SweepReport};

use crate::{AppState, error::AppError};

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    20
}

/// What an on-demand processing call produced, in wire form.
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade: Option<Trade>,
}

impl From<ProcessOutcome> for ProcessResponse {
    fn from(outcome: ProcessOutcome) -> Self {
        match outcome {
            ProcessOutcome::Held => ProcessResponse {
                outcome: "held",
                detail: None,
                trade: None,
            },
            ProcessOutcome::Suppressed(direction) => ProcessResponse {
                outcome: "suppressed",
                detail: Some(direction.to_string()),
                trade: None,
            },
            ProcessOutcome::Skipped(reason) => ProcessResponse {
                outcome: "skipped",
                detail: Some(reason),
                trade: None,
            },
            ProcessOutcome::Traded(trade) => ProcessResponse {
                outcome: "traded",
                detail: None,
                trade: Some(trade),
            },
        }
    }
}

/// # POST /api/simulations
pub async fn create_simulation(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewSimulation>,
) -> Result<Json<Simulation>, AppError> {
    Ok(Json(state.service.create(new).await?))
}

/// # GET /api/simulations/:id
pub async fn get_simulation(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Simulation>, AppError> {
    Ok(Json(state.service.get(id).await?))
}

/// # PATCH /api/simulations/:id
pub async fn update_simulation(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<SimulationUpdate>,
) -> Result<Json<Simulation>, AppError> {
    Ok(Json(state.service.update(id, update).await?))
}

/// # POST /api/simulations/:id/pause
pub async fn pause_simulation(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Simulation>, AppError> {
    Ok(Json(state.service.pause(id).await?))
}

/// # POST /api/simulations/:id/resume
pub async fn resume_simulation(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Simulation>, AppError> {
    Ok(Json(state.service.resume(id).await?))
}

/// # POST /api/simulations/:id/stop
pub async fn stop_simulation(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Simulation>, AppError> {
    Ok(Json(state.service.stop(id).await?))
}

/// # GET /api/simulations/:id/trades
pub async fn get_simulation_trades(
    Path(id): Path<Uuid>,
    Query(query): Query<LimitQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Trade>>, AppError> {
    Ok(Json(state.service.recent_trades(id, query.limit).await?))
}

/// # POST /api/simulations/:id/trades
///
/// Executes a manual trade at the latest price. Ledger rejections surface as
/// 409s rather than silently skipping, unlike the scheduled sweep.
pub async fn execute_manual_trade(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ManualTradeRequest>,
) -> Result<Json<Trade>, AppError> {
    Ok(Json(state.service.execute_manual_trade(id, request).await?))
}

/// # POST /api/simulations/:id/process
pub async fn process_simulation(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProcessResponse>, AppError> {
    let outcome = state.processor.process_by_id(id).await?;
    Ok(Json(outcome.into()))
}

/// # GET /api/users/:user_id/simulations
pub async fn get_user_simulations(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Simulation>>, AppError> {
    Ok(Json(state.service.list_for_user(&user_id).await?))
}

/// # GET /api/users/:user_id/trades
pub async fn get_user_trades(
    Path(user_id): Path<String>,
    Query(query): Query<LimitQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Trade>>, AppError> {
    Ok(Json(
        state
            .service
            .recent_trades_for_user(&user_id, query.limit)
            .await?,
    ))
}

/// # POST /api/sweep
///
/// Forces an immediate sweep. Shares the single-slot gate with the
/// scheduler, so a sweep already in flight reports `skipped_overlap`.
pub async fn force_sweep(State(state): State<Arc<AppState>>) -> Json<SweepReport> {
    Json(state.sweeper.run_sweep().await)
}
