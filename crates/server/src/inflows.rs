//! Inflow API endpoints

use api_types::inflow::{InflowDeleteFilter, InflowNew, InflowReason, InflowView, InflowsDeleted};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Inflow, InflowAttrs, InflowFilter};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_reason(reason: engine::InflowReason) -> InflowReason {
    match reason {
        engine::InflowReason::Purchase => InflowReason::Purchase,
        engine::InflowReason::Donation => InflowReason::Donation,
        engine::InflowReason::Correction => InflowReason::Correction,
        engine::InflowReason::Other => InflowReason::Other,
    }
}

fn engine_reason(reason: InflowReason) -> engine::InflowReason {
    match reason {
        InflowReason::Purchase => engine::InflowReason::Purchase,
        InflowReason::Donation => engine::InflowReason::Donation,
        InflowReason::Correction => engine::InflowReason::Correction,
        InflowReason::Other => engine::InflowReason::Other,
    }
}

fn map_inflow(inflow: Inflow) -> InflowView {
    InflowView {
        id: inflow.id,
        ingredient_id: inflow.ingredient_id,
        date: inflow.date,
        reason: map_reason(inflow.reason),
        price: inflow.price,
        quantity: inflow.quantity,
        additional_details: inflow.additional_details,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InflowNew>,
) -> Result<(StatusCode, Json<InflowView>), ServerError> {
    let inflow = state
        .engine
        .record_inflow(InflowAttrs {
            ingredient_id: payload.ingredient_id,
            date: payload.date,
            reason: engine_reason(payload.reason),
            price: payload.price,
            quantity: payload.quantity,
            additional_details: payload.additional_details,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(map_inflow(inflow))))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<InflowView>>, ServerError> {
    let inflows = state
        .engine
        .inflows()
        .await?
        .into_iter()
        .map(map_inflow)
        .collect();
    Ok(Json(inflows))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InflowView>, ServerError> {
    let inflow = state.engine.inflow(id).await?;
    Ok(Json(map_inflow(inflow)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_inflow(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle `DELETE /inflows?ingredient_id=...`.
pub async fn delete_many(
    State(state): State<ServerState>,
    Query(filter): Query<InflowDeleteFilter>,
) -> Result<Json<InflowsDeleted>, ServerError> {
    let deleted = state
        .engine
        .delete_inflows(InflowFilter {
            ingredient_id: filter.ingredient_id,
        })
        .await?;
    Ok(Json(InflowsDeleted { deleted }))
}
