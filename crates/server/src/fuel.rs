use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{ServerError, server::ServerState};
use api_types::fuel::{FillUpCreated, FillUpNew, FillUpView};
use engine::{FillUpCmd, FillUpUpdate, fuel_logs, users};

#[derive(Deserialize)]
pub struct ListQuery {
    vehicle_id: Option<String>,
}

#[derive(Deserialize)]
pub struct FillUpPatch {
    vehicle_id: Option<String>,
    bank_id: Option<String>,
    start_km: Option<i64>,
    end_km: Option<i64>,
    quantity_milli: Option<i64>,
    rate_minor: Option<i64>,
}

fn view(model: fuel_logs::Model) -> FillUpView {
    FillUpView {
        id: model.id,
        vehicle_id: model.vehicle_id,
        bank_id: model.bank_id,
        start_km: model.start_km,
        end_km: model.end_km,
        quantity_milli: model.quantity_milli,
        carried_milli: model.carried_milli,
        remaining_milli: model.remaining_milli,
        rate_minor: model.rate_minor,
        total_amount_minor: model.total_amount_minor,
        average_milli: model.average_milli,
        occurred_at: model.occurred_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Json(body): Json<FillUpNew>,
) -> Result<(StatusCode, Json<FillUpCreated>), ServerError> {
    let id = state
        .engine
        .record_fill_up(FillUpCmd {
            vehicle_id: body.vehicle_id,
            bank_id: body.bank_id,
            start_km: body.start_km,
            end_km: body.end_km,
            quantity_milli: body.quantity_milli,
            rate_minor: body.rate_minor,
            occurred_at: body.occurred_at,
            created_by: user.username,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(FillUpCreated { id })))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<FillUpView>>, ServerError> {
    let rows = state.engine.list_fill_ups(query.vehicle_id.as_deref()).await?;
    Ok(Json(rows.into_iter().map(view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<FillUpView>, ServerError> {
    Ok(Json(view(state.engine.fill_up(&id).await?)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<FillUpPatch>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_fill_up(
            &id,
            FillUpUpdate {
                vehicle_id: body.vehicle_id,
                bank_id: body.bank_id,
                start_km: body.start_km,
                end_km: body.end_km,
                quantity_milli: body.quantity_milli,
                rate_minor: body.rate_minor,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_fill_up(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
