use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{ServerError, server::ServerState};
use api_types::maintenance::{
    AcceptBody, MaintenanceStatus, ScheduleCreated, ScheduleNew, ScheduleView, SweepSummary,
};
use engine::{ScheduleCmd, maintenance, users};

#[derive(Deserialize)]
pub struct ListQuery {
    vehicle_id: Option<String>,
}

fn status_to_api(status: engine::MaintenanceStatus) -> MaintenanceStatus {
    match status {
        engine::MaintenanceStatus::Pending => MaintenanceStatus::Pending,
        engine::MaintenanceStatus::Due => MaintenanceStatus::Due,
        engine::MaintenanceStatus::Overdue => MaintenanceStatus::Overdue,
        engine::MaintenanceStatus::Completed => MaintenanceStatus::Completed,
    }
}

fn view(model: maintenance::Model) -> Result<ScheduleView, ServerError> {
    let status = engine::MaintenanceStatus::try_from(model.status.as_str())?;
    Ok(ScheduleView {
        id: model.id,
        vehicle_id: model.vehicle_id,
        category: model.category,
        amount_minor: model.amount_minor,
        start_km: model.start_km,
        target_km: model.target_km,
        total_km: model.total_km,
        status: status_to_api(status),
    })
}

pub async fn create(
    State(state): State<ServerState>,
    Json(body): Json<ScheduleNew>,
) -> Result<(StatusCode, Json<ScheduleCreated>), ServerError> {
    let id = state
        .engine
        .new_maintenance_schedule(ScheduleCmd {
            vehicle_id: body.vehicle_id,
            category: body.category,
            amount_minor: body.amount_minor,
            start_km: body.start_km,
            target_km: body.target_km,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ScheduleCreated { id })))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ScheduleView>>, ServerError> {
    let rows = state
        .engine
        .list_maintenance_schedules(query.vehicle_id.as_deref())
        .await?;
    let views = rows.into_iter().map(view).collect::<Result<Vec<_>, _>>()?;
    Ok(Json(views))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ScheduleView>, ServerError> {
    Ok(Json(view(state.engine.maintenance_schedule(&id).await?)?))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_maintenance_schedule(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn accept(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Extension(user): Extension<users::Model>,
    Json(body): Json<AcceptBody>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .accept_maintenance(&id, &body.bank_id, body.occurred_at, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn decline(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.decline_maintenance(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Re-derive every schedule's status from the latest odometer readings and
/// report what the pass found.
pub async fn monitor(
    State(state): State<ServerState>,
) -> Result<Json<SweepSummary>, ServerError> {
    let summary = state.engine.run_maintenance_sweep().await?;
    Ok(Json(SweepSummary {
        checked: summary.checked as u64,
        due: summary.due as u64,
        overdue: summary.overdue as u64,
        alerts_opened: summary.alerts_opened as u64,
    }))
}
