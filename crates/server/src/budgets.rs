use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{ServerError, server::ServerState};
use api_types::budget::{BudgetCreated, BudgetNew, BudgetView};
use engine::{BudgetCmd, driver_budgets, users};

#[derive(Deserialize)]
pub struct ListQuery {
    driver_id: Option<String>,
}

fn view(model: driver_budgets::Model) -> BudgetView {
    BudgetView {
        id: model.id,
        driver_id: model.driver_id,
        bank_id: model.bank_id,
        allocated_minor: model.allocated_minor,
        daily_budget_minor: model.daily_budget_minor,
        remaining_minor: model.remaining_minor,
        occurred_at: model.occurred_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Json(body): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetCreated>), ServerError> {
    let id = state
        .engine
        .allocate_daily_budget(BudgetCmd {
            driver_id: body.driver_id,
            bank_id: body.bank_id,
            allocated_minor: body.amount_minor,
            occurred_at: body.occurred_at,
            created_by: user.username,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(BudgetCreated { id })))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let rows = state
        .engine
        .list_daily_budgets(query.driver_id.as_deref())
        .await?;
    Ok(Json(rows.into_iter().map(view).collect()))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_daily_budget(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
