use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use api_types::cashbook::{EntryCreated, EntryList, EntryNew, EntryUpdate, EntryView};
use engine::{EntryCmd, expenses, incomes, users};

fn entry_cmd(body: EntryNew, created_by: String) -> EntryCmd {
    EntryCmd {
        bank_id: body.bank_id,
        amount_minor: body.amount_minor,
        category: body.category,
        note: body.note,
        occurred_at: body.occurred_at,
        created_by,
    }
}

fn entry_update(body: EntryUpdate) -> engine::EntryUpdate {
    engine::EntryUpdate {
        amount_minor: body.amount_minor,
        category: body.category,
        note: body.note,
    }
}

fn income_view(model: incomes::Model) -> EntryView {
    EntryView {
        id: model.id,
        bank_id: model.bank_id,
        amount_minor: model.amount_minor,
        category: model.category,
        note: model.note,
        trip_id: model.trip_id,
        transaction_id: model.transaction_id,
        occurred_at: model.occurred_at,
    }
}

fn expense_view(model: expenses::Model) -> EntryView {
    EntryView {
        id: model.id,
        bank_id: model.bank_id,
        amount_minor: model.amount_minor,
        category: model.category,
        note: model.note,
        trip_id: model.trip_id,
        transaction_id: model.transaction_id,
        occurred_at: model.occurred_at,
    }
}

pub async fn income_create(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Json(body): Json<EntryNew>,
) -> Result<(StatusCode, Json<EntryCreated>), ServerError> {
    let id = state
        .engine
        .new_income(entry_cmd(body, user.username))
        .await?;
    Ok((StatusCode::CREATED, Json(EntryCreated { id })))
}

pub async fn income_list(
    State(state): State<ServerState>,
    Query(query): Query<EntryList>,
) -> Result<Json<Vec<EntryView>>, ServerError> {
    let rows = state.engine.list_incomes(query.from, query.to).await?;
    Ok(Json(rows.into_iter().map(income_view).collect()))
}

pub async fn income_update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<EntryUpdate>,
) -> Result<StatusCode, ServerError> {
    state.engine.update_income(&id, entry_update(body)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn income_remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_income(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn expense_create(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Json(body): Json<EntryNew>,
) -> Result<(StatusCode, Json<EntryCreated>), ServerError> {
    let id = state
        .engine
        .new_expense(entry_cmd(body, user.username))
        .await?;
    Ok((StatusCode::CREATED, Json(EntryCreated { id })))
}

pub async fn expense_list(
    State(state): State<ServerState>,
    Query(query): Query<EntryList>,
) -> Result<Json<Vec<EntryView>>, ServerError> {
    let rows = state.engine.list_expenses(query.from, query.to).await?;
    Ok(Json(rows.into_iter().map(expense_view).collect()))
}

pub async fn expense_update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<EntryUpdate>,
) -> Result<StatusCode, ServerError> {
    state.engine.update_expense(&id, entry_update(body)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn expense_remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
