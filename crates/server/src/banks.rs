use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use api_types::{bank, transaction};
use engine::{BankCmd, TransferCmd, banks, users};

fn view(model: banks::Model) -> bank::BankView {
    bank::BankView {
        id: model.id,
        name: model.name,
        account_no: model.account_no,
        balance_minor: model.balance_minor,
        owner: model.owner,
        active: model.active,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Json(body): Json<bank::BankNew>,
) -> Result<(StatusCode, Json<bank::BankCreated>), ServerError> {
    let id = state
        .engine
        .new_bank(BankCmd {
            name: body.name,
            account_no: body.account_no,
            opening_balance_minor: body.opening_balance_minor.unwrap_or(0),
            owner: user.username,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(bank::BankCreated { id })))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<bank::BankView>>, ServerError> {
    let banks = state.engine.list_banks().await?;
    Ok(Json(banks.into_iter().map(view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<bank::BankView>, ServerError> {
    let bank = state.engine.bank(&id).await?;
    Ok(Json(view(bank)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<bank::BankUpdate>,
) -> Result<StatusCode, ServerError> {
    state.engine.update_bank(&id, body.name, body.active).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_bank(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn transfer(
    State(state): State<ServerState>,
    Extension(user): Extension<users::Model>,
    Json(body): Json<bank::TransferNew>,
) -> Result<(StatusCode, Json<transaction::TransactionCreated>), ServerError> {
    let id = state
        .engine
        .transfer(TransferCmd {
            from_bank_id: body.from_bank_id,
            to_bank_id: body.to_bank_id,
            amount_minor: body.amount_minor,
            occurred_at: body.occurred_at,
            created_by: user.username,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(transaction::TransactionCreated { id }),
    ))
}
