use axum::{
    Json,
    extract::{Query, State},
};

use crate::{ServerError, server::ServerState};
use api_types::transaction::{TransactionKind, TransactionList, TransactionView};
use engine::{TransactionListFilter, transactions};

fn kind_to_engine(kind: TransactionKind) -> engine::TransactionKind {
    match kind {
        TransactionKind::Income => engine::TransactionKind::Income,
        TransactionKind::Expense => engine::TransactionKind::Expense,
        TransactionKind::Transfer => engine::TransactionKind::Transfer,
        TransactionKind::Fuel => engine::TransactionKind::Fuel,
        TransactionKind::DriverBudget => engine::TransactionKind::DriverBudget,
        TransactionKind::Maintenance => engine::TransactionKind::Maintenance,
        TransactionKind::TripIncome => engine::TransactionKind::TripIncome,
    }
}

fn kind_to_api(kind: engine::TransactionKind) -> TransactionKind {
    match kind {
        engine::TransactionKind::Income => TransactionKind::Income,
        engine::TransactionKind::Expense => TransactionKind::Expense,
        engine::TransactionKind::Transfer => TransactionKind::Transfer,
        engine::TransactionKind::Fuel => TransactionKind::Fuel,
        engine::TransactionKind::DriverBudget => TransactionKind::DriverBudget,
        engine::TransactionKind::Maintenance => TransactionKind::Maintenance,
        engine::TransactionKind::TripIncome => TransactionKind::TripIncome,
    }
}

fn view(model: transactions::Model) -> Result<TransactionView, ServerError> {
    let kind = engine::TransactionKind::try_from(model.kind.as_str())?;
    Ok(TransactionView {
        id: model.id,
        kind: kind_to_api(kind),
        amount_minor: model.amount_minor,
        from_bank_id: model.from_bank_id,
        to_bank_id: model.to_bank_id,
        related_id: model.related_id,
        related_kind: model.related_kind,
        balance_after_minor: model.balance_after_minor,
        occurred_at: model.occurred_at,
        created_by: model.created_by,
    })
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TransactionList>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let rows = state
        .engine
        .list_transactions(TransactionListFilter {
            bank_id: query.bank_id,
            kind: query.kind.map(kind_to_engine),
            from: query.from,
            to: query.to,
            offset: query.offset,
            limit: query.limit,
        })
        .await?;
    let views = rows.into_iter().map(view).collect::<Result<Vec<_>, _>>()?;
    Ok(Json(views))
}
