use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use api_types::invoice::{
    InvoiceCreated, InvoiceNew, InvoiceRowView, InvoiceStatus, InvoiceUpdate, InvoiceView,
};
use engine::{InvoiceCmd, InvoiceRowCmd, invoice_rows, invoices};

fn status_to_engine(status: InvoiceStatus) -> engine::InvoiceStatus {
    match status {
        InvoiceStatus::Paid => engine::InvoiceStatus::Paid,
        InvoiceStatus::Unpaid => engine::InvoiceStatus::Unpaid,
        InvoiceStatus::Pending => engine::InvoiceStatus::Pending,
    }
}

fn status_to_api(status: engine::InvoiceStatus) -> InvoiceStatus {
    match status {
        engine::InvoiceStatus::Paid => InvoiceStatus::Paid,
        engine::InvoiceStatus::Unpaid => InvoiceStatus::Unpaid,
        engine::InvoiceStatus::Pending => InvoiceStatus::Pending,
    }
}

fn view(
    invoice: invoices::Model,
    rows: Vec<invoice_rows::Model>,
) -> Result<InvoiceView, ServerError> {
    let status = engine::InvoiceStatus::try_from(invoice.status.as_str())?;
    Ok(InvoiceView {
        id: invoice.id,
        lr_no: invoice.lr_no,
        customer_id: invoice.customer_id,
        trip_id: invoice.trip_id,
        rows: rows
            .into_iter()
            .map(|row| InvoiceRowView {
                description: row.description,
                amount_minor: row.amount_minor,
            })
            .collect(),
        tax_permille: invoice.tax_permille,
        tax_amount_minor: invoice.tax_amount_minor,
        total_minor: invoice.total_minor,
        advance_minor: invoice.advance_minor,
        remaining_minor: invoice.remaining_minor,
        status: status_to_api(status),
        occurred_at: invoice.occurred_at,
    })
}

pub async fn create(
    State(state): State<ServerState>,
    Json(body): Json<InvoiceNew>,
) -> Result<(StatusCode, Json<InvoiceCreated>), ServerError> {
    let id = state
        .engine
        .new_invoice(InvoiceCmd {
            lr_no: body.lr_no,
            customer_id: body.customer_id,
            rows: body
                .rows
                .into_iter()
                .map(|row| InvoiceRowCmd {
                    description: row.description,
                    amount_minor: row.amount_minor,
                })
                .collect(),
            tax_permille: body.tax_permille.unwrap_or(0),
            advance_minor: body.advance_minor.unwrap_or(0),
            occurred_at: body.occurred_at,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(InvoiceCreated { id })))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<InvoiceView>>, ServerError> {
    let rows = state.engine.list_invoices().await?;
    let views = rows
        .into_iter()
        .map(|(invoice, rows)| view(invoice, rows))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(views))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<InvoiceView>, ServerError> {
    let (invoice, rows) = state.engine.invoice(&id).await?;
    Ok(Json(view(invoice, rows)?))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<InvoiceUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_invoice(
            &id,
            engine::InvoiceUpdate {
                rows: None,
                tax_permille: None,
                advance_minor: body.advance_minor,
                status: body.status.map(status_to_engine),
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_invoice(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
