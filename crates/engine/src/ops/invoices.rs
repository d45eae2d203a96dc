//! Standalone invoices.
//!
//! Trip settlement writes its own invoices; those are owned by the trip and
//! refused here. Every write re-derives the money columns from the rows so
//! the total law cannot drift.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, InvoiceStatus, ResultEngine, invoice_rows, invoices};

use super::{Engine, normalize_required, with_tx};

pub struct InvoiceRowCmd {
    pub description: String,
    pub amount_minor: i64,
}

pub struct InvoiceCmd {
    pub lr_no: String,
    pub customer_id: String,
    pub rows: Vec<InvoiceRowCmd>,
    /// Tax in permille of the row subtotal.
    pub tax_permille: i64,
    pub advance_minor: i64,
    pub occurred_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct InvoiceUpdate {
    pub rows: Option<Vec<InvoiceRowCmd>>,
    pub tax_permille: Option<i64>,
    pub advance_minor: Option<i64>,
    pub status: Option<InvoiceStatus>,
}

struct Totals {
    tax_amount_minor: i64,
    total_minor: i64,
    remaining_minor: i64,
}

fn totals(rows_minor: i64, tax_permille: i64, advance_minor: i64) -> ResultEngine<Totals> {
    if tax_permille < 0 {
        return Err(EngineError::InvalidAmount(
            "tax_permille must be >= 0".to_string(),
        ));
    }
    if advance_minor < 0 {
        return Err(EngineError::InvalidAmount(
            "advance must be >= 0".to_string(),
        ));
    }
    let tax_amount_minor = rows_minor * tax_permille / 1000;
    let total_minor = rows_minor + tax_amount_minor;
    Ok(Totals {
        tax_amount_minor,
        total_minor,
        remaining_minor: (total_minor - advance_minor).max(0),
    })
}

fn checked_rows(rows: &[InvoiceRowCmd]) -> ResultEngine<i64> {
    if rows.is_empty() {
        return Err(EngineError::Validation(
            "an invoice needs at least one row".to_string(),
        ));
    }
    let mut subtotal = 0;
    for row in rows {
        if row.amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "invoice row amount must be > 0".to_string(),
            ));
        }
        subtotal += row.amount_minor;
    }
    Ok(subtotal)
}

impl Engine {
    pub async fn new_invoice(&self, cmd: InvoiceCmd) -> ResultEngine<String> {
        let lr_no = normalize_required(&cmd.lr_no, "lr_no")?;
        let subtotal = checked_rows(&cmd.rows)?;
        let totals = totals(subtotal, cmd.tax_permille, cmd.advance_minor)?;
        let occurred_at = cmd.occurred_at.unwrap_or_else(Utc::now);

        with_tx!(self, |db_tx| {
            let existing = invoices::Entity::find()
                .filter(invoices::Column::LrNo.eq(lr_no.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(lr_no));
            }

            let status = if cmd.advance_minor >= totals.total_minor {
                InvoiceStatus::Paid
            } else if cmd.advance_minor > 0 {
                InvoiceStatus::Pending
            } else {
                InvoiceStatus::Unpaid
            };

            let id = Uuid::new_v4().to_string();
            let invoice = invoices::ActiveModel {
                id: ActiveValue::Set(id.clone()),
                lr_no: ActiveValue::Set(lr_no),
                customer_id: ActiveValue::Set(cmd.customer_id.clone()),
                trip_id: ActiveValue::Set(None),
                route_id: ActiveValue::Set(None),
                tax_permille: ActiveValue::Set(cmd.tax_permille),
                tax_amount_minor: ActiveValue::Set(totals.tax_amount_minor),
                total_minor: ActiveValue::Set(totals.total_minor),
                advance_minor: ActiveValue::Set(cmd.advance_minor),
                remaining_minor: ActiveValue::Set(totals.remaining_minor),
                status: ActiveValue::Set(status.as_str().to_string()),
                occurred_at: ActiveValue::Set(occurred_at),
            };
            invoice.insert(&db_tx).await?;

            for row in &cmd.rows {
                let model = invoice_rows::ActiveModel {
                    id: ActiveValue::Set(Uuid::new_v4().to_string()),
                    invoice_id: ActiveValue::Set(id.clone()),
                    description: ActiveValue::Set(normalize_required(
                        &row.description,
                        "row description",
                    )?),
                    amount_minor: ActiveValue::Set(row.amount_minor),
                };
                model.insert(&db_tx).await?;
            }
            Ok(id)
        })
    }

    pub async fn invoice(
        &self,
        id: &str,
    ) -> ResultEngine<(invoices::Model, Vec<invoice_rows::Model>)> {
        let invoice = invoices::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("invoice {id}")))?;
        let rows = invoice_rows::Entity::find()
            .filter(invoice_rows::Column::InvoiceId.eq(id.to_string()))
            .all(&self.database)
            .await?;
        Ok((invoice, rows))
    }

    pub async fn list_invoices(
        &self,
    ) -> ResultEngine<Vec<(invoices::Model, Vec<invoice_rows::Model>)>> {
        Ok(invoices::Entity::find()
            .find_with_related(invoice_rows::Entity)
            .order_by_desc(invoices::Column::OccurredAt)
            .all(&self.database)
            .await?)
    }

    pub async fn update_invoice(&self, id: &str, update: InvoiceUpdate) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let invoice = invoices::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("invoice {id}")))?;
            if invoice.trip_id.is_some() {
                return Err(EngineError::InvalidTransition(
                    "invoice is managed by its trip".to_string(),
                ));
            }

            let subtotal = match &update.rows {
                Some(rows) => {
                    let subtotal = checked_rows(rows)?;
                    invoice_rows::Entity::delete_many()
                        .filter(invoice_rows::Column::InvoiceId.eq(id.to_string()))
                        .exec(&db_tx)
                        .await?;
                    for row in rows {
                        let model = invoice_rows::ActiveModel {
                            id: ActiveValue::Set(Uuid::new_v4().to_string()),
                            invoice_id: ActiveValue::Set(id.to_string()),
                            description: ActiveValue::Set(normalize_required(
                                &row.description,
                                "row description",
                            )?),
                            amount_minor: ActiveValue::Set(row.amount_minor),
                        };
                        model.insert(&db_tx).await?;
                    }
                    subtotal
                }
                None => invoice.total_minor - invoice.tax_amount_minor,
            };

            let tax_permille = update.tax_permille.unwrap_or(invoice.tax_permille);
            let advance_minor = update.advance_minor.unwrap_or(invoice.advance_minor);
            let totals = totals(subtotal, tax_permille, advance_minor)?;

            let status = match update.status {
                Some(status) => status,
                None if advance_minor >= totals.total_minor => InvoiceStatus::Paid,
                None if advance_minor > 0 => InvoiceStatus::Pending,
                None => InvoiceStatus::try_from(invoice.status.as_str())?,
            };

            let mut model: invoices::ActiveModel = invoice.into();
            model.tax_permille = ActiveValue::Set(tax_permille);
            model.tax_amount_minor = ActiveValue::Set(totals.tax_amount_minor);
            model.total_minor = ActiveValue::Set(totals.total_minor);
            model.advance_minor = ActiveValue::Set(advance_minor);
            model.remaining_minor = ActiveValue::Set(totals.remaining_minor);
            model.status = ActiveValue::Set(status.as_str().to_string());
            model.update(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn delete_invoice(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let invoice = invoices::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("invoice {id}")))?;
            if invoice.trip_id.is_some() {
                return Err(EngineError::InvalidTransition(
                    "invoice is managed by its trip".to_string(),
                ));
            }
            invoice_rows::Entity::delete_many()
                .filter(invoice_rows::Column::InvoiceId.eq(id.to_string()))
                .exec(&db_tx)
                .await?;
            invoice.delete(&db_tx).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::totals;

    #[test]
    fn total_law() {
        // 10_000 subtotal, 180 permille tax, 3_000 advance.
        let t = totals(10_000, 180, 3_000).unwrap();
        assert_eq!(t.tax_amount_minor, 1_800);
        assert_eq!(t.total_minor, 11_800);
        assert_eq!(t.remaining_minor, 8_800);
        // Overpaid advance clamps remaining at zero.
        let t = totals(10_000, 0, 12_000).unwrap();
        assert_eq!(t.remaining_minor, 0);
    }
}
