//! Read-only access to the transaction log.

use chrono::{DateTime, Utc};
use sea_orm::{Condition, QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{ResultEngine, TransactionKind, transactions};

use super::Engine;

#[derive(Default)]
pub struct TransactionListFilter {
    pub bank_id: Option<String>,
    pub kind: Option<TransactionKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl Engine {
    pub async fn list_transactions(
        &self,
        filter: TransactionListFilter,
    ) -> ResultEngine<Vec<transactions::Model>> {
        let mut condition = Condition::all();
        if let Some(bank_id) = &filter.bank_id {
            condition = condition.add(
                transactions::Column::FromBankId
                    .eq(bank_id.clone())
                    .or(transactions::Column::ToBankId.eq(bank_id.clone())),
            );
        }
        if let Some(kind) = filter.kind {
            condition = condition.add(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(from) = filter.from {
            condition = condition.add(transactions::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            condition = condition.add(transactions::Column::OccurredAt.lte(to));
        }

        let mut query = transactions::Entity::find()
            .filter(condition)
            .order_by_desc(transactions::Column::OccurredAt)
            .order_by_desc(transactions::Column::Id);
        if let Some(offset) = filter.offset {
            query = query.offset(offset);
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }
        Ok(query.all(&self.database).await?)
    }
}
