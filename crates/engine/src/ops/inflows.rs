//! Inflow ledger operations.
//!
//! Recording an inflow and growing the ingredient's stock happen in one
//! transaction, with the same rounded quantity on both sides.

use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Inflow, InflowAttrs, InflowFilter, ResultEngine, inflows, stock::ensure_finite,
};

use super::{
    Engine, normalize_optional_text,
    stock::{apply_stock_delta, round_for_ingredient},
    with_tx,
};

impl Engine {
    /// Record an inflow and add its rounded quantity to the ingredient stock.
    pub async fn record_inflow(&self, attrs: InflowAttrs) -> ResultEngine<Inflow> {
        let price = ensure_finite(attrs.price, "price")?;
        let quantity = ensure_finite(attrs.quantity, "quantity")?;
        let additional_details = normalize_optional_text(attrs.additional_details.as_deref());

        with_tx!(self, |db_tx| {
            let quantity = round_for_ingredient(&db_tx, attrs.ingredient_id, quantity).await?;
            let inflow = Inflow {
                id: Uuid::new_v4(),
                ingredient_id: attrs.ingredient_id,
                date: attrs.date,
                reason: attrs.reason,
                price,
                quantity,
                additional_details,
            };
            inflows::ActiveModel::from(&inflow).insert(&db_tx).await?;
            apply_stock_delta(&db_tx, inflow.ingredient_id, inflow.quantity).await?;

            tracing::info!(
                inflow = %inflow.id,
                ingredient = %inflow.ingredient_id,
                quantity = inflow.quantity,
                "inflow recorded"
            );
            Ok(inflow)
        })
    }

    pub async fn inflow(&self, id: Uuid) -> ResultEngine<Inflow> {
        with_tx!(self, |db_tx| {
            let model = require_inflow(&db_tx, id).await?;
            Inflow::try_from(model)
        })
    }

    /// Every inflow, most recent date first.
    pub async fn inflows(&self) -> ResultEngine<Vec<Inflow>> {
        with_tx!(self, |db_tx| {
            let models = inflows::Entity::find()
                .order_by_desc(inflows::Column::Date)
                .order_by_asc(inflows::Column::Id)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Inflow::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Delete one inflow and take its quantity back out of the stock.
    pub async fn delete_inflow(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_inflow(&db_tx, id).await?;
            let result = inflows::Entity::delete_many()
                .filter(inflows::Column::Id.eq(id))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(format!("inflow {id}")));
            }

            apply_stock_delta(&db_tx, model.ingredient_id, -model.quantity).await
        })
    }

    /// Purge the inflows matching `filter` and return how many were removed.
    ///
    /// This only clears ledger rows; ingredient stock is left as is. An empty
    /// filter is rejected rather than wiping the whole ledger.
    pub async fn delete_inflows(&self, filter: InflowFilter) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| delete_inflows_in(&db_tx, &filter).await)
    }
}

async fn require_inflow(db_tx: &DatabaseTransaction, id: Uuid) -> ResultEngine<inflows::Model> {
    inflows::Entity::find_by_id(id)
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("inflow {id}")))
}

pub(super) async fn delete_inflows_in(
    db_tx: &DatabaseTransaction,
    filter: &InflowFilter,
) -> ResultEngine<u64> {
    if filter.is_empty() {
        return Err(EngineError::MissingFilter(
            "there must be at least one filter applied".to_string(),
        ));
    }

    let mut query = inflows::Entity::delete_many();
    if let Some(ingredient_id) = filter.ingredient_id {
        query = query.filter(inflows::Column::IngredientId.eq(ingredient_id));
    }
    let result = query.exec(db_tx).await?;

    tracing::debug!(removed = result.rows_affected, "inflows purged");
    Ok(result.rows_affected)
}
