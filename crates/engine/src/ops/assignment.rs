//! Catalog reassignment.
//!
//! Moving an ingredient from one catalog row to another must keep both rows'
//! `ingredients_assigned` exact: the new row gains one, the old row loses one,
//! and the ingredient's reference only switches once both counters moved.

use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Catalog, ResultEngine, ingredients};

use super::{
    Engine,
    catalogs::{adjust_assigned_count_in, require_catalog},
    ingredients::require_ingredient_model,
    with_tx,
};

impl Engine {
    /// Point every ingredient in `ingredient_ids` at catalog entry `target_id`.
    ///
    /// Ingredients are processed in order; those already referencing the
    /// target are skipped without any write. The first failure aborts the
    /// batch and rolls back every ingredient moved before it.
    ///
    /// Returns how many ingredients actually changed reference.
    pub async fn assign_to_ingredients<C: Catalog>(
        &self,
        target_id: Uuid,
        ingredient_ids: &[Uuid],
    ) -> ResultEngine<usize> {
        with_tx!(self, |db_tx| {
            assign_in::<C>(&db_tx, target_id, ingredient_ids).await
        })
    }
}

pub(super) async fn assign_in<C: Catalog>(
    db_tx: &DatabaseTransaction,
    target_id: Uuid,
    ingredient_ids: &[Uuid],
) -> ResultEngine<usize> {
    let target = require_catalog::<C>(db_tx, target_id).await?;
    let target_id = C::entry_id(&target);

    let mut moved = 0;
    for &ingredient_id in ingredient_ids {
        // Re-read on every step so repeated ids see the switch already made.
        let ingredient = require_ingredient_model(db_tx, ingredient_id).await?;
        let old_id = C::referenced_by(&ingredient);
        if old_id == target_id {
            continue;
        }

        tokio::try_join!(
            adjust_assigned_count_in::<C>(db_tx, target_id, 1),
            adjust_assigned_count_in::<C>(db_tx, old_id, -1),
        )?;

        let mut active = ingredients::ActiveModel {
            id: ActiveValue::Set(ingredient.id),
            ..Default::default()
        };
        active.set(C::ingredient_column(), target_id.into());
        active.update(db_tx).await?;

        tracing::debug!(
            ingredient = %ingredient.id,
            from = %old_id,
            to = %target_id,
            "reassigned {}",
            C::LABEL
        );
        moved += 1;
    }

    Ok(moved)
}
