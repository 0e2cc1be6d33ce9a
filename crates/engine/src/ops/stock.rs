use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, Ingredient, MeasurementUnit, ResultEngine, catalogs::MeasurementUnits, ingredients,
    stock::ensure_finite,
};

use super::{
    Engine,
    catalogs::require_catalog,
    ingredients::{load_ingredient, require_ingredient_model},
    with_tx,
};

impl Engine {
    /// Add `value` to an ingredient's stock.
    ///
    /// The value is rounded to the ingredient's measurement unit first.
    /// Negative values subtract.
    pub async fn accumulate_stock(&self, ingredient_id: Uuid, value: f64) -> ResultEngine<Ingredient> {
        let value = ensure_finite(value, "stock value")?;
        with_tx!(self, |db_tx| {
            let rounded = round_for_ingredient(&db_tx, ingredient_id, value).await?;
            apply_stock_delta(&db_tx, ingredient_id, rounded).await?;
            load_ingredient(&db_tx, ingredient_id).await
        })
    }
}

/// Round `value` with the precision of the ingredient's measurement unit.
pub(super) async fn round_for_ingredient(
    db_tx: &DatabaseTransaction,
    ingredient_id: Uuid,
    value: f64,
) -> ResultEngine<f64> {
    let ingredient = require_ingredient_model(db_tx, ingredient_id).await?;
    let unit = require_catalog::<MeasurementUnits>(db_tx, ingredient.measurement_unit_id).await?;
    Ok(MeasurementUnit::from(unit).round(value))
}

/// Add an already rounded delta as one `SET current_stock = current_stock + delta`.
///
/// A sum that leaves the `f64` range is rejected and the transaction is
/// discarded with it.
pub(super) async fn apply_stock_delta(
    db_tx: &DatabaseTransaction,
    ingredient_id: Uuid,
    rounded: f64,
) -> ResultEngine<()> {
    let rounded = ensure_finite(rounded, "rounded quantity")?;
    ingredients::Entity::update_many()
        .col_expr(
            ingredients::Column::CurrentStock,
            Expr::col(ingredients::Column::CurrentStock).add(rounded),
        )
        .filter(ingredients::Column::Id.eq(ingredient_id))
        .exec(db_tx)
        .await?;

    let updated = require_ingredient_model(db_tx, ingredient_id).await?;
    if !updated.current_stock.is_finite() {
        return Err(EngineError::InvalidAmount(format!(
            "stock of ingredient {ingredient_id} would leave the representable range"
        )));
    }

    tracing::debug!(ingredient = %ingredient_id, delta = rounded, "stock adjusted");
    Ok(())
}
