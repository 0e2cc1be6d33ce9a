use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Ingredient, IngredientAttrs, IngredientFilter, InflowFilter, ResultEngine,
    catalogs::{IngredientStates, IngredientTypes, MeasurementUnits},
    ingredients,
};

use super::{
    Engine,
    assignment::assign_in,
    catalogs::{adjust_assigned_count_in, catalog_entries_by_id, require_catalog},
    inflows::delete_inflows_in,
    normalize_required_name, with_tx,
};

impl Engine {
    /// Create an ingredient referencing one entry of each catalog.
    ///
    /// The three referenced entries gain one assigned ingredient each, in the
    /// same transaction as the insert.
    pub async fn create_ingredient(&self, attrs: IngredientAttrs) -> ResultEngine<Ingredient> {
        let name = normalize_required_name(&attrs.name, "ingredient")?;
        with_tx!(self, |db_tx| {
            require_catalog::<MeasurementUnits>(&db_tx, attrs.measurement_unit_id).await?;
            require_catalog::<IngredientStates>(&db_tx, attrs.ingredient_state_id).await?;
            require_catalog::<IngredientTypes>(&db_tx, attrs.ingredient_type_id).await?;
            ensure_name_available(&db_tx, &name, None).await?;

            tokio::try_join!(
                adjust_assigned_count_in::<MeasurementUnits>(&db_tx, attrs.measurement_unit_id, 1),
                adjust_assigned_count_in::<IngredientStates>(&db_tx, attrs.ingredient_state_id, 1),
                adjust_assigned_count_in::<IngredientTypes>(&db_tx, attrs.ingredient_type_id, 1),
            )?;

            let id = Uuid::new_v4();
            let active = ingredients::ActiveModel {
                id: ActiveValue::Set(id),
                name: ActiveValue::Set(name.clone()),
                current_stock: ActiveValue::Set(0.0),
                measurement_unit_id: ActiveValue::Set(attrs.measurement_unit_id),
                ingredient_state_id: ActiveValue::Set(attrs.ingredient_state_id),
                ingredient_type_id: ActiveValue::Set(attrs.ingredient_type_id),
            };
            active
                .insert(&db_tx)
                .await
                .map_err(|err| EngineError::from_write(err, &name))?;

            load_ingredient(&db_tx, id).await
        })
    }

    pub async fn ingredient(&self, id: Uuid) -> ResultEngine<Ingredient> {
        with_tx!(self, |db_tx| load_ingredient(&db_tx, id).await)
    }

    /// List ingredients ordered by name, optionally restricted to a set of ids.
    pub async fn ingredients(&self, filter: IngredientFilter) -> ResultEngine<Vec<Ingredient>> {
        with_tx!(self, |db_tx| {
            let mut query = ingredients::Entity::find().order_by_asc(ingredients::Column::Name);
            if let Some(ids) = filter.ids {
                query = query.filter(ingredients::Column::Id.is_in(ids));
            }
            let models = query.all(&db_tx).await?;
            hydrate(&db_tx, models).await
        })
    }

    /// Rename an ingredient and move it to the given catalog entries.
    ///
    /// Reference changes go through catalog reassignment so the counters of
    /// both the old and the new entries stay exact.
    pub async fn update_ingredient(
        &self,
        id: Uuid,
        attrs: IngredientAttrs,
    ) -> ResultEngine<Ingredient> {
        let name = normalize_required_name(&attrs.name, "ingredient")?;
        with_tx!(self, |db_tx| {
            require_ingredient_model(&db_tx, id).await?;
            ensure_name_available(&db_tx, &name, Some(id)).await?;

            let active = ingredients::ActiveModel {
                id: ActiveValue::Set(id),
                name: ActiveValue::Set(name.clone()),
                ..Default::default()
            };
            active
                .update(&db_tx)
                .await
                .map_err(|err| EngineError::from_write(err, &name))?;

            assign_in::<MeasurementUnits>(&db_tx, attrs.measurement_unit_id, &[id]).await?;
            assign_in::<IngredientStates>(&db_tx, attrs.ingredient_state_id, &[id]).await?;
            assign_in::<IngredientTypes>(&db_tx, attrs.ingredient_type_id, &[id]).await?;

            load_ingredient(&db_tx, id).await
        })
    }

    /// Delete an ingredient and release its catalog entries.
    ///
    /// The ingredient's inflows are purged first; its three catalog entries
    /// each lose one assigned ingredient.
    pub async fn delete_ingredient(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_ingredient_model(&db_tx, id).await?;

            delete_inflows_in(
                &db_tx,
                &InflowFilter {
                    ingredient_id: Some(id),
                },
            )
            .await?;

            let result = ingredients::Entity::delete_many()
                .filter(ingredients::Column::Id.eq(id))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(format!("ingredient {id}")));
            }

            tokio::try_join!(
                adjust_assigned_count_in::<MeasurementUnits>(&db_tx, model.measurement_unit_id, -1),
                adjust_assigned_count_in::<IngredientStates>(&db_tx, model.ingredient_state_id, -1),
                adjust_assigned_count_in::<IngredientTypes>(&db_tx, model.ingredient_type_id, -1),
            )?;
            Ok(())
        })
    }
}

pub(super) async fn require_ingredient_model(
    db_tx: &DatabaseTransaction,
    id: Uuid,
) -> ResultEngine<ingredients::Model> {
    ingredients::Entity::find_by_id(id)
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("ingredient {id}")))
}

pub(super) async fn load_ingredient(
    db_tx: &DatabaseTransaction,
    id: Uuid,
) -> ResultEngine<Ingredient> {
    let model = require_ingredient_model(db_tx, id).await?;
    hydrate(db_tx, vec![model])
        .await?
        .pop()
        .ok_or_else(|| EngineError::KeyNotFound(format!("ingredient {id}")))
}

async fn ensure_name_available(
    db_tx: &DatabaseTransaction,
    name: &str,
    except: Option<Uuid>,
) -> ResultEngine<()> {
    let mut query = ingredients::Entity::find().filter(ingredients::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(ingredients::Column::Id.ne(id));
    }

    if query.one(db_tx).await?.is_some() {
        return Err(EngineError::ExistingKey(name.to_string()));
    }
    Ok(())
}

/// Resolve the catalog references of `models`, preserving their order.
async fn hydrate(
    db_tx: &DatabaseTransaction,
    models: Vec<ingredients::Model>,
) -> ResultEngine<Vec<Ingredient>> {
    let units = catalog_entries_by_id::<MeasurementUnits>(
        db_tx,
        models.iter().map(|m| m.measurement_unit_id).collect(),
    )
    .await?;
    let states = catalog_entries_by_id::<IngredientStates>(
        db_tx,
        models.iter().map(|m| m.ingredient_state_id).collect(),
    )
    .await?;
    let types = catalog_entries_by_id::<IngredientTypes>(
        db_tx,
        models.iter().map(|m| m.ingredient_type_id).collect(),
    )
    .await?;

    models
        .into_iter()
        .map(|model| -> ResultEngine<Ingredient> {
            let measurement_unit = units.get(&model.measurement_unit_id).cloned().ok_or_else(
                || EngineError::KeyNotFound(format!("measurement unit {}", model.measurement_unit_id)),
            )?;
            let ingredient_state = states.get(&model.ingredient_state_id).cloned().ok_or_else(
                || EngineError::KeyNotFound(format!("ingredient state {}", model.ingredient_state_id)),
            )?;
            let ingredient_type = types.get(&model.ingredient_type_id).cloned().ok_or_else(
                || EngineError::KeyNotFound(format!("ingredient type {}", model.ingredient_type_id)),
            )?;
            Ok(Ingredient {
                id: model.id,
                name: model.name,
                current_stock: model.current_stock,
                measurement_unit,
                ingredient_state,
                ingredient_type,
            })
        })
        .collect()
}
