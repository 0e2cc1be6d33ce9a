//! The module contains `MeasurementUnit` struct and its catalog binding.

use sea_orm::{
    ActiveValue, QueryFilter, QueryTrait, UpdateMany,
    entity::prelude::*,
    sea_query::{Expr, InsertStatement},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Catalog, EngineError, ResultEngine, ingredients,
    stock::{ensure_precision, round_to_precision},
};

/// A measurement unit (kilograms, litres, pieces...).
///
/// `precision` is the number of decimal places quantities expressed in this
/// unit are rounded to before they touch the stock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasurementUnit {
    pub id: Uuid,
    pub name: String,
    pub precision: i32,
    pub abbreviation: String,
    pub ingredients_assigned: i32,
}

impl MeasurementUnit {
    /// Round a raw quantity to this unit's precision.
    pub fn round(&self, value: f64) -> f64 {
        round_to_precision(value, self.precision)
    }
}

/// Attributes accepted when creating or updating a measurement unit.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementUnitAttrs {
    pub name: String,
    pub precision: i32,
    pub abbreviation: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "measurement_units")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub precision: i32,
    pub abbreviation: String,
    pub ingredients_assigned: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ingredients::Entity")]
    Ingredients,
}

impl Related<super::ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MeasurementUnit {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            precision: model.precision,
            abbreviation: model.abbreviation,
            ingredients_assigned: model.ingredients_assigned,
        }
    }
}

impl Catalog for Entity {
    type Entry = MeasurementUnit;
    type Attrs = MeasurementUnitAttrs;

    const LABEL: &'static str = "measurement unit";

    fn id_column() -> Column {
        Column::Id
    }

    fn name_column() -> Column {
        Column::Name
    }

    fn assigned_column() -> Column {
        Column::IngredientsAssigned
    }

    fn ingredient_column() -> ingredients::Column {
        ingredients::Column::MeasurementUnitId
    }

    fn referenced_by(ingredient: &ingredients::Model) -> Uuid {
        ingredient.measurement_unit_id
    }

    fn entry_id(model: &Model) -> Uuid {
        model.id
    }

    fn ingredients_assigned(model: &Model) -> i32 {
        model.ingredients_assigned
    }

    fn attrs_name(attrs: &MeasurementUnitAttrs) -> &str {
        &attrs.name
    }

    fn validate(attrs: &MeasurementUnitAttrs) -> ResultEngine<()> {
        ensure_precision(attrs.precision)?;
        if attrs.abbreviation.trim().is_empty() {
            return Err(EngineError::InvalidName(
                "measurement unit abbreviation must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn insert_query(id: Uuid, name: String, attrs: &MeasurementUnitAttrs) -> InsertStatement {
        Entity::insert(ActiveModel {
            id: ActiveValue::Set(id),
            name: ActiveValue::Set(name),
            precision: ActiveValue::Set(attrs.precision),
            abbreviation: ActiveValue::Set(attrs.abbreviation.trim().to_string()),
            ingredients_assigned: ActiveValue::Set(0),
        })
        .into_query()
    }

    fn update_query(id: Uuid, name: String, attrs: &MeasurementUnitAttrs) -> UpdateMany<Entity> {
        Entity::update_many()
            .col_expr(Column::Name, Expr::value(name))
            .col_expr(Column::Precision, Expr::value(attrs.precision))
            .col_expr(
                Column::Abbreviation,
                Expr::value(attrs.abbreviation.trim().to_string()),
            )
            .filter(Column::Id.eq(id))
    }
}
