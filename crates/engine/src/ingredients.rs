//! The module contains `Ingredient` struct and its implementation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{IngredientState, IngredientType, MeasurementUnit};

/// An ingredient with its catalog references resolved.
///
/// Every ingredient references exactly one measurement unit, one state and one
/// type; reads always load all three.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub current_stock: f64,
    pub measurement_unit: MeasurementUnit,
    pub ingredient_state: IngredientState,
    pub ingredient_type: IngredientType,
}

/// Attributes accepted when creating or updating an ingredient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngredientAttrs {
    pub name: String,
    pub measurement_unit_id: Uuid,
    pub ingredient_state_id: Uuid,
    pub ingredient_type_id: Uuid,
}

/// Restricts an ingredient listing. The default selects everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngredientFilter {
    pub ids: Option<Vec<Uuid>>,
}

impl IngredientFilter {
    pub fn ids(ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            ids: Some(ids.into_iter().collect()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub current_stock: f64,
    pub measurement_unit_id: Uuid,
    pub ingredient_state_id: Uuid,
    pub ingredient_type_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::measurement_units::Entity",
        from = "Column::MeasurementUnitId",
        to = "super::measurement_units::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    MeasurementUnit,
    #[sea_orm(
        belongs_to = "super::ingredient_states::Entity",
        from = "Column::IngredientStateId",
        to = "super::ingredient_states::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    IngredientState,
    #[sea_orm(
        belongs_to = "super::ingredient_types::Entity",
        from = "Column::IngredientTypeId",
        to = "super::ingredient_types::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    IngredientType,
    #[sea_orm(has_many = "super::inflows::Entity")]
    Inflows,
}

impl Related<super::measurement_units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MeasurementUnit.def()
    }
}

impl Related<super::ingredient_states::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IngredientState.def()
    }
}

impl Related<super::ingredient_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IngredientType.def()
    }
}

impl Related<super::inflows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inflows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
