//! The module contains `IngredientType` struct and its catalog binding.
//!
//! Types group ingredients by what they are (dairy, vegetable, spice...).

use sea_orm::{
    ActiveValue, QueryFilter, QueryTrait, UpdateMany,
    entity::prelude::*,
    sea_query::{Expr, InsertStatement},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Catalog, CatalogEntryAttrs, ingredients};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientType {
    pub id: Uuid,
    pub name: String,
    pub ingredients_assigned: i32,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ingredient_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
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

impl From<Model> for IngredientType {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            ingredients_assigned: model.ingredients_assigned,
        }
    }
}

impl Catalog for Entity {
    type Entry = IngredientType;
    type Attrs = CatalogEntryAttrs;

    const LABEL: &'static str = "ingredient type";

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
        ingredients::Column::IngredientTypeId
    }

    fn referenced_by(ingredient: &ingredients::Model) -> Uuid {
        ingredient.ingredient_type_id
    }

    fn entry_id(model: &Model) -> Uuid {
        model.id
    }

    fn ingredients_assigned(model: &Model) -> i32 {
        model.ingredients_assigned
    }

    fn attrs_name(attrs: &CatalogEntryAttrs) -> &str {
        &attrs.name
    }

    fn insert_query(id: Uuid, name: String, _attrs: &CatalogEntryAttrs) -> InsertStatement {
        Entity::insert(ActiveModel {
            id: ActiveValue::Set(id),
            name: ActiveValue::Set(name),
            ingredients_assigned: ActiveValue::Set(0),
        })
        .into_query()
    }

    fn update_query(id: Uuid, name: String, _attrs: &CatalogEntryAttrs) -> UpdateMany<Entity> {
        Entity::update_many()
            .col_expr(Column::Name, Expr::value(name))
            .filter(Column::Id.eq(id))
    }
}
