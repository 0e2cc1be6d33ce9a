//! Inflow primitives.
//!
//! An `Inflow` is an append-only record of stock entering the pantry. Its
//! quantity is stored already rounded to the ingredient's measurement unit,
//! so the ledger and the ingredient stock always agree.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Why stock entered the pantry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InflowReason {
    Purchase,
    Donation,
    Correction,
    Other,
}

impl InflowReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "PURCHASE",
            Self::Donation => "DONATION",
            Self::Correction => "CORRECTION",
            Self::Other => "OTHER",
        }
    }
}

impl TryFrom<&str> for InflowReason {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PURCHASE" => Ok(Self::Purchase),
            "DONATION" => Ok(Self::Donation),
            "CORRECTION" => Ok(Self::Correction),
            "OTHER" => Ok(Self::Other),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid inflow reason: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Inflow {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub date: NaiveDate,
    pub reason: InflowReason,
    pub price: f64,
    pub quantity: f64,
    pub additional_details: Option<String>,
}

/// Attributes of a new inflow. `quantity` is the raw, unrounded value.
#[derive(Clone, Debug, PartialEq)]
pub struct InflowAttrs {
    pub ingredient_id: Uuid,
    pub date: NaiveDate,
    pub reason: InflowReason,
    pub price: f64,
    pub quantity: f64,
    pub additional_details: Option<String>,
}

/// Selects inflows for bulk deletion. At least one field must be set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InflowFilter {
    pub ingredient_id: Option<Uuid>,
}

impl InflowFilter {
    pub fn is_empty(&self) -> bool {
        self.ingredient_id.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "inflows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub date: Date,
    pub reason: String,
    pub price: f64,
    pub quantity: f64,
    pub additional_details: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ingredients::Entity",
        from = "Column::IngredientId",
        to = "super::ingredients::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Ingredient,
}

impl Related<super::ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Inflow> for ActiveModel {
    fn from(inflow: &Inflow) -> Self {
        Self {
            id: ActiveValue::Set(inflow.id),
            ingredient_id: ActiveValue::Set(inflow.ingredient_id),
            date: ActiveValue::Set(inflow.date),
            reason: ActiveValue::Set(inflow.reason.as_str().to_string()),
            price: ActiveValue::Set(inflow.price),
            quantity: ActiveValue::Set(inflow.quantity),
            additional_details: ActiveValue::Set(inflow.additional_details.clone()),
        }
    }
}

impl TryFrom<Model> for Inflow {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            ingredient_id: model.ingredient_id,
            date: model.date,
            reason: InflowReason::try_from(model.reason.as_str())?,
            price: model.price,
            quantity: model.quantity,
            additional_details: model.additional_details,
        })
    }
}
