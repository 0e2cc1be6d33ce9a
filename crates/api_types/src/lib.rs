use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod catalog {
    use super::*;

    /// Request body for creating or replacing a measurement unit.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MeasurementUnitNew {
        pub name: String,
        /// Decimal places quantities in this unit are rounded to.
        pub precision: i32,
        pub abbreviation: String,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct MeasurementUnitView {
        pub id: Uuid,
        pub name: String,
        pub precision: i32,
        pub abbreviation: String,
        pub ingredients_assigned: i32,
    }

    /// Request body for name-only catalogs (states and types).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CatalogEntryNew {
        pub name: String,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct CatalogEntryView {
        pub id: Uuid,
        pub name: String,
        pub ingredients_assigned: i32,
    }

    /// Request body for `POST /<catalog>/assign-to-ingredient`.
    ///
    /// The target may also be sent under the catalog specific name
    /// (`measurement_unit_id`, `ingredient_state_id`, `ingredient_type_id`).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AssignToIngredients {
        #[serde(
            alias = "measurement_unit_id",
            alias = "ingredient_state_id",
            alias = "ingredient_type_id"
        )]
        pub target_id: Uuid,
        #[serde(default)]
        pub ingredient_ids: Vec<Uuid>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct AssignResult {
        /// Ingredients whose reference actually changed.
        pub reassigned: usize,
    }
}

pub mod ingredient {
    use super::*;
    use crate::catalog::{CatalogEntryView, MeasurementUnitView};

    /// Request body for creating or replacing an ingredient.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct IngredientNew {
        pub name: String,
        pub measurement_unit_id: Uuid,
        pub ingredient_state_id: Uuid,
        pub ingredient_type_id: Uuid,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct IngredientView {
        pub id: Uuid,
        pub name: String,
        pub current_stock: f64,
        pub measurement_unit: MeasurementUnitView,
        pub ingredient_state: CatalogEntryView,
        pub ingredient_type: CatalogEntryView,
    }

    /// Query string of `GET /ingredients`, e.g. `?ids=<uuid>&ids=<uuid>`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct IngredientListQuery {
        #[serde(default)]
        pub ids: Vec<Uuid>,
    }

    /// Request body for `POST /ingredients/{id}/add-stock`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockAdd {
        /// Raw quantity, rounded server side. Negative values subtract.
        pub value: f64,
    }
}

pub mod inflow {
    use super::*;
    use chrono::NaiveDate;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum InflowReason {
        Purchase,
        Donation,
        Correction,
        Other,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InflowNew {
        pub ingredient_id: Uuid,
        pub date: NaiveDate,
        pub reason: InflowReason,
        pub price: f64,
        /// Raw quantity; stored rounded to the ingredient's unit.
        pub quantity: f64,
        pub additional_details: Option<String>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct InflowView {
        pub id: Uuid,
        pub ingredient_id: Uuid,
        pub date: NaiveDate,
        pub reason: InflowReason,
        pub price: f64,
        pub quantity: f64,
        pub additional_details: Option<String>,
    }

    /// Query string of `DELETE /inflows`. At least one field must be set.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct InflowDeleteFilter {
        pub ingredient_id: Option<Uuid>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct InflowsDeleted {
        pub deleted: u64,
    }
}
