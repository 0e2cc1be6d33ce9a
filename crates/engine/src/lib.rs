//! Pantry engine.
//!
//! Ingredients, the three reference catalogs they point at (measurement unit,
//! state, type) and the inflow ledger that feeds their stock. All operations
//! go through [`Engine`], which runs each of them inside one database
//! transaction.

pub use catalog::{Catalog, CatalogEntryAttrs};
pub use error::EngineError;
pub use inflows::{Inflow, InflowAttrs, InflowFilter, InflowReason};
pub use ingredient_states::IngredientState;
pub use ingredient_types::IngredientType;
pub use ingredients::{Ingredient, IngredientAttrs, IngredientFilter};
pub use measurement_units::{MeasurementUnit, MeasurementUnitAttrs};
pub use ops::{Engine, EngineBuilder};
pub use stock::{MAX_PRECISION, round_to_precision};

mod catalog;
mod error;
mod inflows;
mod ingredient_states;
mod ingredient_types;
mod ingredients;
mod measurement_units;
mod ops;
mod stock;

/// Catalog entities, used to select a catalog in the generic operations.
///
/// ```ignore
/// let units = engine.catalog_entries::<catalogs::MeasurementUnits>().await?;
/// ```
pub mod catalogs {
    pub use crate::ingredient_states::Entity as IngredientStates;
    pub use crate::ingredient_types::Entity as IngredientTypes;
    pub use crate::measurement_units::Entity as MeasurementUnits;
}

type ResultEngine<T> = Result<T, EngineError>;
