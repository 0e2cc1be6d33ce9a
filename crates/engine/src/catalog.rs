//! Reference catalogs.
//!
//! Measurement units, ingredient states and ingredient types are structurally
//! identical lookup tables: a unique name plus a denormalized
//! `ingredients_assigned` counter. Each ingredient references exactly one row
//! of every catalog.
//!
//! [`Catalog`] describes one such table to the engine, so that creation,
//! counter maintenance and reassignment are written once and instantiated per
//! catalog.

use sea_orm::{EntityTrait, UpdateMany, sea_query::InsertStatement};
use uuid::Uuid;

use crate::{ResultEngine, ingredients};

/// A lookup table referenced by every ingredient.
pub trait Catalog: EntityTrait {
    /// Domain view of a row.
    type Entry: From<Self::Model> + Clone + Send;
    /// Attributes accepted on create and update.
    type Attrs: Send + Sync;

    /// Human readable label used in error messages.
    const LABEL: &'static str;

    fn id_column() -> Self::Column;
    fn name_column() -> Self::Column;
    fn assigned_column() -> Self::Column;

    /// Foreign key column on `ingredients` pointing at this catalog.
    fn ingredient_column() -> ingredients::Column;
    /// The row of this catalog an ingredient currently references.
    fn referenced_by(ingredient: &ingredients::Model) -> Uuid;

    fn entry_id(model: &Self::Model) -> Uuid;
    fn ingredients_assigned(model: &Self::Model) -> i32;

    fn attrs_name(attrs: &Self::Attrs) -> &str;

    /// Validate the attributes beyond the name.
    fn validate(_attrs: &Self::Attrs) -> ResultEngine<()> {
        Ok(())
    }

    /// Build the insert for a new row with a zero counter.
    fn insert_query(id: Uuid, name: String, attrs: &Self::Attrs) -> InsertStatement;

    /// Build the update of name and attributes for `id`, leaving the counter alone.
    fn update_query(id: Uuid, name: String, attrs: &Self::Attrs) -> UpdateMany<Self>;
}

/// Attributes of catalogs that only carry a name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntryAttrs {
    pub name: String,
}

impl CatalogEntryAttrs {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
