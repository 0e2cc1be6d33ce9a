//! Catalog API endpoints.
//!
//! Measurement units, ingredient states and ingredient types expose the same
//! set of routes; the handlers are written once over [`CatalogResource`].

use api_types::catalog::{
    AssignResult, AssignToIngredients, CatalogEntryNew, CatalogEntryView, MeasurementUnitNew,
    MeasurementUnitView,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use engine::{
    Catalog, CatalogEntryAttrs, IngredientState, IngredientType, MeasurementUnit,
    MeasurementUnitAttrs,
    catalogs::{IngredientStates, IngredientTypes, MeasurementUnits},
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// Binds a catalog to its wire types.
pub(crate) trait CatalogResource: Catalog + Send + Sync + 'static {
    type New: DeserializeOwned + Send + 'static;
    type View: Serialize + Send + 'static;

    fn attrs(payload: Self::New) -> Self::Attrs;
    fn view(entry: Self::Entry) -> Self::View;
}

pub(crate) fn map_measurement_unit(unit: MeasurementUnit) -> MeasurementUnitView {
    MeasurementUnitView {
        id: unit.id,
        name: unit.name,
        precision: unit.precision,
        abbreviation: unit.abbreviation,
        ingredients_assigned: unit.ingredients_assigned,
    }
}

pub(crate) fn map_state(state: IngredientState) -> CatalogEntryView {
    CatalogEntryView {
        id: state.id,
        name: state.name,
        ingredients_assigned: state.ingredients_assigned,
    }
}

pub(crate) fn map_type(kind: IngredientType) -> CatalogEntryView {
    CatalogEntryView {
        id: kind.id,
        name: kind.name,
        ingredients_assigned: kind.ingredients_assigned,
    }
}

impl CatalogResource for MeasurementUnits {
    type New = MeasurementUnitNew;
    type View = MeasurementUnitView;

    fn attrs(payload: MeasurementUnitNew) -> MeasurementUnitAttrs {
        MeasurementUnitAttrs {
            name: payload.name,
            precision: payload.precision,
            abbreviation: payload.abbreviation,
        }
    }

    fn view(entry: MeasurementUnit) -> MeasurementUnitView {
        map_measurement_unit(entry)
    }
}

impl CatalogResource for IngredientStates {
    type New = CatalogEntryNew;
    type View = CatalogEntryView;

    fn attrs(payload: CatalogEntryNew) -> CatalogEntryAttrs {
        CatalogEntryAttrs::new(payload.name)
    }

    fn view(entry: IngredientState) -> CatalogEntryView {
        map_state(entry)
    }
}

impl CatalogResource for IngredientTypes {
    type New = CatalogEntryNew;
    type View = CatalogEntryView;

    fn attrs(payload: CatalogEntryNew) -> CatalogEntryAttrs {
        CatalogEntryAttrs::new(payload.name)
    }

    fn view(entry: IngredientType) -> CatalogEntryView {
        map_type(entry)
    }
}

/// Mount the catalog routes of `C` under `base`.
pub(crate) fn routes<C: CatalogResource>(
    router: Router<ServerState>,
    base: &str,
) -> Router<ServerState> {
    router
        .route(base, post(create::<C>).get(list::<C>))
        .route(
            &format!("{base}/assign-to-ingredient"),
            post(assign_to_ingredients::<C>),
        )
        .route(
            &format!("{base}/{{id}}"),
            get(get_one::<C>).patch(update::<C>).delete(delete::<C>),
        )
}

async fn create<C: CatalogResource>(
    State(state): State<ServerState>,
    Json(payload): Json<C::New>,
) -> Result<(StatusCode, Json<C::View>), ServerError> {
    let entry = state
        .engine
        .create_catalog_entry::<C>(C::attrs(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(C::view(entry))))
}

async fn list<C: CatalogResource>(
    State(state): State<ServerState>,
) -> Result<Json<Vec<C::View>>, ServerError> {
    let entries = state
        .engine
        .catalog_entries::<C>()
        .await?
        .into_iter()
        .map(C::view)
        .collect();
    Ok(Json(entries))
}

async fn get_one<C: CatalogResource>(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<C::View>, ServerError> {
    let entry = state.engine.catalog_entry::<C>(id).await?;
    Ok(Json(C::view(entry)))
}

async fn update<C: CatalogResource>(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<C::New>,
) -> Result<Json<C::View>, ServerError> {
    let entry = state
        .engine
        .update_catalog_entry::<C>(id, C::attrs(payload))
        .await?;
    Ok(Json(C::view(entry)))
}

async fn delete<C: CatalogResource>(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_catalog_entry::<C>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn assign_to_ingredients<C: CatalogResource>(
    State(state): State<ServerState>,
    Json(payload): Json<AssignToIngredients>,
) -> Result<Json<AssignResult>, ServerError> {
    if payload.ingredient_ids.is_empty() {
        return Err(ServerError::Generic(
            "ingredient_ids must contain at least one id".to_string(),
        ));
    }

    let reassigned = state
        .engine
        .assign_to_ingredients::<C>(payload.target_id, &payload.ingredient_ids)
        .await?;
    Ok(Json(AssignResult { reassigned }))
}
