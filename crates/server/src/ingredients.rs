//! Ingredient API endpoints

use api_types::ingredient::{IngredientListQuery, IngredientNew, IngredientView, StockAdd};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::Query;
use engine::{Ingredient, IngredientAttrs, IngredientFilter};
use uuid::Uuid;

use crate::{
    ServerError,
    catalogs::{map_measurement_unit, map_state, map_type},
    server::ServerState,
};

fn map_ingredient(ingredient: Ingredient) -> IngredientView {
    IngredientView {
        id: ingredient.id,
        name: ingredient.name,
        current_stock: ingredient.current_stock,
        measurement_unit: map_measurement_unit(ingredient.measurement_unit),
        ingredient_state: map_state(ingredient.ingredient_state),
        ingredient_type: map_type(ingredient.ingredient_type),
    }
}

fn attrs(payload: IngredientNew) -> IngredientAttrs {
    IngredientAttrs {
        name: payload.name,
        measurement_unit_id: payload.measurement_unit_id,
        ingredient_state_id: payload.ingredient_state_id,
        ingredient_type_id: payload.ingredient_type_id,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<IngredientNew>,
) -> Result<(StatusCode, Json<IngredientView>), ServerError> {
    let ingredient = state.engine.create_ingredient(attrs(payload)).await?;
    Ok((StatusCode::CREATED, Json(map_ingredient(ingredient))))
}

/// Handle `GET /ingredients`, optionally narrowed with repeated `ids` params.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<IngredientListQuery>,
) -> Result<Json<Vec<IngredientView>>, ServerError> {
    let filter = if query.ids.is_empty() {
        IngredientFilter::default()
    } else {
        IngredientFilter::ids(query.ids)
    };

    let ingredients = state
        .engine
        .ingredients(filter)
        .await?
        .into_iter()
        .map(map_ingredient)
        .collect();
    Ok(Json(ingredients))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IngredientView>, ServerError> {
    let ingredient = state.engine.ingredient(id).await?;
    Ok(Json(map_ingredient(ingredient)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<IngredientNew>,
) -> Result<Json<IngredientView>, ServerError> {
    let ingredient = state.engine.update_ingredient(id, attrs(payload)).await?;
    Ok(Json(map_ingredient(ingredient)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_ingredient(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_stock(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockAdd>,
) -> Result<Json<IngredientView>, ServerError> {
    let ingredient = state.engine.accumulate_stock(id, payload.value).await?;
    Ok(Json(map_ingredient(ingredient)))
}
