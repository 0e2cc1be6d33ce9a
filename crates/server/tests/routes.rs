use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    router(ServerState {
        engine: Arc::new(engine),
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Create one entry per catalog and return their ids (unit, state, type).
async fn seed_catalogs(app: &Router, precision: i32) -> (String, String, String) {
    let (status, unit) = send(
        app,
        "POST",
        "/measurements",
        Some(json!({ "name": "Kilogram", "precision": precision, "abbreviation": "kg" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, state) = send(
        app,
        "POST",
        "/ingredient-states",
        Some(json!({ "name": "Dry" })),
    )
    .await;
    let (_, kind) = send(
        app,
        "POST",
        "/ingredient-types",
        Some(json!({ "name": "Cereal" })),
    )
    .await;

    (
        unit["id"].as_str().unwrap().to_string(),
        state["id"].as_str().unwrap().to_string(),
        kind["id"].as_str().unwrap().to_string(),
    )
}

async fn create_ingredient(app: &Router, name: &str, refs: &(String, String, String)) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/ingredients",
        Some(json!({
            "name": name,
            "measurement_unit_id": refs.0,
            "ingredient_state_id": refs.1,
            "ingredient_type_id": refs.2,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn flour_end_to_end() {
    let app = app().await;
    let refs = seed_catalogs(&app, 2).await;

    let flour = create_ingredient(&app, "Flour", &refs).await;
    assert_eq!(flour["current_stock"], json!(0.0));
    assert_eq!(flour["measurement_unit"]["ingredients_assigned"], json!(1));

    let (status, inflow) = send(
        &app,
        "POST",
        "/inflows",
        Some(json!({
            "ingredient_id": flour["id"],
            "date": "2024-03-01",
            "reason": "PURCHASE",
            "price": 1.99,
            "quantity": 2.345,
            "additional_details": null,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(inflow["quantity"], json!(2.35));

    let uri = format!("/ingredients/{}", flour["id"].as_str().unwrap());
    let (status, flour) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(flour["current_stock"], json!(2.35));
}

#[tokio::test]
async fn catalog_lifecycle() {
    let app = app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/ingredient-types",
        Some(json!({ "name": "Spice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["ingredients_assigned"], json!(0));
    let uri = format!("/ingredient-types/{}", created["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        "POST",
        "/ingredient-types",
        Some(json!({ "name": "Spice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, updated) = send(&app, "PATCH", &uri, Some(json!({ "name": "Spices" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], json!("Spices"));

    let (status, listed) = send(&app, "GET", "/ingredient-types", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn assigned_catalog_entry_cannot_be_deleted() {
    let app = app().await;
    let refs = seed_catalogs(&app, 2).await;
    create_ingredient(&app, "Flour", &refs).await;

    let uri = format!("/measurements/{}", refs.0);
    let (status, body) = send(&app, "DELETE", &uri, None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("there are 1 ingredients which still use this measurement unit")
    );
}

#[tokio::test]
async fn assign_to_ingredient_moves_the_counter() {
    let app = app().await;
    let refs = seed_catalogs(&app, 2).await;
    let flour = create_ingredient(&app, "Flour", &refs).await;
    let (_, frozen) = send(
        &app,
        "POST",
        "/ingredient-states",
        Some(json!({ "name": "Frozen" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/ingredient-states/assign-to-ingredient",
        Some(json!({
            "ingredient_state_id": frozen["id"],
            "ingredient_ids": [flour["id"]],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reassigned"], json!(1));

    let uri = format!("/ingredient-states/{}", refs.1);
    let (_, dry) = send(&app, "GET", &uri, None).await;
    assert_eq!(dry["ingredients_assigned"], json!(0));
}

#[tokio::test]
async fn assign_requires_ingredient_ids() {
    let app = app().await;
    let refs = seed_catalogs(&app, 2).await;

    let (status, body) = send(
        &app,
        "POST",
        "/measurements/assign-to-ingredient",
        Some(json!({ "target_id": refs.0, "ingredient_ids": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn ingredients_filtered_by_ids() {
    let app = app().await;
    let refs = seed_catalogs(&app, 2).await;
    let flour = create_ingredient(&app, "Flour", &refs).await;
    create_ingredient(&app, "Rice", &refs).await;
    let sugar = create_ingredient(&app, "Sugar", &refs).await;

    let uri = format!(
        "/ingredients?ids={}&ids={}",
        flour["id"].as_str().unwrap(),
        sugar["id"].as_str().unwrap()
    );
    let (status, body) = send(&app, "GET", &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Flour", "Sugar"]);

    let (_, all) = send(&app, "GET", "/ingredients", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn add_stock_rounds_to_unit_precision() {
    let app = app().await;
    let refs = seed_catalogs(&app, 1).await;
    let milk = create_ingredient(&app, "Milk", &refs).await;

    let uri = format!("/ingredients/{}/add-stock", milk["id"].as_str().unwrap());
    let (status, body) = send(&app, "POST", &uri, Some(json!({ "value": 5.46 }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_stock"], json!(5.5));
}

#[tokio::test]
async fn bulk_inflow_delete_needs_a_filter() {
    let app = app().await;

    let (status, body) = send(&app, "DELETE", "/inflows", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("there must be at least one filter applied")
    );
}

#[tokio::test]
async fn bulk_inflow_delete_by_ingredient() {
    let app = app().await;
    let refs = seed_catalogs(&app, 2).await;
    let flour = create_ingredient(&app, "Flour", &refs).await;
    for quantity in [1.0, 2.0] {
        let (status, _) = send(
            &app,
            "POST",
            "/inflows",
            Some(json!({
                "ingredient_id": flour["id"],
                "date": "2024-03-02",
                "reason": "DONATION",
                "price": 0.0,
                "quantity": quantity,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let uri = format!("/inflows?ingredient_id={}", flour["id"].as_str().unwrap());
    let (status, body) = send(&app, "DELETE", &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], json!(2));
    let (_, inflows) = send(&app, "GET", "/inflows", None).await;
    assert_eq!(inflows, json!([]));
}

#[tokio::test]
async fn deleting_an_inflow_reverts_stock() {
    let app = app().await;
    let refs = seed_catalogs(&app, 2).await;
    let flour = create_ingredient(&app, "Flour", &refs).await;
    let (_, inflow) = send(
        &app,
        "POST",
        "/inflows",
        Some(json!({
            "ingredient_id": flour["id"],
            "date": "2024-03-02",
            "reason": "PURCHASE",
            "price": 4.5,
            "quantity": 3.0,
        })),
    )
    .await;

    let uri = format!("/inflows/{}", inflow["id"].as_str().unwrap());
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/ingredients/{}", flour["id"].as_str().unwrap());
    let (_, flour) = send(&app, "GET", &uri, None).await;
    assert_eq!(flour["current_stock"], json!(0.0));
}

#[tokio::test]
async fn invalid_precision_is_unprocessable() {
    let app = app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/measurements",
        Some(json!({ "name": "Gram", "precision": 40, "abbreviation": "g" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_ingredient_is_not_found() {
    let app = app().await;

    let (status, _) = send(
        &app,
        "GET",
        "/ingredients/7d3f8f8e-2f7c-4c55-9a57-3e8e4c1c6f10",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
