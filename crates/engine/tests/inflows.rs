use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{
    CatalogEntryAttrs, Engine, EngineError, Ingredient, InflowAttrs, InflowFilter, InflowReason,
    IngredientAttrs, MeasurementUnitAttrs,
    catalogs::{IngredientStates, IngredientTypes, MeasurementUnits},
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// Create an ingredient stocked in a unit with the given precision.
async fn ingredient(engine: &Engine, name: &str, precision: i32) -> Ingredient {
    let unit = engine
        .create_catalog_entry::<MeasurementUnits>(MeasurementUnitAttrs {
            name: format!("{name} unit"),
            precision,
            abbreviation: "u".to_string(),
        })
        .await
        .unwrap();
    let state = engine
        .create_catalog_entry::<IngredientStates>(CatalogEntryAttrs::new(format!("{name} state")))
        .await
        .unwrap();
    let kind = engine
        .create_catalog_entry::<IngredientTypes>(CatalogEntryAttrs::new(format!("{name} type")))
        .await
        .unwrap();

    engine
        .create_ingredient(IngredientAttrs {
            name: name.to_string(),
            measurement_unit_id: unit.id,
            ingredient_state_id: state.id,
            ingredient_type_id: kind.id,
        })
        .await
        .unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn purchase(ingredient_id: Uuid, quantity: f64, date: NaiveDate) -> InflowAttrs {
    InflowAttrs {
        ingredient_id,
        date,
        reason: InflowReason::Purchase,
        price: 3.2,
        quantity,
        additional_details: None,
    }
}

#[tokio::test]
async fn recording_an_inflow_rounds_ledger_and_stock_alike() {
    let (engine, _db) = engine_with_db().await;
    let flour = ingredient(&engine, "Flour", 2).await;

    let inflow = engine
        .record_inflow(purchase(flour.id, 2.345, day(1)))
        .await
        .unwrap();

    assert_eq!(inflow.quantity, 2.35);
    assert_eq!(engine.inflow(inflow.id).await.unwrap(), inflow);
    let flour = engine.ingredient(flour.id).await.unwrap();
    assert_eq!(flour.current_stock, 2.35);
}

#[tokio::test]
async fn inflows_accumulate_into_stock() {
    let (engine, _db) = engine_with_db().await;
    let milk = ingredient(&engine, "Milk", 1).await;

    engine
        .record_inflow(purchase(milk.id, 5.46, day(1)))
        .await
        .unwrap();
    engine
        .record_inflow(purchase(milk.id, 1.25, day(2)))
        .await
        .unwrap();

    // 5.5 + 1.3
    let milk = engine.ingredient(milk.id).await.unwrap();
    assert_eq!(milk.current_stock, 5.5 + 1.3);
}

#[tokio::test]
async fn deleting_an_inflow_takes_its_quantity_back() {
    let (engine, _db) = engine_with_db().await;
    let flour = ingredient(&engine, "Flour", 2).await;
    let inflow = engine
        .record_inflow(purchase(flour.id, 2.345, day(1)))
        .await
        .unwrap();

    engine.delete_inflow(inflow.id).await.unwrap();

    assert_eq!(engine.ingredient(flour.id).await.unwrap().current_stock, 0.0);
    assert_eq!(
        engine.inflow(inflow.id).await,
        Err(EngineError::KeyNotFound(format!("inflow {}", inflow.id)))
    );
}

#[tokio::test]
async fn inflows_are_listed_most_recent_first() {
    let (engine, _db) = engine_with_db().await;
    let flour = ingredient(&engine, "Flour", 2).await;
    for d in [3, 1, 7] {
        engine
            .record_inflow(purchase(flour.id, 1.0, day(d)))
            .await
            .unwrap();
    }

    let dates: Vec<_> = engine
        .inflows()
        .await
        .unwrap()
        .into_iter()
        .map(|inflow| inflow.date)
        .collect();

    assert_eq!(dates, vec![day(7), day(3), day(1)]);
}

#[tokio::test]
async fn bulk_delete_requires_a_filter() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .delete_inflows(InflowFilter::default())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::MissingFilter("there must be at least one filter applied".to_string())
    );
}

#[tokio::test]
async fn bulk_delete_purges_only_the_ledger() {
    let (engine, _db) = engine_with_db().await;
    let flour = ingredient(&engine, "Flour", 2).await;
    let rice = ingredient(&engine, "Rice", 0).await;
    engine
        .record_inflow(purchase(flour.id, 1.5, day(1)))
        .await
        .unwrap();
    engine
        .record_inflow(purchase(flour.id, 2.0, day(2)))
        .await
        .unwrap();
    let kept = engine
        .record_inflow(purchase(rice.id, 4.0, day(2)))
        .await
        .unwrap();

    let removed = engine
        .delete_inflows(InflowFilter {
            ingredient_id: Some(flour.id),
        })
        .await
        .unwrap();

    assert_eq!(removed, 2);
    assert_eq!(engine.inflows().await.unwrap(), vec![kept]);
    assert_eq!(engine.ingredient(flour.id).await.unwrap().current_stock, 3.5);
}

#[tokio::test]
async fn deleting_an_ingredient_purges_its_inflows() {
    let (engine, _db) = engine_with_db().await;
    let flour = ingredient(&engine, "Flour", 2).await;
    engine
        .record_inflow(purchase(flour.id, 1.0, day(1)))
        .await
        .unwrap();

    engine.delete_ingredient(flour.id).await.unwrap();

    assert_eq!(engine.inflows().await.unwrap(), vec![]);
    let unit = engine
        .catalog_entry::<MeasurementUnits>(flour.measurement_unit.id)
        .await
        .unwrap();
    assert_eq!(unit.ingredients_assigned, 0);
}

#[tokio::test]
async fn inflow_for_unknown_ingredient_is_not_recorded() {
    let (engine, _db) = engine_with_db().await;
    let missing = Uuid::new_v4();

    let err = engine
        .record_inflow(purchase(missing, 1.0, day(1)))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::KeyNotFound(format!("ingredient {missing}")));
    assert_eq!(engine.inflows().await.unwrap(), vec![]);
}

#[tokio::test]
async fn non_finite_quantities_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let flour = ingredient(&engine, "Flour", 2).await;

    let err = engine
        .record_inflow(purchase(flour.id, f64::NAN, day(1)))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn blank_details_are_stored_as_none() {
    let (engine, _db) = engine_with_db().await;
    let flour = ingredient(&engine, "Flour", 2).await;

    let inflow = engine
        .record_inflow(InflowAttrs {
            reason: InflowReason::Donation,
            additional_details: Some("   ".to_string()),
            ..purchase(flour.id, 1.0, day(1))
        })
        .await
        .unwrap();

    assert_eq!(inflow.additional_details, None);
    assert_eq!(inflow.reason, InflowReason::Donation);
}

#[tokio::test]
async fn huge_quantities_are_stored_unrounded_but_finite() {
    let (engine, _db) = engine_with_db().await;
    let saffron = ingredient(&engine, "Saffron", 15).await;

    let inflow = engine
        .record_inflow(purchase(saffron.id, 1e300, day(1)))
        .await
        .unwrap();

    assert_eq!(inflow.quantity, 1e300);
    let saffron = engine.ingredient(saffron.id).await.unwrap();
    assert_eq!(saffron.current_stock, 1e300);
}

#[tokio::test]
async fn stock_overflow_is_rejected_and_rolled_back() {
    let (engine, _db) = engine_with_db().await;
    let salt = ingredient(&engine, "Salt", 2).await;

    let first = engine.accumulate_stock(salt.id, 1.7e308).await.unwrap();
    assert_eq!(first.current_stock, 1.7e308);

    let err = engine.accumulate_stock(salt.id, 1.7e308).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .record_inflow(purchase(salt.id, 1.7e308, day(2)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    assert!(engine.inflows().await.unwrap().is_empty());
    let salt = engine.ingredient(salt.id).await.unwrap();
    assert_eq!(salt.current_stock, 1.7e308);
}
