use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use engine::{
    Engine,
    catalogs::{IngredientStates, IngredientTypes, MeasurementUnits},
};

use std::{sync::Arc, time::Instant};

use crate::{catalogs, inflows, ingredients};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Log method, path, status and latency of every request.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed = ?started.elapsed(),
        "request served"
    );
    response
}

pub fn router(state: ServerState) -> Router {
    let router = Router::new();
    let router = catalogs::routes::<MeasurementUnits>(router, "/measurements");
    let router = catalogs::routes::<IngredientStates>(router, "/ingredient-states");
    let router = catalogs::routes::<IngredientTypes>(router, "/ingredient-types");

    router
        .route(
            "/ingredients",
            post(ingredients::create).get(ingredients::list),
        )
        .route(
            "/ingredients/{id}",
            get(ingredients::get_one)
                .patch(ingredients::update)
                .delete(ingredients::delete),
        )
        .route("/ingredients/{id}/add-stock", post(ingredients::add_stock))
        .route(
            "/inflows",
            post(inflows::create)
                .get(inflows::list)
                .delete(inflows::delete_many),
        )
        .route(
            "/inflows/{id}",
            get(inflows::get_one).delete(inflows::delete),
        )
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}
