pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod services;
pub mod validation;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use domain::RouteTable;
use services::RouteService;

// Application state
pub struct AppState {
    pub routes: RouteService,
}

// Public function to create the router
pub fn create_router(table: RouteTable) -> Router {
    let state = Arc::new(AppState {
        routes: RouteService::new(table),
    });

    Router::new()
        // Ad-hoc templates
        .route("/expand", post(handlers::templates::expand))
        .route("/extract", post(handlers::templates::extract))

        // Configured routes
        .route("/routes", get(handlers::routes::list_routes))
        .route("/routes/{name}/expand", post(handlers::routes::build))
        .route("/resolve", get(handlers::routes::resolve))

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
