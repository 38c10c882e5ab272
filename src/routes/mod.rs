//! Rutas HTTP
//!
//! Todas las rutas cuelgan de `/api`.

pub mod booking_routes;
pub mod vehicle_routes;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use crate::state::AppState;

/// Crear el router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    let cors = if state.config.cors_is_permissive() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(state.config.cors_origins.clone())
    };

    let api = Router::new()
        .route("/ping", get(ping))
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/bookings", booking_routes::create_booking_router());

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check
async fn ping(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "message": state.config.ping_message }))
}
