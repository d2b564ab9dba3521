//! HTTP surface. Handlers only translate between HTTP and the services.

mod auth;
mod properties;
mod tenants;
mod users;

use axum::{
    http::Method,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Lightweight health probe used by readiness checks.
async fn health() -> Json<serde_json::Value> {
    Json(json!({"status":"ok"}))
}

async fn welcome() -> Json<serde_json::Value> {
    Json(json!({"msg": "welcome to the property api"}))
}

pub(crate) fn parse_id(field: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::validation(field, format!("provide a valid {field}")))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::signup).patch(users::update_account))
        .route("/users/me", post(users::delete_account))
        .route("/auth", post(auth::login))
        .route("/auth/status", get(auth::status))
        .route("/auth/logout", post(auth::logout))
        .route("/properties", get(properties::list).post(properties::create))
        .route(
            "/properties/:id",
            patch(properties::update).delete(properties::delete),
        )
        .route("/tenants", post(tenants::create))
        .route(
            "/tenants/:id",
            get(tenants::list_for_property)
                .patch(tenants::update)
                .delete(tenants::delete),
        )
        .route("/tenants/single/:id", get(tenants::get_one))
}

pub fn router(state: AppState) -> Router {
    // Browser clients live on other origins during development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
