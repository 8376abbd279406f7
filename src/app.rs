use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config;
use crate::database::Store;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::messages::Message;
use crate::middleware::{envelope_rejections, require_auth, ui_redirect};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: impl Store + 'static) -> Self {
        Self { store: Arc::new(store) }
    }
}

pub fn app(state: AppState) -> Router {
    let settings = config::config();

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        .fallback(not_found)
        .with_state(state)
        // Global middleware
        .layer(from_fn(ui_redirect))
        .layer(from_fn(envelope_rejections))
        .layer(DefaultBodyLimit::max(settings.api.max_request_size_bytes));

    if settings.security.enable_cors {
        router = router.layer(cors_layer(&settings.security.cors_origins));
    }
    if settings.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn auth_public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(public::auth::register))
        .route("/api/auth/login", post(public::auth::login))
        .route("/api/auth/logout", post(public::auth::logout))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(protected::auth::me))
        .route(
            "/api/expenses",
            get(protected::expenses::list).post(protected::expenses::create),
        )
        .route("/api/expenses/:id", delete(protected::expenses::remove))
        .route(
            "/api/expense-categories",
            get(protected::categories::list).post(protected::categories::create),
        )
        .route("/api/expense-categories/:id", delete(protected::categories::remove))
        // route_layer so unknown paths still reach the fallback
        .route_layer(from_fn_with_state(state, require_auth))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "fintrack-api",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "auth": "/api/auth/register, /api/auth/login, /api/auth/logout (public), /api/auth/me (protected)",
                "expenses": "/api/expenses[/:id] (protected)",
                "categories": "/api/expense-categories[/:id] (protected)",
                "health": "/health (public)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> Response {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            ApiError::service_unavailable(Message::DatabaseUnavailable.text()).into_response()
        }
    }
}

async fn not_found() -> ApiError {
    ApiError::not_found(Message::NotFound.text())
}
