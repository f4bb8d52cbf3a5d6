use crate::api::handlers::{auth, protected, users};
use crate::api::ApiDoc;
use crate::auth::middleware::{require_basic, require_bearer};
use crate::auth::strategy::Authenticator;
use crate::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub fn create_router(authenticator: Arc<Authenticator>) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/openapi.json", get(openapi_json));

    let basic_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route_layer(middleware::from_fn_with_state(
            authenticator.clone(),
            require_basic,
        ));

    let bearer_routes = Router::new()
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/protected", get(protected::protected_data))
        .route_layer(middleware::from_fn_with_state(authenticator, require_bearer));

    public_routes.merge(basic_routes).merge(bearer_routes)
}

/// Full application: `/api` routes, catch-all, CORS and request tracing.
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(state.config.server.client_origin.as_deref());

    Router::new()
        .nest("/api", create_router(state.authenticator.clone()))
        .fallback(protected::fallback)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(client_origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match client_origin.and_then(|origin| HeaderValue::from_str(origin).ok()) {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
