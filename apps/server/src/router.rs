use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::http::header::{CONTENT_TYPE, HeaderValue};
use axum::http::Method;
use cpark::kernel::prelude::ApiState;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
struct ApiDoc;

#[derive(Debug, Serialize)]
struct NotFoundBody {
    success: bool,
    message: &'static str,
}

#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    let api = ApiDoc::openapi();
    let cors = cors_layer(&state);

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(api)
        .merge(cpark::server::router::system_router())
        .merge(cpark::server::router::auth_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    // Create the Scalar UI routes
    let scalar_routes = Scalar::with_url("/api", api_doc);

    // Merge all routes and then apply the state to the final router
    let mut router = Router::new()
        .merge(openapi_routes)
        .merge(scalar_routes)
        .fallback(not_found_handler);

    if let Some(cors) = cors {
        router = router.layer(cors);
    }

    router
}

/// SPA origin allowlist; skipped (with a warning) when the configured origin
/// is not a valid header value.
fn cors_layer(state: &ApiState) -> Option<CorsLayer> {
    let origin = state.config.server.cors_origin.as_ref()?;

    match origin.parse::<HeaderValue>() {
        Ok(origin) => Some(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE]),
        ),
        Err(e) => {
            warn!(error = %e, %origin, "Invalid CORS origin in config; CORS layer disabled");
            None
        },
    }
}

#[allow(clippy::unused_async)]
async fn not_found_handler() -> (StatusCode, Json<NotFoundBody>) {
    (StatusCode::NOT_FOUND, Json(NotFoundBody { success: false, message: "Route not found" }))
}
