pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;

use crate::{
    middleware::{content_middleware, ContentState},
    openapi::ApiDoc,
    routes::{cache, content, health::health_check},
};
use axum::{
    http::{header, Method},
    middleware::from_fn_with_state,
    response::Html,
    routing::{get, post},
    Router,
};
use services::content::ContentServiceFactory;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

/// Build the complete application router
///
/// Every content route is served twice: at its Norwegian path and again
/// under `/en`. The language is detected from the original request path.
pub fn build_app(factory: Arc<ContentServiceFactory>) -> Router {
    let content_routes = build_content_routes(factory);

    Router::new()
        .route("/health", get(health_check))
        .merge(content_routes.clone())
        .nest("/en", content_routes)
        .merge(build_openapi_routes())
        .layer(build_cors_layer())
}

/// Content and cache routes, each request getting its own content service
pub fn build_content_routes(factory: Arc<ContentServiceFactory>) -> Router {
    let state = ContentState { factory };

    Router::new()
        .route("/api/homepage", get(content::get_homepage))
        .route("/api/pages/{slug}", get(content::get_page))
        .route("/api/program", get(content::get_program_page))
        .route("/api/artists", get(content::get_artist_page))
        .route("/api/artists/{slug}", get(content::get_artist))
        .route("/api/events", get(content::list_events))
        .route("/api/events/dates", get(content::list_event_dates))
        .route("/api/events/{slug}", get(content::get_event))
        .route("/api/articles", get(content::list_articles))
        .route("/api/articles/{slug}", get(content::get_article))
        .route("/api/slugs/{doc_type}", get(content::list_slugs))
        .route("/api/search", get(content::search))
        .route("/api/cache/stats", get(cache::cache_stats))
        .route("/api/cache/clear", post(cache::clear_cache))
        .layer(from_fn_with_state(state, content_middleware))
}

/// Read-only API consumed by the festival frontend from any origin
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Build OpenAPI documentation routes
pub fn build_openapi_routes() -> Router {
    Router::new().route("/docs", get(swagger_ui_handler)).route(
        "/api-docs/openapi.json",
        get(|| async { axum::Json(ApiDoc::openapi()) }),
    )
}

/// Serve Swagger UI HTML page
async fn swagger_ui_handler() -> Html<String> {
    Html(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Festival Content API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5.10.5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.10.5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5.10.5/swagger-ui-standalone-preset.js"></script>
    <script>
    window.onload = function() {
        SwaggerUIBundle({
            url: '/api-docs/openapi.json',
            dom_id: '#swagger-ui',
            deepLinking: true,
            presets: [
                SwaggerUIBundle.presets.apis,
                SwaggerUIStandalonePreset
            ],
            layout: "StandaloneLayout",
            docExpansion: 'list'
        });
    };
    </script>
</body>
</html>"#.to_string())
}
