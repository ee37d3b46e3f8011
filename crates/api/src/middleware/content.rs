use axum::{
    extract::{OriginalUri, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use services::content::{ContentService, ContentServiceFactory, RequestContext};
use std::sync::Arc;

/// Per-request content service handed to route handlers
#[derive(Clone)]
pub struct ContentRequest(pub Arc<ContentService>);

#[derive(Clone)]
pub struct ContentState {
    pub factory: Arc<ContentServiceFactory>,
}

/// Request context from the original path and all `Cookie` headers
pub fn request_context(request: &Request) -> RequestContext {
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let cookies: Vec<&str> = request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();
    let cookie = (!cookies.is_empty()).then(|| cookies.join("; "));

    RequestContext::new(path, cookie)
}

/// Builds the content service for this request: preview mode from the
/// cookie, language from the path.
pub async fn content_middleware(
    State(state): State<ContentState>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = request_context(&request);
    let service = state.factory.for_request(&context);

    tracing::debug!(
        path = %context.path,
        language = %service.language(),
        perspective = %service.options().perspective,
        "Content request"
    );

    request
        .extensions_mut()
        .insert(ContentRequest(Arc::new(service)));
    next.run(request).await
}
