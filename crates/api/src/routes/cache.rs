use crate::middleware::ContentRequest;
use crate::models::{CacheClearResponse, CacheStatsResponse};
use axum::{response::Json as ResponseJson, Extension};

/// Cache introspection
///
/// Operational visibility only; the key format is not a stable contract.
#[utoipa::path(
    get,
    path = "/api/cache/stats",
    tag = "Cache",
    responses(
        (status = 200, description = "Current cache entries", body = CacheStatsResponse)
    )
)]
pub async fn cache_stats(
    Extension(content): Extension<ContentRequest>,
) -> ResponseJson<CacheStatsResponse> {
    let stats = content.0.cache_stats();
    ResponseJson(CacheStatsResponse {
        size: stats.size,
        keys: stats.keys,
    })
}

/// Drop every cached query result, e.g. after content is published
#[utoipa::path(
    post,
    path = "/api/cache/clear",
    tag = "Cache",
    responses(
        (status = 200, description = "Cache emptied", body = CacheClearResponse)
    )
)]
pub async fn clear_cache(
    Extension(content): Extension<ContentRequest>,
) -> ResponseJson<CacheClearResponse> {
    let cleared = content.0.cache_stats().size;
    content.0.clear_cache();
    ResponseJson(CacheClearResponse { cleared })
}
