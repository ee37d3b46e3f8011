use crate::models::*;
use crate::routes::health::HealthResponse;
use utoipa::OpenApi;

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Festival Content API",
        description = "Read access to the festival's bilingual CMS content.\n\n## Languages\n\nNorwegian is served at the paths below. Prefix any content path with `/en` for English, e.g. `/en/api/events`. Fields missing in the requested language fall back to the other language.\n\n## Preview\n\nA `sanity-preview-perspective` cookie switches the request to draft content when the server holds a read token.",
        version = "1.0.0",
        contact(
            name = "Festival Web Team",
            email = "festival-web@example.no"
        ),
        license(
            name = "MIT",
        )
    ),
    paths(
        crate::routes::health::health_check,
        // Pages
        crate::routes::content::get_homepage,
        crate::routes::content::get_page,
        crate::routes::content::get_program_page,
        crate::routes::content::get_artist_page,
        crate::routes::content::get_artist,
        // Events
        crate::routes::content::list_events,
        crate::routes::content::list_event_dates,
        crate::routes::content::get_event,
        // Articles
        crate::routes::content::list_articles,
        crate::routes::content::get_article,
        crate::routes::content::list_slugs,
        crate::routes::content::search,
        // Cache
        crate::routes::cache::cache_stats,
        crate::routes::cache::clear_cache,
    ),
    components(
        schemas(
            HealthResponse, ErrorResponse, ErrorDetail,
            DocumentResponse, ListResponse,
            EventListResponse, EventDate, EventDatesResponse,
            CacheStatsResponse, CacheClearResponse,
        ),
    )
    // No servers - let client determine the URL dynamically
)]
pub struct ApiDoc;
