use crate::middleware::ContentRequest;
use crate::models::{
    DocumentResponse, ErrorResponse, EventDate, EventDatesResponse, EventFilterQuery,
    EventListResponse, ListResponse, SearchQuery,
};
use crate::routes::common::{content_error, not_found, ApiError};
use axum::{
    extract::{OriginalUri, Path, Query},
    response::Json as ResponseJson,
    Extension,
};
use chrono::NaiveDate;
use serde_json::Value;
use services::content::{format_event_date, localized_path, ContentError, DocumentType};
use tracing::debug;

fn document_response(
    content: &ContentRequest,
    uri: &OriginalUri,
    document: Option<Value>,
    what: &str,
) -> Result<ResponseJson<DocumentResponse>, ApiError> {
    let document = document.ok_or_else(|| not_found(what))?;
    let language = content.0.language();

    Ok(ResponseJson(DocumentResponse {
        document,
        language: language.code().to_string(),
        alternate_path: localized_path(uri.0.path(), language.other()),
    }))
}

/// Homepage
///
/// The scheduled homepage whose window contains the current time, otherwise
/// the default homepage.
#[utoipa::path(
    get,
    path = "/api/homepage",
    tag = "Content",
    responses(
        (status = 200, description = "Resolved homepage", body = DocumentResponse),
        (status = 404, description = "No homepage published", body = ErrorResponse),
        (status = 502, description = "CMS request failed", body = ErrorResponse)
    )
)]
pub async fn get_homepage(
    Extension(content): Extension<ContentRequest>,
    uri: OriginalUri,
) -> Result<ResponseJson<DocumentResponse>, ApiError> {
    let homepage = content.0.get_homepage().await.map_err(content_error)?;
    document_response(&content, &uri, homepage, "Homepage")
}

#[utoipa::path(
    get,
    path = "/api/pages/{slug}",
    tag = "Content",
    params(("slug" = String, Path, description = "Page slug in either language")),
    responses(
        (status = 200, description = "Resolved page", body = DocumentResponse),
        (status = 404, description = "Page not found", body = ErrorResponse),
        (status = 502, description = "CMS request failed", body = ErrorResponse)
    )
)]
pub async fn get_page(
    Extension(content): Extension<ContentRequest>,
    uri: OriginalUri,
    Path(slug): Path<String>,
) -> Result<ResponseJson<DocumentResponse>, ApiError> {
    debug!("Page request for slug: {}", slug);
    let page = content
        .0
        .get_page_by_slug(&slug)
        .await
        .map_err(content_error)?;
    document_response(&content, &uri, page, "Page")
}

#[utoipa::path(
    get,
    path = "/api/program",
    tag = "Content",
    responses(
        (status = 200, description = "Program page with its events", body = DocumentResponse),
        (status = 404, description = "Program page not found", body = ErrorResponse)
    )
)]
pub async fn get_program_page(
    Extension(content): Extension<ContentRequest>,
    uri: OriginalUri,
) -> Result<ResponseJson<DocumentResponse>, ApiError> {
    let page = content.0.get_program_page().await.map_err(content_error)?;
    document_response(&content, &uri, page, "Program page")
}

#[utoipa::path(
    get,
    path = "/api/artists",
    tag = "Content",
    responses(
        (status = 200, description = "Artist page with its artists", body = DocumentResponse),
        (status = 404, description = "Artist page not found", body = ErrorResponse)
    )
)]
pub async fn get_artist_page(
    Extension(content): Extension<ContentRequest>,
    uri: OriginalUri,
) -> Result<ResponseJson<DocumentResponse>, ApiError> {
    let page = content.0.get_artist_page().await.map_err(content_error)?;
    document_response(&content, &uri, page, "Artist page")
}

#[utoipa::path(
    get,
    path = "/api/artists/{slug}",
    tag = "Content",
    params(("slug" = String, Path, description = "Artist slug in either language")),
    responses(
        (status = 200, description = "Resolved artist", body = DocumentResponse),
        (status = 404, description = "Artist not found", body = ErrorResponse)
    )
)]
pub async fn get_artist(
    Extension(content): Extension<ContentRequest>,
    uri: OriginalUri,
    Path(slug): Path<String>,
) -> Result<ResponseJson<DocumentResponse>, ApiError> {
    let artist = content
        .0
        .get_artist_by_slug(&slug)
        .await
        .map_err(content_error)?;
    document_response(&content, &uri, artist, "Artist")
}

/// Event filter
///
/// All published events, or only those on `date`. Events are ordered by
/// date, then start time.
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    params(EventFilterQuery),
    responses(
        (status = 200, description = "Matching events", body = EventListResponse),
        (status = 400, description = "Invalid date", body = ErrorResponse),
        (status = 502, description = "CMS request failed", body = ErrorResponse)
    )
)]
pub async fn list_events(
    Extension(content): Extension<ContentRequest>,
    Query(query): Query<EventFilterQuery>,
) -> Result<ResponseJson<EventListResponse>, ApiError> {
    let service = &content.0;

    let response = match query.date.filter(|d| !d.is_empty()) {
        Some(date) => {
            let events = service
                .get_events_by_date(&date)
                .await
                .map_err(content_error)?;
            let formatted_date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .ok()
                .map(|parsed| format_event_date(parsed, service.language()));
            EventListResponse {
                events,
                date: Some(date),
                formatted_date,
            }
        }
        None => EventListResponse {
            events: service.get_published_events().await.map_err(content_error)?,
            date: None,
            formatted_date: None,
        },
    };

    Ok(ResponseJson(response))
}

#[utoipa::path(
    get,
    path = "/api/events/dates",
    tag = "Events",
    responses(
        (status = 200, description = "Distinct event dates with labels", body = EventDatesResponse)
    )
)]
pub async fn list_event_dates(
    Extension(content): Extension<ContentRequest>,
) -> Result<ResponseJson<EventDatesResponse>, ApiError> {
    let language = content.0.language();
    let dates = content.0.get_event_dates().await.map_err(content_error)?;

    let dates = dates
        .into_iter()
        .map(|date| {
            let label = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map(|parsed| format_event_date(parsed, language))
                .unwrap_or_else(|_| date.clone());
            EventDate { date, label }
        })
        .collect();

    Ok(ResponseJson(EventDatesResponse { dates }))
}

#[utoipa::path(
    get,
    path = "/api/events/{slug}",
    tag = "Events",
    params(("slug" = String, Path, description = "Event slug in either language")),
    responses(
        (status = 200, description = "Resolved event", body = DocumentResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    )
)]
pub async fn get_event(
    Extension(content): Extension<ContentRequest>,
    uri: OriginalUri,
    Path(slug): Path<String>,
) -> Result<ResponseJson<DocumentResponse>, ApiError> {
    let event = content
        .0
        .get_event_by_slug(&slug)
        .await
        .map_err(content_error)?;
    document_response(&content, &uri, event, "Event")
}

#[utoipa::path(
    get,
    path = "/api/articles",
    tag = "Articles",
    responses(
        (status = 200, description = "Published articles, newest first", body = ListResponse)
    )
)]
pub async fn list_articles(
    Extension(content): Extension<ContentRequest>,
) -> Result<ResponseJson<ListResponse>, ApiError> {
    let articles = content
        .0
        .get_published_articles()
        .await
        .map_err(content_error)?;
    Ok(ResponseJson(ListResponse::new(articles)))
}

#[utoipa::path(
    get,
    path = "/api/articles/{slug}",
    tag = "Articles",
    params(("slug" = String, Path, description = "Article slug in either language")),
    responses(
        (status = 200, description = "Resolved article", body = DocumentResponse),
        (status = 404, description = "Article not found", body = ErrorResponse)
    )
)]
pub async fn get_article(
    Extension(content): Extension<ContentRequest>,
    uri: OriginalUri,
    Path(slug): Path<String>,
) -> Result<ResponseJson<DocumentResponse>, ApiError> {
    let article = content
        .0
        .get_article_by_slug(&slug)
        .await
        .map_err(content_error)?;
    document_response(&content, &uri, article, "Article")
}

/// Slugs of a document type
///
/// Raw slug variants for static path generation.
#[utoipa::path(
    get,
    path = "/api/slugs/{doc_type}",
    tag = "Content",
    params(("doc_type" = String, Path, description = "page, event, artist or article")),
    responses(
        (status = 200, description = "Slug variants", body = ListResponse),
        (status = 400, description = "Unknown document type", body = ErrorResponse)
    )
)]
pub async fn list_slugs(
    Extension(content): Extension<ContentRequest>,
    Path(doc_type): Path<String>,
) -> Result<ResponseJson<ListResponse>, ApiError> {
    let doc_type: DocumentType = doc_type.parse().map_err(content_error)?;
    let slugs = content
        .0
        .get_slugs_for_type(doc_type)
        .await
        .map_err(content_error)?;
    Ok(ResponseJson(ListResponse::new(slugs)))
}

#[utoipa::path(
    get,
    path = "/api/search",
    tag = "Content",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching documents", body = ListResponse),
        (status = 400, description = "Empty search term", body = ErrorResponse)
    )
)]
pub async fn search(
    Extension(content): Extension<ContentRequest>,
    Query(query): Query<SearchQuery>,
) -> Result<ResponseJson<ListResponse>, ApiError> {
    debug!("Search request: q={}, limit={}", query.q, query.limit);
    let results = content
        .0
        .search(&query.q, query.limit)
        .await
        .map_err(|e| match e {
            ContentError::InvalidParams(message) => (
                axum::http::StatusCode::BAD_REQUEST,
                ResponseJson(ErrorResponse::with_param(
                    message,
                    "invalid_request_error".to_string(),
                    "q".to_string(),
                )),
            ),
            other => content_error(other),
        })?;
    Ok(ResponseJson(ListResponse::new(results)))
}
