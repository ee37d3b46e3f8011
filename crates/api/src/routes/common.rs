use crate::models::ErrorResponse;
use axum::{http::StatusCode, response::Json as ResponseJson};
use services::content::ContentError;

pub type ApiError = (StatusCode, ResponseJson<ErrorResponse>);

/// Map content layer errors to HTTP status codes
pub fn map_content_error_to_status(error: &ContentError) -> StatusCode {
    match error {
        ContentError::InvalidParams(_) => StatusCode::BAD_REQUEST,
        ContentError::RequestFailed(_)
        | ContentError::ApiError { .. }
        | ContentError::ParseError(_) => StatusCode::BAD_GATEWAY,
        ContentError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub fn content_error(error: ContentError) -> ApiError {
    let status = map_content_error_to_status(&error);
    let error_type = match status {
        StatusCode::BAD_REQUEST => "invalid_request_error",
        StatusCode::SERVICE_UNAVAILABLE => "service_unavailable",
        _ => "upstream_error",
    };

    if status.is_server_error() {
        tracing::error!(error = %error, "Content request failed");
    } else {
        tracing::debug!(error = %error, "Rejected content request");
    }

    (
        status,
        ResponseJson(ErrorResponse::new(error.to_string(), error_type.to_string())),
    )
}

pub fn not_found(what: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        ResponseJson(ErrorResponse::new(
            format!("{what} not found"),
            "not_found".to_string(),
        )),
    )
}
