use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
    pub param: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: String, error_type: String) -> Self {
        Self {
            error: ErrorDetail {
                message,
                r#type: error_type,
                param: None,
            },
        }
    }

    pub fn with_param(message: String, error_type: String, param: String) -> Self {
        Self {
            error: ErrorDetail {
                message,
                r#type: error_type,
                param: Some(param),
            },
        }
    }
}

/// A single resolved document plus the path of the same page in the other language
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    #[schema(value_type = Object)]
    pub document: Value,
    /// `no` or `en`
    pub language: String,
    pub alternate_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListResponse {
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<Value>,
    pub total: usize,
}

impl ListResponse {
    pub fn new(items: Vec<Value>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

/// Events for the program filter
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    #[schema(value_type = Vec<Object>)]
    pub events: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Localized display form of `date`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventDate {
    /// `YYYY-MM-DD`
    pub date: String,
    /// Localized display label
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventDatesResponse {
    pub dates: Vec<EventDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CacheStatsResponse {
    pub size: usize,
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CacheClearResponse {
    pub cleared: usize,
}

/// Query parameters for the event filter
#[derive(Debug, Deserialize, IntoParams)]
pub struct EventFilterQuery {
    /// Only events on this date (`YYYY-MM-DD`)
    pub date: Option<String>,
}

/// Query parameters for search
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Search term; missing and blank terms are rejected with 400
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize {
    20
}
