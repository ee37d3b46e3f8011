#![allow(dead_code)]

use api::build_app;
use async_trait::async_trait;
use config::CacheDurations;
use serde_json::{json, Value};
use services::content::{
    CmsClient, ContentError, ContentServiceFactory, QueryCache, QueryOptions,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub const PREVIEW_COOKIE_HEADER: &str = "sanity-preview-perspective=drafts";

/// One recorded CMS call
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub query: String,
    pub params: BTreeMap<String, Value>,
    pub options: QueryOptions,
}

/// In-memory CMS holding a small festival dataset.
///
/// Documents are returned with their raw `_no`/`_en` fields so the
/// client-side language resolution is exercised end to end.
#[derive(Default)]
pub struct FestivalCms {
    calls: Mutex<Vec<RecordedQuery>>,
    failing: bool,
}

impl FestivalCms {
    pub fn new() -> Self {
        Self::default()
    }

    /// A CMS whose every request fails upstream
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RecordedQuery> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(query: &str, params: &BTreeMap<String, Value>) -> Value {
        if query.starts_with("array::unique") {
            return json!(["2024-06-16", "2024-06-15"]);
        }
        if query.contains("homePageType == \"default\"") {
            return json!({
                "_id": "home-default",
                "title_no": "Velkommen",
                "title_en": "Welcome"
            });
        }
        if query.contains("homePageType == \"scheduled\"") {
            return Value::Null;
        }
        if let Some(doc_type) = params.get("type") {
            return json!([{
                "_id": format!("{}-1", doc_type.as_str().unwrap_or_default()),
                "slug_no": "jazzkveld",
                "slug_en": "jazz-night",
                "slug": null
            }]);
        }
        if query.starts_with("*[_type == \"event\"") {
            if let Some(slug) = params.get("slug") {
                return match slug.as_str() {
                    Some("jazzkveld") | Some("jazz-night") => jazz_night(),
                    _ => Value::Null,
                };
            }
            if params.contains_key("date") {
                return json!([
                    {
                        "_id": "late",
                        "title_no": "Sen konsert",
                        "eventDate": "2024-06-15",
                        "startTime": "22:00"
                    },
                    {
                        "_id": "early",
                        "title_no": "Tidlig konsert",
                        "eventDate": "2024-06-15",
                        "startTime": "18:00"
                    }
                ]);
            }
            return json!([jazz_night()]);
        }
        if query.starts_with("*[_type == \"article\"") && !params.contains_key("slug") {
            return json!([
                {"_id": "a1", "title_no": "Nyhet", "title_en": "News"}
            ]);
        }
        Value::Null
    }
}

pub fn jazz_night() -> Value {
    json!({
        "_id": "event-jazz",
        "_type": "event",
        "title_no": "Jazzkveld",
        "title_en": "Jazz Night",
        "slug_no": {"current": "jazzkveld"},
        "slug_en": {"current": "jazz-night"},
        "eventDate": "2024-06-15",
        "startTime": "20:00"
    })
}

#[async_trait]
impl CmsClient for FestivalCms {
    async fn fetch(
        &self,
        query: &str,
        params: &BTreeMap<String, Value>,
        options: &QueryOptions,
    ) -> Result<Value, ContentError> {
        self.calls.lock().unwrap().push(RecordedQuery {
            query: query.to_string(),
            params: params.clone(),
            options: options.clone(),
        });

        if self.failing {
            return Err(ContentError::ApiError {
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(Self::answer(query, params))
    }
}

pub fn factory_with(
    cms: Arc<FestivalCms>,
    read_token: Option<&str>,
) -> Arc<ContentServiceFactory> {
    Arc::new(ContentServiceFactory::new(
        cms,
        Arc::new(QueryCache::new()),
        CacheDurations::production(),
        read_token.map(str::to_string),
        false,
    ))
}

pub fn setup_test_server_with(
    cms: Arc<FestivalCms>,
    read_token: Option<&str>,
) -> axum_test::TestServer {
    let app = build_app(factory_with(cms, read_token));
    axum_test::TestServer::new(app).unwrap()
}

pub fn setup_test_server() -> (axum_test::TestServer, Arc<FestivalCms>) {
    let cms = Arc::new(FestivalCms::new());
    (setup_test_server_with(cms.clone(), None), cms)
}
