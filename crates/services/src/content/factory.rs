use std::sync::Arc;

use config::{ApiConfig, CacheDurations};

use super::cache::QueryCache;
use super::language::{detect_language, Language};
use super::ports::{CmsClient, ContentError, Perspective, QueryOptions};
use super::sanity::SanityClient;
use super::service::ContentService;

/// Cookie that switches a visitor into draft preview
pub const PREVIEW_COOKIE: &str = "sanity-preview-perspective";

/// The parts of an HTTP request the content layer reads
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub path: String,
    /// Raw `Cookie` header
    pub cookie: Option<String>,
}

impl RequestContext {
    pub fn new(path: impl Into<String>, cookie: Option<String>) -> Self {
        Self {
            path: path.into(),
            cookie,
        }
    }

    pub fn preview_requested(&self) -> bool {
        self.cookie.as_deref().is_some_and(|header| {
            header
                .split(';')
                .filter_map(|pair| pair.split_once('='))
                .any(|(name, _)| name.trim() == PREVIEW_COOKIE)
        })
    }

    pub fn language(&self) -> Language {
        detect_language(&self.path)
    }
}

/// Process-wide owner of the CMS client and the shared query cache
pub struct ContentServiceFactory {
    client: Arc<dyn CmsClient>,
    cache: Arc<QueryCache>,
    durations: CacheDurations,
    read_token: Option<String>,
    visual_editing: bool,
}

impl ContentServiceFactory {
    pub fn new(
        client: Arc<dyn CmsClient>,
        cache: Arc<QueryCache>,
        durations: CacheDurations,
        read_token: Option<String>,
        visual_editing: bool,
    ) -> Self {
        Self {
            client,
            cache,
            durations,
            read_token,
            visual_editing,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ContentError> {
        let client = SanityClient::new(&config.sanity)?;
        Ok(Self::new(
            Arc::new(client),
            Arc::new(QueryCache::new()),
            config.cache.durations(),
            config.sanity.read_token.clone(),
            config.sanity.visual_editing,
        ))
    }

    pub fn cache(&self) -> Arc<QueryCache> {
        self.cache.clone()
    }

    /// Data service for one request.
    ///
    /// A preview cookie selects the drafts perspective, which never reads
    /// through the CDN. Without a read token drafts are unavailable and the
    /// request falls back to published content.
    pub fn for_request(&self, request: &RequestContext) -> ContentService {
        let perspective = if request.preview_requested() {
            if self.read_token.is_some() {
                Perspective::Drafts
            } else {
                tracing::warn!(
                    path = %request.path,
                    "Preview requested but no read token is configured, serving published content"
                );
                Perspective::Published
            }
        } else {
            Perspective::Published
        };

        let defaults = QueryOptions {
            perspective,
            use_cdn: perspective == Perspective::Published,
            token: self.read_token.clone(),
            stega: self.visual_editing,
        };

        ContentService::new(
            self.client.clone(),
            self.cache.clone(),
            self.durations.clone(),
            defaults,
            request.language(),
        )
    }
}
