use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use config::CacheDurations;
use serde_json::Value;

use super::cache::{CacheStats, QueryCache};
use super::homepage::active_schedule;
use super::keys::cache_key;
use super::language::{transform_result, Language};
use super::ports::{CmsClient, ContentError, QueryOptions, QueryOverrides};
use super::queries::{self, DocumentType, QueryDefinition};

/// Content data service for one request context.
///
/// The only component that talks to the CMS. Results are transformed to the
/// bound language and memoized in the shared [`QueryCache`].
pub struct ContentService {
    client: Arc<dyn CmsClient>,
    cache: Arc<QueryCache>,
    durations: CacheDurations,
    defaults: QueryOptions,
    language: Language,
}

fn into_document(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        document => Some(document),
    }
}

fn into_list(value: Value) -> Result<Vec<Value>, ContentError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(ContentError::ParseError(format!(
            "Expected a list, got {other}"
        ))),
    }
}

impl ContentService {
    pub fn new(
        client: Arc<dyn CmsClient>,
        cache: Arc<QueryCache>,
        durations: CacheDurations,
        defaults: QueryOptions,
        language: Language,
    ) -> Self {
        Self {
            client,
            cache,
            durations,
            defaults,
            language,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn options(&self) -> &QueryOptions {
        &self.defaults
    }

    /// Run a query through the cache.
    ///
    /// Upstream errors are returned as is and nothing is cached for them.
    pub async fn fetch(
        &self,
        definition: &QueryDefinition,
        overrides: &QueryOverrides,
        cache_key_override: Option<&str>,
        cache_duration: Option<u64>,
        apply_transform: bool,
    ) -> Result<Value, ContentError> {
        let options = self.defaults.merge(overrides);
        let key = match cache_key_override {
            Some(key) => key.to_string(),
            None => cache_key("query", definition, &options, self.language),
        };

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let raw = self
            .client
            .fetch(&definition.query, &definition.params, &options)
            .await?;

        let result = if apply_transform {
            transform_result(&raw, self.language)
        } else {
            raw
        };

        let duration = cache_duration.unwrap_or(self.durations.query);
        self.cache.set(&key, result.clone(), duration);
        tracing::debug!(key = %key, duration, "Cached content query result");

        Ok(result)
    }

    async fn fetch_cached(
        &self,
        prefix: &str,
        definition: &QueryDefinition,
        duration: u64,
        apply_transform: bool,
    ) -> Result<Value, ContentError> {
        let key = cache_key(prefix, definition, &self.defaults, self.language);
        self.fetch(
            definition,
            &QueryOverrides::default(),
            Some(&key),
            Some(duration),
            apply_transform,
        )
        .await
    }

    /// Active scheduled homepage, else the default homepage.
    ///
    /// A failing scheduled query is logged and treated like no schedule.
    pub async fn get_homepage(&self) -> Result<Option<Value>, ContentError> {
        let now = self.cache.clock().now();

        match self.get_scheduled_homepage(now).await {
            Ok(Some(homepage)) => return Ok(Some(homepage)),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    language = %self.language,
                    "Scheduled homepage query failed, using default homepage"
                );
            }
        }

        let definition = queries::default_homepage(self.language);
        self.fetch_cached("homepage", &definition, self.durations.homepage, true)
            .await
            .map(into_document)
    }

    async fn get_scheduled_homepage(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<Value>, ContentError> {
        let definition = queries::scheduled_homepages(self.language);
        let result = self
            .fetch_cached(
                "homepage-scheduled",
                &definition,
                self.durations.homepage,
                true,
            )
            .await?;

        let candidates = into_list(result)?;
        Ok(active_schedule(&candidates, now).cloned())
    }

    pub async fn get_page_by_slug(&self, slug: &str) -> Result<Option<Value>, ContentError> {
        let definition = queries::page_by_slug(slug, self.language);
        self.fetch_cached("page", &definition, self.durations.page, true)
            .await
            .map(into_document)
    }

    pub async fn get_program_page(&self) -> Result<Option<Value>, ContentError> {
        let definition = queries::program_page(self.language);
        self.fetch_cached("program", &definition, self.durations.program, true)
            .await
            .map(into_document)
    }

    pub async fn get_artist_page(&self) -> Result<Option<Value>, ContentError> {
        let definition = queries::artist_page(self.language);
        self.fetch_cached("artist-page", &definition, self.durations.artist, true)
            .await
            .map(into_document)
    }

    pub async fn get_event_by_slug(&self, slug: &str) -> Result<Option<Value>, ContentError> {
        let definition = queries::event_by_slug(slug, self.language);
        self.fetch_cached("event", &definition, self.durations.event, true)
            .await
            .map(into_document)
    }

    pub async fn get_artist_by_slug(&self, slug: &str) -> Result<Option<Value>, ContentError> {
        let definition = queries::artist_by_slug(slug, self.language);
        self.fetch_cached("artist", &definition, self.durations.artist, true)
            .await
            .map(into_document)
    }

    pub async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Value>, ContentError> {
        let definition = queries::article_by_slug(slug, self.language);
        self.fetch_cached("article", &definition, self.durations.article, true)
            .await
            .map(into_document)
    }

    pub async fn get_published_articles(&self) -> Result<Vec<Value>, ContentError> {
        let definition = queries::published_articles(self.language);
        let result = self
            .fetch_cached("articles", &definition, self.durations.article_list, true)
            .await?;
        into_list(result)
    }

    pub async fn get_published_events(&self) -> Result<Vec<Value>, ContentError> {
        let definition = queries::published_events(self.language);
        let mut result = self
            .fetch_cached("events", &definition, self.durations.event_list, true)
            .await?;
        queries::sort_events(&mut result);
        into_list(result)
    }

    /// Distinct event dates (`YYYY-MM-DD`), ascending
    pub async fn get_event_dates(&self) -> Result<Vec<String>, ContentError> {
        let result = self
            .fetch_cached(
                "event-dates",
                &queries::event_dates(),
                self.durations.event_dates,
                false,
            )
            .await?;

        let mut dates: Vec<String> = into_list(result)?
            .into_iter()
            .filter_map(|date| date.as_str().map(str::to_string))
            .collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }

    pub async fn get_events_by_date(&self, date: &str) -> Result<Vec<Value>, ContentError> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            ContentError::InvalidParams(format!("Invalid date '{date}', expected YYYY-MM-DD"))
        })?;

        let definition = queries::events_by_date(date, self.language);
        let mut result = self
            .fetch_cached("events-by-date", &definition, self.durations.event_list, true)
            .await?;
        queries::sort_events(&mut result);
        into_list(result)
    }

    /// Raw slug variants for a document type; not language-resolved
    pub async fn get_slugs_for_type(
        &self,
        doc_type: DocumentType,
    ) -> Result<Vec<Value>, ContentError> {
        let definition = queries::slugs_for_type(doc_type);
        let result = self
            .fetch_cached("slugs", &definition, self.durations.slugs, false)
            .await?;
        into_list(result)
    }

    pub async fn search(&self, term: &str, limit: usize) -> Result<Vec<Value>, ContentError> {
        if term.trim().is_empty() {
            return Err(ContentError::InvalidParams(
                "Search term must not be empty".to_string(),
            ));
        }

        let definition = queries::search(term, self.language, limit);
        let result = self
            .fetch_cached("search", &definition, self.durations.search, true)
            .await?;
        into_list(result)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
