//! GROQ query builders.
//!
//! Every builder is a pure function: the same arguments always produce the
//! same [`QueryDefinition`]. No I/O and no caching happen here.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::fragments::{
    article_base_fields, artist_base_fields, event_base_fields, page_fields, slug_filter,
    PUBLISHED_FILTER,
};
use super::language::{groq_field, groq_slug, Language};
use super::ports::ContentError;

/// Query text plus parameters, one per call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDefinition {
    pub query: String,
    pub params: BTreeMap<String, Value>,
}

impl QueryDefinition {
    fn new(query: String) -> Self {
        Self {
            query,
            params: BTreeMap::new(),
        }
    }

    fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }
}

/// Chronological event order: date first, start time breaks ties
pub const EVENT_ORDER: &str = "order(eventDate asc, startTime asc)";

/// Searchable / routable document types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    Page,
    Event,
    Artist,
    Article,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Page => "page",
            DocumentType::Event => "event",
            DocumentType::Artist => "artist",
            DocumentType::Article => "article",
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(DocumentType::Page),
            "event" => Ok(DocumentType::Event),
            "artist" => Ok(DocumentType::Artist),
            "article" => Ok(DocumentType::Article),
            other => Err(ContentError::InvalidParams(format!(
                "Unknown document type: {other}"
            ))),
        }
    }
}

pub const MAX_SEARCH_RESULTS: usize = 50;

fn homepage_projection(language: Language) -> String {
    format!(
        "{{ _id, _type, homePageType, scheduledStart, scheduledEnd, {}, {}, {}, \
         \"featuredEvents\": featuredEvents[]->{{ {} }}, \
         \"featuredArticles\": featuredArticles[]->{{ {} }} }}",
        groq_field("title", language),
        groq_field("description", language),
        groq_field("content", language),
        event_base_fields(language),
        article_base_fields(language),
    )
}

/// Every scheduled homepage with both bounds set, latest start first.
///
/// The active one is picked with [`super::homepage::active_schedule`]; the
/// window is never compared in GROQ, where date-only bounds would compare as
/// strings.
pub fn scheduled_homepages(language: Language) -> QueryDefinition {
    QueryDefinition::new(format!(
        "*[_type == \"homepage\" && homePageType == \"scheduled\" \
         && defined(scheduledStart) && defined(scheduledEnd)] \
         | order(scheduledStart desc){}",
        homepage_projection(language)
    ))
}

pub fn default_homepage(language: Language) -> QueryDefinition {
    QueryDefinition::new(format!(
        "*[_type == \"homepage\" && homePageType == \"default\"][0]{}",
        homepage_projection(language)
    ))
}

pub fn page_by_slug(slug: &str, language: Language) -> QueryDefinition {
    QueryDefinition::new(format!(
        "*[_type == \"page\" && {}][0]{{ {} }}",
        slug_filter(language),
        page_fields(language)
    ))
    .param("slug", slug)
}

pub fn program_page(language: Language) -> QueryDefinition {
    QueryDefinition::new(format!(
        "*[_type == \"programPage\"][0]{{ {}, \
         \"events\": *[_type == \"event\" && {PUBLISHED_FILTER}] | {EVENT_ORDER}{{ {} }} }}",
        page_fields(language),
        event_base_fields(language)
    ))
}

pub fn artist_page(language: Language) -> QueryDefinition {
    QueryDefinition::new(format!(
        "*[_type == \"artistPage\"][0]{{ {}, \
         \"artists\": *[_type == \"artist\" && {PUBLISHED_FILTER}] | order(name asc){{ {} }} }}",
        page_fields(language),
        artist_base_fields(language)
    ))
}

pub fn event_by_slug(slug: &str, language: Language) -> QueryDefinition {
    QueryDefinition::new(format!(
        "*[_type == \"event\" && {}][0]{{ {}, {}, {} }}",
        slug_filter(language),
        event_base_fields(language),
        groq_field("description", language),
        groq_field("content", language),
    ))
    .param("slug", slug)
}

pub fn artist_by_slug(slug: &str, language: Language) -> QueryDefinition {
    QueryDefinition::new(format!(
        "*[_type == \"artist\" && {}][0]{{ {}, {}, \
         \"events\": *[_type == \"event\" && references(^._id) && {PUBLISHED_FILTER}] \
         | {EVENT_ORDER}{{ {} }} }}",
        slug_filter(language),
        artist_base_fields(language),
        groq_field("content", language),
        event_base_fields(language),
    ))
    .param("slug", slug)
}

pub fn article_by_slug(slug: &str, language: Language) -> QueryDefinition {
    QueryDefinition::new(format!(
        "*[_type == \"article\" && {}][0]{{ {}, {} }}",
        slug_filter(language),
        article_base_fields(language),
        groq_field("content", language),
    ))
    .param("slug", slug)
}

pub fn published_articles(language: Language) -> QueryDefinition {
    QueryDefinition::new(format!(
        "*[_type == \"article\" && {PUBLISHED_FILTER} && defined(publishedAt)] \
         | order(publishedAt desc){{ {} }}",
        article_base_fields(language)
    ))
}

pub fn published_events(language: Language) -> QueryDefinition {
    QueryDefinition::new(format!(
        "*[_type == \"event\" && {PUBLISHED_FILTER}] | {EVENT_ORDER}{{ {} }}",
        event_base_fields(language)
    ))
}

/// Distinct event dates, ascending
pub fn event_dates() -> QueryDefinition {
    QueryDefinition::new(format!(
        "array::unique(*[_type == \"event\" && {PUBLISHED_FILTER} && defined(eventDate)] \
         | order(eventDate asc).eventDate)"
    ))
}

pub fn events_by_date(date: &str, language: Language) -> QueryDefinition {
    QueryDefinition::new(format!(
        "*[_type == \"event\" && {PUBLISHED_FILTER} && eventDate == $date] \
         | {EVENT_ORDER}{{ {} }}",
        event_base_fields(language)
    ))
    .param("date", date)
}

/// Every slug variant of a document type, for static path generation
pub fn slugs_for_type(doc_type: DocumentType) -> QueryDefinition {
    QueryDefinition::new(format!(
        "*[_type == $type && {PUBLISHED_FILTER} \
         && defined(coalesce(slug_no.current, slug_en.current, slug.current))]\
         {{ _id, \"slug_no\": slug_no.current, \"slug_en\": slug_en.current, \"slug\": slug.current }}"
    ))
    .param("type", doc_type.as_str())
}

/// Prefix search over titles and excerpts of routable documents
pub fn search(term: &str, language: Language, limit: usize) -> QueryDefinition {
    let limit = limit.clamp(1, MAX_SEARCH_RESULTS);
    QueryDefinition::new(format!(
        "*[_type in [\"event\", \"artist\", \"article\", \"page\"] && {PUBLISHED_FILTER} \
         && (title_no match $term || title_en match $term || title match $term \
         || name match $term || excerpt_no match $term || excerpt_en match $term)] \
         | order(_updatedAt desc)[0...{limit}]{{ _id, _type, name, eventDate, {}, {}, {} }}",
        groq_field("title", language),
        groq_field("excerpt", language),
        groq_slug(language),
    ))
    .param("term", format!("{}*", term.trim()))
}

fn event_sort_key(event: &Value) -> (Option<&str>, Option<&str>) {
    (
        event.get("eventDate").and_then(Value::as_str),
        event.get("startTime").and_then(Value::as_str),
    )
}

fn cmp_present_first(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Same order as [`EVENT_ORDER`]; events without a date or time go last
pub fn compare_events(a: &Value, b: &Value) -> Ordering {
    let (date_a, time_a) = event_sort_key(a);
    let (date_b, time_b) = event_sort_key(b);
    cmp_present_first(date_a, date_b).then_with(|| cmp_present_first(time_a, time_b))
}

/// Stable chronological sort of an event list; non-arrays are left alone
pub fn sort_events(result: &mut Value) {
    if let Value::Array(events) = result {
        events.sort_by(compare_events);
    }
}
