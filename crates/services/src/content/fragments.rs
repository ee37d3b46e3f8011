//! Shared GROQ projection fragments.
//!
//! Every query returning an event, artist or article embeds the same
//! fragment so the object shape does not depend on the entry point.

use super::language::{groq_field, groq_slug, Language};

/// Excludes draft documents when reading the raw dataset
pub const PUBLISHED_FILTER: &str = "!(_id in path(\"drafts.**\"))";

/// Document matches `$slug` in the preferred, fallback or legacy slug field
pub fn slug_filter(language: Language) -> String {
    format!(
        "($slug == slug_{}.current || $slug == slug_{}.current || $slug == slug.current)",
        language.code(),
        language.other().code()
    )
}

fn image_fields() -> &'static str {
    "asset->{ _id, url, metadata { dimensions, lqip } }, alt, hotspot, crop"
}

pub fn venue_fields(language: Language) -> String {
    format!("_id, {}, {}", groq_field("title", language), groq_slug(language))
}

pub fn event_base_fields(language: Language) -> String {
    [
        "_id".to_string(),
        "_type".to_string(),
        "eventDate".to_string(),
        "startTime".to_string(),
        "endTime".to_string(),
        "ticketUrl".to_string(),
        "isFeatured".to_string(),
        groq_field("title", language),
        groq_field("excerpt", language),
        groq_slug(language),
        format!("\"image\": image{{ {} }}", image_fields()),
        format!("\"venue\": venue->{{ {} }}", venue_fields(language)),
        format!(
            "\"artists\": artists[]->{{ _id, name, {} }}",
            groq_slug(language)
        ),
        format!("\"genres\": genres[]->{{ _id, {} }}", groq_field("title", language)),
    ]
    .join(", ")
}

pub fn artist_base_fields(language: Language) -> String {
    [
        "_id".to_string(),
        "_type".to_string(),
        "name".to_string(),
        "country".to_string(),
        groq_field("excerpt", language),
        groq_slug(language),
        format!("\"image\": image{{ {} }}", image_fields()),
        format!("\"genres\": genres[]->{{ _id, {} }}", groq_field("title", language)),
    ]
    .join(", ")
}

pub fn article_base_fields(language: Language) -> String {
    [
        "_id".to_string(),
        "_type".to_string(),
        "publishedAt".to_string(),
        groq_field("title", language),
        groq_field("excerpt", language),
        groq_slug(language),
        format!("\"mainImage\": mainImage{{ {} }}", image_fields()),
        "\"author\": author->{ _id, name }".to_string(),
    ]
    .join(", ")
}

pub fn page_fields(language: Language) -> String {
    [
        "_id".to_string(),
        "_type".to_string(),
        groq_field("title", language),
        groq_field("description", language),
        groq_field("content", language),
        groq_slug(language),
        "seo".to_string(),
    ]
    .join(", ")
}
