//! Bilingual (Norwegian/English) field resolution.
//!
//! A document may carry `title_no`, `title_en` and a legacy `title`. The
//! value for a language is the first non-empty of `{field}_{lang}`,
//! `{field}_{other}`, `{field}`. [`fallback_chain`] is the only place that
//! order is defined; the client-side resolver and the GROQ selectors are
//! both generated from it.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ports::ContentError;

/// Fields replaced by their resolved value in [`transform_document`]
pub const CONVENIENCE_FIELDS: [&str; 4] = ["title", "content", "excerpt", "description"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    No,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::No => "no",
            Language::En => "en",
        }
    }

    pub fn other(&self) -> Language {
        match self {
            Language::No => Language::En,
            Language::En => Language::No,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no" | "nb" | "nn" => Ok(Language::No),
            "en" => Ok(Language::En),
            other => Err(ContentError::InvalidParams(format!(
                "Unsupported language: {other}"
            ))),
        }
    }
}

/// Conventional slug object shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    pub current: String,
}

/// Field names to try for `field` in `language`, most preferred first
pub fn fallback_chain(field: &str, language: Language) -> [String; 3] {
    [
        format!("{field}_{}", language.code()),
        format!("{field}_{}", language.other().code()),
        field.to_string(),
    ]
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// First defined, non-empty value along the fallback chain
pub fn resolve_field<'a>(record: &'a Value, field: &str, language: Language) -> Option<&'a Value> {
    fallback_chain(field, language)
        .iter()
        .find_map(|name| record.get(name).filter(|value| !is_empty(value)))
}

/// Resolved slug, absent unless the winning candidate is `{ "current": string }`
pub fn resolve_slug(record: &Value, language: Language) -> Option<Slug> {
    resolve_field(record, "slug", language)
        .and_then(|value| value.get("current"))
        .and_then(Value::as_str)
        .map(|current| Slug {
            current: current.to_string(),
        })
}

/// Copy of `record` with the convenience fields set to their resolved values.
///
/// Unresolvable fields are removed. Everything else is left as is and the
/// input is never modified. Non-object values are returned unchanged.
pub fn transform_document(record: &Value, language: Language) -> Value {
    let Some(fields) = record.as_object() else {
        return record.clone();
    };

    let mut out = fields.clone();
    for field in CONVENIENCE_FIELDS {
        match resolve_field(record, field, language) {
            Some(value) => {
                out.insert(field.to_string(), value.clone());
            }
            None => {
                out.remove(field);
            }
        }
    }

    match resolve_slug(record, language) {
        Some(slug) => {
            out.insert(
                "slug".to_string(),
                serde_json::json!({ "current": slug.current }),
            );
        }
        None => {
            out.remove("slug");
        }
    }

    Value::Object(out)
}

/// [`transform_document`] applied to a query result: arrays element-wise,
/// objects directly, anything else untouched.
pub fn transform_result(result: &Value, language: Language) -> Value {
    match result {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| transform_document(item, language))
                .collect(),
        ),
        Value::Object(_) => transform_document(result, language),
        other => other.clone(),
    }
}

/// Language from a request path. Norwegian unless the path is under `/en`.
pub fn detect_language(path: &str) -> Language {
    if path == "/en" || path.starts_with("/en/") {
        Language::En
    } else {
        Language::No
    }
}

/// The same page in another language: `/program` <-> `/en/program`
pub fn localized_path(path: &str, language: Language) -> String {
    let base = match detect_language(path) {
        Language::En => match &path[3..] {
            "" => "/",
            rest => rest,
        },
        Language::No => path,
    };

    match language {
        Language::No => base.to_string(),
        Language::En if base == "/" => "/en".to_string(),
        Language::En => format!("/en{base}"),
    }
}

const MONTHS_NO: [&str; 12] = [
    "januar",
    "februar",
    "mars",
    "april",
    "mai",
    "juni",
    "juli",
    "august",
    "september",
    "oktober",
    "november",
    "desember",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Display form of an event date: `15. juni 2024` / `15 June 2024`
pub fn format_event_date(date: NaiveDate, language: Language) -> String {
    let month = date.month0() as usize;
    match language {
        Language::No => format!("{}. {} {}", date.day(), MONTHS_NO[month], date.year()),
        Language::En => format!("{} {} {}", date.day(), MONTHS_EN[month], date.year()),
    }
}

fn groq_non_empty(name: &str) -> String {
    format!("select(defined({name}) && length({name}) != 0 => {name})")
}

/// GROQ projection entry that resolves `field` server-side with the same
/// fallback as [`resolve_field`]
pub fn groq_field(field: &str, language: Language) -> String {
    let candidates: Vec<String> = fallback_chain(field, language)
        .iter()
        .map(|name| groq_non_empty(name))
        .collect();
    format!("\"{field}\": coalesce({})", candidates.join(", "))
}

/// GROQ projection entry for the resolved slug object
pub fn groq_slug(language: Language) -> String {
    let [preferred, fallback, legacy] = fallback_chain("slug", language);
    format!("\"slug\": coalesce({preferred}, {fallback}, {legacy}){{ current }}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fallback_order() {
        let both = json!({"title_no": "Hei", "title_en": "Hello", "title": "Legacy"});
        assert_eq!(resolve_field(&both, "title", Language::No), Some(&json!("Hei")));
        assert_eq!(resolve_field(&both, "title", Language::En), Some(&json!("Hello")));

        let only_other = json!({"title_no": "Hei", "title": "Legacy"});
        assert_eq!(
            resolve_field(&only_other, "title", Language::En),
            Some(&json!("Hei"))
        );

        let legacy = json!({"title": "Legacy"});
        assert_eq!(resolve_field(&legacy, "title", Language::En), Some(&json!("Legacy")));

        assert_eq!(resolve_field(&json!({}), "title", Language::No), None);
    }

    #[test]
    fn test_empty_values_fall_through() {
        let record = json!({
            "title_en": "",
            "title_no": null,
            "title": "Legacy",
            "content_en": [],
            "content_no": [{"_type": "block"}],
        });

        assert_eq!(resolve_field(&record, "title", Language::En), Some(&json!("Legacy")));
        assert_eq!(
            resolve_field(&record, "content", Language::En),
            Some(&json!([{"_type": "block"}]))
        );
    }

    #[test]
    fn test_exhaustive_fallback_property() {
        let candidates: [Option<&str>; 3] = [None, Some(""), Some("set")];
        for language in [Language::No, Language::En] {
            let keys = fallback_chain("title", language);
            for own in candidates {
                for other in candidates {
                    for bare in candidates {
                        let mut record = serde_json::Map::new();
                        for (key, candidate) in keys.iter().zip([own, other, bare]) {
                            if let Some(text) = candidate {
                                let value = if text.is_empty() {
                                    String::new()
                                } else {
                                    format!("{key}:{text}")
                                };
                                record.insert(key.clone(), json!(value));
                            }
                        }
                        let record = Value::Object(record);

                        let expected = keys
                            .iter()
                            .find_map(|k| record.get(k).filter(|v| v.as_str() != Some("")));
                        assert_eq!(resolve_field(&record, "title", language), expected);
                    }
                }
            }
        }
    }

    #[test]
    fn test_resolve_slug_scenarios() {
        let record = json!({
            "slug_no": {"current": "konsert"},
            "slug_en": {"current": "concert"},
        });
        assert_eq!(
            resolve_slug(&record, Language::En),
            Some(Slug {
                current: "concert".to_string()
            })
        );

        let english_only = json!({"slug_en": {"_type": "slug", "current": "concert"}});
        assert_eq!(
            resolve_slug(&english_only, Language::No),
            Some(Slug {
                current: "concert".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_slug_requires_slug_shape() {
        let record = json!({"slug_no": "konsert"});
        assert_eq!(resolve_slug(&record, Language::No), None);

        let legacy = json!({"slug": {"current": "gammel"}});
        assert_eq!(resolve_slug(&legacy, Language::En).unwrap().current, "gammel");
    }

    #[test]
    fn test_transform_document_resolves_and_preserves() {
        let input = json!({
            "_id": "event-1",
            "title_no": "Åpningskonsert",
            "title_en": "Opening concert",
            "excerpt": "Legacy excerpt",
            "description_en": "",
            "slug_no": {"current": "apning"},
            "venue": {"name": "Hovedscenen"},
        });
        let before = input.clone();

        let out = transform_document(&input, Language::En);

        assert_eq!(input, before);
        assert_eq!(out["title"], json!("Opening concert"));
        assert_eq!(out["excerpt"], json!("Legacy excerpt"));
        assert_eq!(out["slug"], json!({"current": "apning"}));
        assert!(out.get("description").is_none());
        assert!(out.get("content").is_none());
        assert_eq!(out["venue"], json!({"name": "Hovedscenen"}));
        assert_eq!(out["title_no"], json!("Åpningskonsert"));
    }

    #[test]
    fn test_transform_result_shapes() {
        let list = json!([{"title_no": "A"}, {"title_en": "B"}]);
        let out = transform_result(&list, Language::No);
        assert_eq!(out[0]["title"], json!("A"));
        assert_eq!(out[1]["title"], json!("B"));

        assert_eq!(transform_result(&Value::Null, Language::No), Value::Null);
        assert_eq!(transform_result(&json!(["2024-06-01"]), Language::No), json!(["2024-06-01"]));
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("/en/program"), Language::En);
        assert_eq!(detect_language("/program"), Language::No);
        assert_eq!(detect_language("/en"), Language::En);
        assert_eq!(detect_language("/english"), Language::No);
        assert_eq!(detect_language("/"), Language::No);
    }

    #[test]
    fn test_localized_path() {
        assert_eq!(localized_path("/program", Language::En), "/en/program");
        assert_eq!(localized_path("/en/program", Language::No), "/program");
        assert_eq!(localized_path("/en", Language::No), "/");
        assert_eq!(localized_path("/", Language::En), "/en");
        assert_eq!(localized_path("/en/artister", Language::En), "/en/artister");
    }

    #[test]
    fn test_format_event_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(format_event_date(date, Language::No), "15. juni 2024");
        assert_eq!(format_event_date(date, Language::En), "15 June 2024");
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!("nb".parse::<Language>().unwrap(), Language::No);
        assert!("de".parse::<Language>().is_err());
    }

    /// Evaluates a generated `coalesce(select(...), ...)` selector against a
    /// record using GROQ's semantics for `defined`/`length`.
    fn evaluate_groq_field(selector: &str, record: &Value) -> Option<Value> {
        selector
            .split("=> ")
            .skip(1)
            .map(|rest| rest.split(')').next().unwrap_or_default().trim())
            .find_map(|name| {
                let value = record.get(name)?;
                let length = match value {
                    Value::String(s) => Some(s.chars().count()),
                    Value::Array(items) => Some(items.len()),
                    _ => None,
                };
                match (value, length) {
                    (Value::Null, _) => None,
                    (_, Some(0)) => None,
                    _ => Some(value.clone()),
                }
            })
    }

    #[test]
    fn test_groq_selector_matches_client_resolver() {
        let records = [
            json!({"title_no": "Hei", "title_en": "Hello", "title": "Legacy"}),
            json!({"title_no": "", "title_en": "Hello"}),
            json!({"title_en": [], "title": "Legacy"}),
            json!({"title_no": null}),
            json!({}),
        ];

        for language in [Language::No, Language::En] {
            let selector = groq_field("title", language);
            for record in &records {
                assert_eq!(
                    evaluate_groq_field(&selector, record),
                    resolve_field(record, "title", language).cloned(),
                    "selector {selector} disagrees for {record}"
                );
            }
        }
    }

    #[test]
    fn test_groq_field_shape() {
        assert_eq!(
            groq_field("title", Language::En),
            "\"title\": coalesce(select(defined(title_en) && length(title_en) != 0 => title_en), \
             select(defined(title_no) && length(title_no) != 0 => title_no), \
             select(defined(title) && length(title) != 0 => title))"
        );
        assert_eq!(
            groq_slug(Language::No),
            "\"slug\": coalesce(slug_no, slug_en, slug){ current }"
        );
    }
}
