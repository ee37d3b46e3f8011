use sha2::{Digest, Sha256};

use super::language::Language;
use super::ports::QueryOptions;
use super::queries::QueryDefinition;

/// Cache key for a query under the merged options and language.
///
/// `params` is a `BTreeMap` and `serde_json::Map` keeps keys sorted, so the
/// serialized form is deterministic at every nesting level.
pub fn cache_key(
    prefix: &str,
    definition: &QueryDefinition,
    options: &QueryOptions,
    language: Language,
) -> String {
    let params = serde_json::to_string(&definition.params).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(definition.query.as_bytes());
    hasher.update([0u8]);
    hasher.update(params.as_bytes());
    hasher.update([0u8]);
    hasher.update(
        format!(
            "perspective={};cdn={};token={};stega={};lang={}",
            options.perspective,
            options.use_cdn,
            options.token.is_some(),
            options.stega,
            language
        )
        .as_bytes(),
    );

    format!(
        "{prefix}:{language}:{}:{}",
        options.perspective,
        hex::encode(hasher.finalize())
    )
}
