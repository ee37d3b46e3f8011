use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "test-mocks"))]
use mockall::automock;

/// Error type for content layer operations
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("CMS request failed: {0}")]
    RequestFailed(String),
    #[error("CMS returned an error: {status} {body}")]
    ApiError { status: u16, body: String },
    #[error("CMS response parsing failed: {0}")]
    ParseError(String),
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
    #[error("CMS client not configured: {0}")]
    NotConfigured(String),
}

/// Which content snapshot a query reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    #[default]
    Published,
    Drafts,
}

impl Perspective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Perspective::Published => "published",
            Perspective::Drafts => "drafts",
        }
    }
}

impl std::fmt::Display for Perspective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options passed to the CMS client with every query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub perspective: Perspective,
    /// Read through the CDN. Faster, but may lag behind published content.
    pub use_cdn: bool,
    /// Credential required for draft access
    pub token: Option<String>,
    /// Embed source-mapping metadata for visual editing
    pub stega: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            perspective: Perspective::Published,
            use_cdn: true,
            token: None,
            stega: false,
        }
    }
}

impl QueryOptions {
    /// Per-call overrides win over these defaults
    pub fn merge(&self, overrides: &QueryOverrides) -> QueryOptions {
        QueryOptions {
            perspective: overrides.perspective.unwrap_or(self.perspective),
            use_cdn: overrides.use_cdn.unwrap_or(self.use_cdn),
            token: overrides.token.clone().or_else(|| self.token.clone()),
            stega: overrides.stega.unwrap_or(self.stega),
        }
    }
}

/// Partial [`QueryOptions`] supplied for a single fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOverrides {
    pub perspective: Option<Perspective>,
    pub use_cdn: Option<bool>,
    pub token: Option<String>,
    pub stega: Option<bool>,
}

/// Headless CMS query port.
///
/// The content layer consumes exactly this one method; transport, auth and
/// connection handling belong to the implementation.
#[cfg_attr(any(test, feature = "test-mocks"), automock)]
#[async_trait]
pub trait CmsClient: Send + Sync {
    async fn fetch(
        &self,
        query: &str,
        params: &BTreeMap<String, serde_json::Value>,
        options: &QueryOptions,
    ) -> Result<serde_json::Value, ContentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_overrides() {
        let defaults = QueryOptions {
            perspective: Perspective::Published,
            use_cdn: true,
            token: Some("default-token".to_string()),
            stega: false,
        };

        let merged = defaults.merge(&QueryOverrides {
            perspective: Some(Perspective::Drafts),
            use_cdn: Some(false),
            token: None,
            stega: Some(true),
        });

        assert_eq!(merged.perspective, Perspective::Drafts);
        assert!(!merged.use_cdn);
        assert_eq!(merged.token.as_deref(), Some("default-token"));
        assert!(merged.stega);
    }

    #[test]
    fn test_merge_without_overrides_is_identity() {
        let defaults = QueryOptions::default();
        assert_eq!(defaults.merge(&QueryOverrides::default()), defaults);
    }

    #[test]
    fn test_perspective_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(Perspective::Drafts).unwrap(),
            serde_json::json!("drafts")
        );
        assert_eq!(Perspective::Published.to_string(), "published");
    }
}
