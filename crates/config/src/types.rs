use serde::Deserialize;
use std::{collections::HashMap, env};

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub sanity: SanityConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            sanity: SanityConfig::from_env()?,
            cache: CacheConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| "SERVER_PORT must be a valid port number")?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Headless CMS (Sanity) connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct SanityConfig {
    pub project_id: String,
    #[serde(default = "default_dataset")]
    pub dataset: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Read token for draft content. Without it preview mode is unavailable.
    #[serde(default)]
    pub read_token: Option<String>,
    /// Embed content source maps (stega) for visual editing
    #[serde(default)]
    pub visual_editing: bool,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_dataset() -> String {
    "production".to_string()
}

fn default_api_version() -> String {
    "2024-01-01".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

impl SanityConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            project_id: env::var("SANITY_PROJECT_ID").map_err(|_| "SANITY_PROJECT_ID not set")?,
            dataset: env::var("SANITY_DATASET").unwrap_or_else(|_| default_dataset()),
            api_version: env::var("SANITY_API_VERSION").unwrap_or_else(|_| default_api_version()),
            read_token: env::var("SANITY_API_READ_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            visual_editing: env::var("PUBLIC_SANITY_VISUAL_EDITING_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            timeout_seconds: env::var("SANITY_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_timeout_seconds),
        })
    }

    /// Draft preview is only possible with a read token
    pub fn preview_available(&self) -> bool {
        self.read_token.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    #[default]
    Production,
    Development,
}

impl CacheMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(CacheMode::Production),
            "development" | "dev" => Some(CacheMode::Development),
            _ => None,
        }
    }
}

/// Cache time-to-live per content type, in seconds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheDurations {
    pub homepage: u64,
    pub page: u64,
    pub program: u64,
    pub artist: u64,
    pub event: u64,
    pub article: u64,
    pub event_list: u64,
    pub article_list: u64,
    pub event_dates: u64,
    pub slugs: u64,
    pub search: u64,
    /// Ad-hoc queries without a content-type specific TTL
    pub query: u64,
}

impl CacheDurations {
    pub fn production() -> Self {
        Self {
            homepage: 3600,
            page: 1800,
            program: 600,
            artist: 1800,
            event: 300,
            article: 1800,
            event_list: 300,
            article_list: 1800,
            event_dates: 300,
            slugs: 3600,
            search: 60,
            query: 300,
        }
    }

    /// Near-zero TTLs so content edits show up while authoring
    pub fn development() -> Self {
        Self {
            homepage: 1,
            page: 1,
            program: 1,
            artist: 1,
            event: 1,
            article: 1,
            event_list: 1,
            article_list: 1,
            event_dates: 1,
            slugs: 1,
            search: 1,
            query: 1,
        }
    }

    /// Production defaults with `CACHE_TTL_<NAME>` overrides taken from `lookup`
    pub fn production_with_overrides<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut durations = Self::production();
        let fields: [(&str, &mut u64); 12] = [
            ("CACHE_TTL_HOMEPAGE", &mut durations.homepage),
            ("CACHE_TTL_PAGE", &mut durations.page),
            ("CACHE_TTL_PROGRAM", &mut durations.program),
            ("CACHE_TTL_ARTIST", &mut durations.artist),
            ("CACHE_TTL_EVENT", &mut durations.event),
            ("CACHE_TTL_ARTICLE", &mut durations.article),
            ("CACHE_TTL_EVENT_LIST", &mut durations.event_list),
            ("CACHE_TTL_ARTICLE_LIST", &mut durations.article_list),
            ("CACHE_TTL_EVENT_DATES", &mut durations.event_dates),
            ("CACHE_TTL_SLUGS", &mut durations.slugs),
            ("CACHE_TTL_SEARCH", &mut durations.search),
            ("CACHE_TTL_QUERY", &mut durations.query),
        ];

        for (name, slot) in fields {
            if let Some(raw) = lookup(name) {
                *slot = raw
                    .trim()
                    .parse()
                    .map_err(|_| format!("{name} must be a number of seconds"))?;
            }
        }

        Ok(durations)
    }
}

impl Default for CacheDurations {
    fn default() -> Self {
        Self::production()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub mode: CacheMode,
    pub durations: CacheDurations,
}

impl CacheConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        // CACHE_MODE is strict; APP_ENV may hold unrelated values like "staging"
        let mode = match env::var("CACHE_MODE") {
            Ok(value) => CacheMode::parse(&value).ok_or_else(|| {
                format!("Unknown cache mode '{value}', expected production or development")
            })?,
            Err(_) => env::var("APP_ENV")
                .ok()
                .and_then(|value| CacheMode::parse(&value))
                .unwrap_or_default(),
        };

        Ok(Self {
            mode,
            durations: CacheDurations::production_with_overrides(|name| env::var(name).ok())?,
        })
    }

    /// Effective TTLs; development mode ignores the configured durations
    pub fn durations(&self) -> CacheDurations {
        match self.mode {
            CacheMode::Production => self.durations.clone(),
            CacheMode::Development => CacheDurations::development(),
        }
    }
}

/// Logging Configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub modules: HashMap<String, String>,
}

impl LoggingConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        let mut modules = HashMap::new();

        // Load module-specific log levels
        if let Ok(level) = env::var("LOG_MODULE_API") {
            modules.insert("api".to_string(), level);
        }
        if let Ok(level) = env::var("LOG_MODULE_SERVICES") {
            modules.insert("services".to_string(), level);
        }

        Ok(Self {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            modules,
        })
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let mut modules = HashMap::new();
        modules.insert("api".to_string(), "debug".to_string());
        modules.insert("services".to_string(), "debug".to_string());

        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            modules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_mode_overrides_durations() {
        let config = CacheConfig {
            mode: CacheMode::Development,
            durations: CacheDurations::production(),
        };

        let durations = config.durations();
        assert_eq!(durations, CacheDurations::development());
        assert_eq!(durations.homepage, 1);
    }

    #[test]
    fn test_production_durations() {
        let config = CacheConfig::default();
        let durations = config.durations();

        assert_eq!(durations.homepage, 3600);
        assert_eq!(durations.event_list, 300);
        assert_eq!(durations.article, 1800);
    }

    #[test]
    fn test_duration_overrides() {
        let durations = CacheDurations::production_with_overrides(|name| match name {
            "CACHE_TTL_EVENT" => Some("42".to_string()),
            "CACHE_TTL_SEARCH" => Some(" 5 ".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(durations.event, 42);
        assert_eq!(durations.search, 5);
        assert_eq!(durations.homepage, 3600);
    }

    #[test]
    fn test_duration_override_rejects_garbage() {
        let err = CacheDurations::production_with_overrides(|name| {
            (name == "CACHE_TTL_PAGE").then(|| "ten".to_string())
        })
        .unwrap_err();

        assert!(err.contains("CACHE_TTL_PAGE"));
    }

    #[test]
    fn test_cache_mode_parse() {
        assert_eq!(CacheMode::parse("dev"), Some(CacheMode::Development));
        assert_eq!(CacheMode::parse("Production"), Some(CacheMode::Production));
        assert_eq!(CacheMode::parse("staging"), None);
    }

    #[test]
    fn test_preview_requires_token() {
        let mut sanity = SanityConfig {
            project_id: "abc123".to_string(),
            dataset: default_dataset(),
            api_version: default_api_version(),
            read_token: None,
            visual_editing: false,
            timeout_seconds: 10,
        };
        assert!(!sanity.preview_available());

        sanity.read_token = Some("sk-token".to_string());
        assert!(sanity.preview_available());
    }
}
