use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::ports::{CmsClient, ContentError, Perspective, QueryOptions};

/// HTTP client for the Sanity query API
pub struct SanityClient {
    client: reqwest::Client,
    project_id: String,
    dataset: String,
    api_version: String,
    /// Overrides the `https://<project>.api(cdn).sanity.io` origin, used in tests
    origin: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    result: Option<serde_json::Value>,
}

impl SanityClient {
    /// Create a new Sanity client
    ///
    /// # Arguments
    /// * `config` - Project, dataset and API version to query
    pub fn new(config: &config::SanityConfig) -> Result<Self, ContentError> {
        if config.project_id.trim().is_empty() {
            return Err(ContentError::NotConfigured(
                "Sanity project id is empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ContentError::RequestFailed(format!("Failed to build HTTP client: {e}")))?;

        tracing::info!(
            project_id = %config.project_id,
            dataset = %config.dataset,
            api_version = %config.api_version,
            read_token_configured = config.read_token.is_some(),
            "Sanity client initialized"
        );

        Ok(Self {
            client,
            project_id: config.project_id.clone(),
            dataset: config.dataset.clone(),
            api_version: config.api_version.clone(),
            origin: None,
        })
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Query endpoint for the given options. Drafts always bypass the CDN.
    pub fn endpoint(&self, options: &QueryOptions) -> Result<Url, ContentError> {
        let use_cdn = options.use_cdn && options.perspective == Perspective::Published;
        let origin = match &self.origin {
            Some(origin) => origin.trim_end_matches('/').to_string(),
            None => {
                let host = if use_cdn { "apicdn" } else { "api" };
                format!("https://{}.{host}.sanity.io", self.project_id)
            }
        };

        let version = self.api_version.trim_start_matches('v');
        let mut url = Url::parse(&format!(
            "{origin}/v{version}/data/query/{}",
            self.dataset
        ))
        .map_err(|e| ContentError::NotConfigured(format!("Invalid Sanity endpoint: {e}")))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("perspective", options.perspective.as_str());
            if options.stega {
                pairs.append_pair("resultSourceMap", "withKeyArraySelector");
            }
        }

        Ok(url)
    }

    /// Check response status and extract error body if needed
    async fn check_response(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ContentError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let status_code = status.as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            Err(ContentError::ApiError {
                status: status_code,
                body,
            })
        }
    }
}

#[async_trait]
impl CmsClient for SanityClient {
    async fn fetch(
        &self,
        query: &str,
        params: &BTreeMap<String, serde_json::Value>,
        options: &QueryOptions,
    ) -> Result<serde_json::Value, ContentError> {
        let url = self.endpoint(options)?;
        let body = serde_json::json!({ "query": query, "params": params });

        let mut request = self.client.post(url).json(&body);
        if let Some(ref token) = options.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ContentError::RequestFailed(e.to_string()))?;

        let response = Self::check_response(response).await?;
        let parsed = response
            .json::<QueryResponse>()
            .await
            .map_err(|e| ContentError::ParseError(e.to_string()))?;

        Ok(parsed.result.unwrap_or(serde_json::Value::Null))
    }
}
