//! Permit.io HTTP client (reqwest-based).
//!
//! Every call is authenticated with the configured API key as a bearer
//! token. Project and environment path segments come from the key's scope,
//! which is looked up once and cached for the lifetime of the client.

use crate::config::PermitConfig;
use crate::error::{PermitError, PermitResult};
use crate::models::ApiKeyScope;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("terraform-provider-permitio/", env!("CARGO_PKG_VERSION"));

/// API family a path belongs to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Family {
    Schema,
    Facts,
}

impl Family {
    fn segment(self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Facts => "facts",
        }
    }
}

/// Permit.io API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the cached scope.
#[derive(Clone)]
pub struct PermitClient {
    base_url: Url,
    api_key: SecretString,
    http_client: Client,
    debug: bool,
    scope: Arc<RwLock<Option<ApiKeyScope>>>,
}

impl PermitClient {
    /// Create a client from validated settings.
    pub fn new(config: PermitConfig) -> PermitResult<Self> {
        config.validate()?;
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                PermitError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
            })?;
        Self::with_http_client(config, http_client)
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    pub fn with_http_client(config: PermitConfig, http_client: Client) -> PermitResult<Self> {
        let base_url = Url::parse(config.api_url.trim_end_matches('/')).map_err(|e| {
            PermitError::InvalidConfiguration(format!("invalid API URL '{}': {e}", config.api_url))
        })?;

        Ok(Self {
            base_url,
            api_key: config.api_key,
            http_client,
            debug: config.debug,
            scope: Arc::new(RwLock::new(None)),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Scope ─────────────────────────────────────────────────────────

    /// Scope of the API key (GET /v2/api-key/scope), fetched on first use.
    pub async fn scope(&self) -> PermitResult<ApiKeyScope> {
        if let Some(scope) = self.scope.read().await.as_ref() {
            return Ok(scope.clone());
        }

        let mut cached = self.scope.write().await;
        if let Some(scope) = cached.as_ref() {
            return Ok(scope.clone());
        }

        let url = self.url(&["v2", "api-key", "scope"])?;
        let scope: ApiKeyScope = self.send(Method::GET, url, None::<&()>).await?;
        info!(
            organization_id = %scope.organization_id,
            project_id = ?scope.project_id,
            environment_id = ?scope.environment_id,
            "Resolved Permit API key scope"
        );
        *cached = Some(scope.clone());
        Ok(scope)
    }

    /// URL under `/v2/{family}/{project}/{environment}/`.
    pub(crate) async fn scoped_url(&self, family: Family, segments: &[&str]) -> PermitResult<Url> {
        let scope = self.scope().await?;
        let (Some(project), Some(environment)) = (&scope.project_id, &scope.environment_id)
        else {
            return Err(PermitError::InvalidConfiguration(
                "API key is not scoped to an environment; use an environment-level key"
                    .to_string(),
            ));
        };

        let mut all = vec!["v2", family.segment(), project.as_str(), environment.as_str()];
        all.extend_from_slice(segments);
        self.url(&all)
    }

    fn url(&self, segments: &[&str]) -> PermitResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                PermitError::InvalidConfiguration(format!(
                    "API URL '{}' cannot be used as a base URL",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── HTTP Helpers ──────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> PermitResult<T> {
        self.send(Method::GET, url, None::<&()>).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        url: Url,
        query: &Q,
    ) -> PermitResult<T> {
        debug!("Permit GET {}", url);
        let builder = self.authorized(Method::GET, url).query(query);
        let response = builder.send().await?;
        self.handle_response(response).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> PermitResult<T> {
        self.send(Method::POST, url, Some(body)).await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> PermitResult<T> {
        self.send(Method::PATCH, url, Some(body)).await
    }

    pub(crate) async fn delete(&self, url: Url) -> PermitResult<()> {
        self.send_no_content(Method::DELETE, url, None::<&()>).await
    }

    pub(crate) async fn delete_with_body<B: Serialize>(&self, url: Url, body: &B) -> PermitResult<()> {
        self.send_no_content(Method::DELETE, url, Some(body)).await
    }

    fn authorized(&self, method: Method, url: Url) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .bearer_auth(self.api_key.expose_secret())
    }

    fn request<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> PermitResult<RequestBuilder> {
        debug!("Permit {} {}", method, url);
        let builder = self.authorized(method, url);
        match body {
            Some(body) => {
                let payload = serde_json::to_vec(body)?;
                if self.debug {
                    debug!(body = %String::from_utf8_lossy(&payload), "Permit request body");
                }
                Ok(builder
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(payload))
            }
            None => Ok(builder),
        }
    }

    async fn send<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> PermitResult<T> {
        let response = self.request(method, url, body)?.send().await?;
        self.handle_response(response).await
    }

    async fn send_no_content<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> PermitResult<()> {
        let response = self.request(method, url, body)?.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            self.handle_error_response(response).await
        }
    }

    // ── Response Handling ─────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> PermitResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            if self.debug {
                debug!(status = status.as_u16(), body = %body, "Permit response body");
            }
            Ok(serde_json::from_str(&body)?)
        } else {
            self.handle_error_response(response).await
        }
    }

    async fn handle_error_response<T>(&self, response: reqwest::Response) -> PermitResult<T> {
        let status = response.status();

        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        let detail = error_detail(&body);

        match status {
            StatusCode::UNAUTHORIZED => Err(PermitError::Unauthorized(detail)),
            StatusCode::FORBIDDEN => Err(PermitError::Forbidden(detail)),
            StatusCode::NOT_FOUND => Err(PermitError::NotFound(detail)),
            StatusCode::CONFLICT => Err(PermitError::Conflict(detail)),
            StatusCode::UNPROCESSABLE_ENTITY => Err(PermitError::Validation(detail)),
            StatusCode::TOO_MANY_REQUESTS => {
                warn!(retry_after = ?retry_after, "Permit API rate limited");
                Err(PermitError::RateLimited {
                    retry_after_secs: retry_after,
                })
            }
            _ => {
                warn!(status = status.as_u16(), detail = %detail, "Permit API error");
                Err(PermitError::Api {
                    status: status.as_u16(),
                    detail,
                })
            }
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Permit errors carry `message`, validation errors carry `detail`; anything
/// else is returned verbatim.
fn error_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    ["message", "detail"]
        .iter()
        .find_map(|field| match value.get(*field) {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) if !other.is_null() => Some(other.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| body.to_string())
}

impl std::fmt::Debug for PermitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermitClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}
