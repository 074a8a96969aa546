//! HTTP implementation of the catalog API.

use crate::api::CatalogApi;
use crate::error::{ClientError, Result};
use crate::types::ClientConfig;
use async_trait::async_trait;
use marquee_core::types::{
    ApiErrorBody, CreateEntity, CreatePart, CreatedEntity, DuplicateQuery, DuplicateResponse,
    EntityKind, NextNumberResponse,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Client for a catalog backend.
///
/// Cloning is cheap: clones share the connection pool. The access token is
/// part of each client value, so scoping a token to a set of calls means
/// deriving a new client with [`CatalogClient::with_access_token`].
///
/// # Example
///
/// ```ignore
/// use marquee_client::{CatalogApi, CatalogClient, ClientConfig};
/// use marquee_core::types::{DuplicateQuery, EntityKind};
///
/// let client = CatalogClient::new(ClientConfig::with_token("https://catalog.example.com/api", "token"))?;
/// let exists = client
///     .check_duplicate(EntityKind::Movie, &DuplicateQuery::name_only("Inception"))
///     .await?;
/// ```
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: Arc<str>,
    access_token: Option<Arc<str>>,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        // Validate URL
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Marquee/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: url.into(),
            access_token: config.access_token.map(Into::into),
        })
    }

    /// Get the normalized base URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Check if requests carry an access token.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Derive a client that sends `token` with its requests.
    ///
    /// The original client is left untouched.
    pub fn with_access_token(&self, token: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: Arc::clone(&self.base_url),
            access_token: Some(token.into().into()),
        }
    }

    /// Derive a client that sends no access token.
    pub fn without_access_token(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: Arc::clone(&self.base_url),
            access_token: None,
        }
    }

    fn endpoint(&self, kind: EntityKind, tail: &str) -> String {
        format!("{}/{}{}", self.base_url, kind.collection(), tail)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        self.authorize(request).send().await.map_err(transport_error)
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn check_duplicate(&self, kind: EntityKind, query: &DuplicateQuery) -> Result<bool> {
        let url = self.endpoint(kind, "/duplicate-check");
        debug!(
            url = %url,
            name = %query.name,
            composite = query.is_composite(),
            "Checking for duplicate"
        );

        let response = self.send(self.http.get(&url).query(query)).await?;

        if response.status().is_success() {
            let body: DuplicateResponse = read_json(response, "duplicate-check").await?;
            debug!(name = %query.name, duplicate = body.duplicate, "Duplicate check complete");
            Ok(body.duplicate)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn suggest(&self, kind: EntityKind, query: &str, limit: u32) -> Result<Vec<String>> {
        let url = self.endpoint(kind, "/suggest");
        debug!(url = %url, query = %query, limit, "Fetching suggestions");

        let limit = limit.to_string();
        let response = self
            .send(self.http.get(&url).query(&[("q", query), ("limit", limit.as_str())]))
            .await?;

        if response.status().is_success() {
            let titles: Vec<String> = read_json(response, "suggest").await?;
            debug!(results = titles.len(), "Suggestions fetched");
            Ok(titles)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn create_entity(&self, kind: EntityKind, body: &CreateEntity) -> Result<CreatedEntity> {
        let url = self.endpoint(kind, "");
        debug!(url = %url, name = %body.name, "Creating {}", kind);

        let response = self.send(self.http.post(&url).json(body)).await?;

        if response.status().is_success() {
            let created: CreatedEntity = read_json(response, "create").await?;
            info!(id = created.id, name = %body.name, kind = %kind, "Entity created");
            Ok(created)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn create_part(&self, kind: EntityKind, body: &CreatePart) -> Result<()> {
        let url = self.endpoint(kind, &format!("/{}", kind.children()));
        debug!(
            url = %url,
            parent_id = body.parent_id,
            number = body.number,
            "Creating {}",
            kind.child_label()
        );

        let response = self.send(self.http.post(&url).json(body)).await?;

        if response.status().is_success() {
            info!(
                parent_id = body.parent_id,
                number = body.number,
                "{} created",
                kind.child_label()
            );
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn next_number(&self, kind: EntityKind) -> Result<i64> {
        let url = self.endpoint(kind, "/next-number");
        debug!(url = %url, "Fetching next sequence number");

        let response = self.send(self.http.get(&url)).await?;

        if response.status().is_success() {
            let body: NextNumberResponse = read_json(response, "next-number").await?;
            Ok(body.next_number)
        } else {
            Err(error_from_response(response).await)
        }
    }
}

fn transport_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServerUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ClientError::ParseError(format!("Failed to parse {} response: {}", what, e)))
}

async fn error_from_response(response: Response) -> ClientError {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return ClientError::AuthRequired;
    }

    let error_text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiErrorBody>(&error_text) {
        Ok(body) => ClientError::ApiError {
            status: status.as_u16(),
            error: body.error,
        },
        Err(_) => ClientError::ServerError {
            status: status.as_u16(),
            message: error_text,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        // Valid URLs
        assert!(CatalogClient::new(ClientConfig::new("https://example.com")).is_ok());
        assert!(CatalogClient::new(ClientConfig::new("http://localhost:8080/api")).is_ok());

        // Invalid URLs
        assert!(CatalogClient::new(ClientConfig::new("")).is_err());
        assert!(CatalogClient::new(ClientConfig::new("not-a-url")).is_err());
        assert!(CatalogClient::new(ClientConfig::new("ftp://example.com")).is_err());
        assert!(CatalogClient::new(ClientConfig::new("http://")).is_err());
    }

    #[test]
    fn test_url_normalization() {
        let client =
            CatalogClient::new(ClientConfig::new("https://example.com/api//")).expect("valid url");
        assert_eq!(client.url(), "https://example.com/api");
    }

    #[test]
    fn test_endpoints() {
        let client = CatalogClient::new(ClientConfig::new("https://example.com/api")).unwrap();
        assert_eq!(
            client.endpoint(EntityKind::Movie, "/duplicate-check"),
            "https://example.com/api/movies/duplicate-check"
        );
        assert_eq!(
            client.endpoint(EntityKind::Series, "/seasons"),
            "https://example.com/api/series/seasons"
        );
    }

    #[test]
    fn test_token_scoping_does_not_leak() {
        let anonymous = CatalogClient::new(ClientConfig::new("https://example.com")).unwrap();
        let scoped = anonymous.with_access_token("abc");

        assert!(!anonymous.is_authenticated());
        assert!(scoped.is_authenticated());
        assert!(!scoped.without_access_token().is_authenticated());
    }
}
