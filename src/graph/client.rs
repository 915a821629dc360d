//! Microsoft Graph API client for the directory listings.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use super::models::{ApplicationRecord, PageResult, UserRecord};
use crate::config::ApiConfig;
use crate::error::ApiError;

/// HTTP request timeout.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// HTTP connection timeout.
const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_FIELDS: &str = "displayName,id,mail";
const APPLICATION_FIELDS: &str = "displayName,id,createdDateTime";

/// Microsoft Graph API client.
pub struct GraphClient {
    http_client: Client,
    base_url: Url,
    page_size: u32,
}

impl GraphClient {
    /// Create a new Graph client.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(&config.graph_base_url)
            .with_context(|| format!("Invalid Graph base URL: {}", config.graph_base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Invalid Graph base URL: {}", config.graph_base_url));
        }

        Ok(Self {
            http_client,
            base_url,
            page_size: config.page_size,
        })
    }

    /// Fetch the first page of users, ordered by display name.
    pub async fn list_users(&self, access_token: &str) -> Result<PageResult<UserRecord>, ApiError> {
        self.get_page(self.users_url(), access_token).await
    }

    /// Fetch the first page of application registrations.
    pub async fn list_applications(
        &self,
        access_token: &str,
    ) -> Result<PageResult<ApplicationRecord>, ApiError> {
        self.get_page(self.applications_url(), access_token).await
    }

    fn users_url(&self) -> Url {
        let top = self.page_size.to_string();
        let mut url = self.endpoint("users");
        url.query_pairs_mut()
            .append_pair("$select", USER_FIELDS)
            .append_pair("$top", &top)
            .append_pair("$orderby", "displayName");
        url
    }

    fn applications_url(&self) -> Url {
        let top = self.page_size.to_string();
        let mut url = self.endpoint("applications");
        url.query_pairs_mut()
            .append_pair("$select", APPLICATION_FIELDS)
            .append_pair("$top", &top);
        url
    }

    fn endpoint(&self, resource: &str) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(resource);
        }
        url
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        url: Url,
        access_token: &str,
    ) -> Result<PageResult<T>, ApiError> {
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ApiError::GraphRequestFailed(e.to_string()))?;

        let status = response.status();
        match status.as_u16() {
            200 => {
                let page: PageResult<T> = response
                    .json()
                    .await
                    .map_err(|e| ApiError::ParseFailed(e.to_string()))?;
                debug!(
                    "Received {} records (more available: {})",
                    page.items.len(),
                    page.has_more()
                );
                Ok(page)
            }
            401 => Err(ApiError::Unauthorized),
            403 => Err(ApiError::Forbidden),
            429 => Err(ApiError::RateLimited),
            // Don't expose raw API error details - just log them
            code => {
                let body = response.text().await.unwrap_or_default();
                error!("Graph request failed: HTTP {} - {}", status, body);
                Err(ApiError::GraphRequestFailed(format!("HTTP {}", code)))
            }
        }
    }
}
