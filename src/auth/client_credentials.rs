//! OAuth2 client credentials grant against the Microsoft identity platform.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::time::Duration as StdDuration;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::secret::Secret;
use super::token_cache::CachedToken;
use crate::config::Config;
use crate::error::AuthError;

/// HTTP request timeout.
const HTTP_TIMEOUT: StdDuration = StdDuration::from_secs(30);
/// HTTP connection timeout.
const HTTP_CONNECT_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// App-only credential. Exchanges the client id and secret for access tokens
/// and keeps the latest one until it is close to expiry.
pub struct ClientCredentials {
    client_id: String,
    client_secret: Secret,
    token_url: String,
    scopes: Vec<String>,
    refresh_before: Duration,
    http_client: reqwest::Client,
    cache: Mutex<Option<CachedToken>>,
}

impl ClientCredentials {
    /// Create a credential from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to create HTTP client")?;

        let refresh_before = refresh_margin(config.token.refresh_before_expiry_seconds)?;

        Ok(Self {
            client_id: config.oauth.client_id.clone(),
            client_secret: config.oauth.client_secret.clone(),
            token_url: config.token_url(),
            scopes: config.oauth.scopes.scopes.clone(),
            refresh_before,
            http_client,
            cache: Mutex::new(None),
        })
    }

    /// Return a valid access token, requesting a new one when the cached
    /// token is missing or about to expire.
    pub async fn access_token(&self) -> Result<Secret, AuthError> {
        let mut cache = self.cache.lock().await;
        let now = Utc::now();

        if let Some(cached) = cache.as_ref().filter(|c| c.is_usable(now, self.refresh_before)) {
            debug!("Using cached app-only token");
            return Ok(cached.token.clone());
        }

        let response = self.request_token().await?;
        let cached = CachedToken::issued(
            Secret::new(response.access_token),
            response.expires_in,
            now,
        );

        if let Some(remaining) = cached.time_until_expiry(now) {
            info!(
                "Acquired app-only token, expires at {} ({}s)",
                cached.expires_at,
                remaining.num_seconds()
            );
        }

        let token = cached.token.clone();
        *cache = Some(cached);
        Ok(token)
    }

    async fn request_token(&self) -> Result<TokenResponse, AuthError> {
        let scope = self.scopes.join(" ");
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose()),
            ("grant_type", "client_credentials"),
            ("scope", scope.as_str()),
        ];

        debug!("Requesting app-only token from {}", self.token_url);

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::TokenRequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Log error details for debugging (doesn't expose to user)
            let error_body = response.text().await.unwrap_or_default();
            error!("Token request failed: HTTP {} - {}", status, error_body);
            let reason = describe_failure(status.as_u16(), &error_body);
            return match status.as_u16() {
                400 | 401 => Err(AuthError::InvalidCredentials(reason)),
                _ => Err(AuthError::TokenRequestFailed(reason)),
            };
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))
    }
}

/// Convert the configured refresh margin, rejecting values chrono cannot hold.
fn refresh_margin(seconds: u64) -> Result<Duration> {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .context("token.refresh_before_expiry_seconds is too large")
}

/// Token response from the identity platform.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// OAuth2 error body, e.g. `{"error": "invalid_client", ...}`.
#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
}

/// Short reason for a failed token request: the status plus the OAuth2
/// error code when the body carries one.
fn describe_failure(status: u16, body: &str) -> String {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(parsed) => format!("HTTP {} ({})", status, parsed.error),
        Err(_) => format!("HTTP {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_parsing() {
        let body = r#"{"token_type":"Bearer","expires_in":3599,"ext_expires_in":3599,"access_token":"eyJ0eXAi"}"#;
        let parsed: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.access_token, "eyJ0eXAi");
        assert_eq!(parsed.expires_in, 3599);
    }

    #[test]
    fn test_describe_failure_with_oauth_error() {
        let body = r#"{"error":"invalid_client","error_description":"AADSTS7000215: Invalid client secret provided."}"#;
        assert_eq!(describe_failure(401, body), "HTTP 401 (invalid_client)");
    }

    #[test]
    fn test_describe_failure_without_body() {
        assert_eq!(describe_failure(503, "<html>unavailable</html>"), "HTTP 503");
    }

    #[test]
    fn test_refresh_margin_bounds() {
        assert_eq!(refresh_margin(300).unwrap(), Duration::seconds(300));
        assert!(refresh_margin(u64::MAX).is_err());
        assert!(refresh_margin(i64::MAX as u64).is_err());
    }

    #[test]
    fn test_oversized_refresh_margin_rejected_at_construction() {
        let mut config = Config::embedded().unwrap();
        config.token.refresh_before_expiry_seconds = 10_000_000_000_000_000;
        let err = match ClientCredentials::new(&config) {
            Ok(_) => panic!("oversized margin should be rejected"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("refresh_before_expiry_seconds"));
    }

    #[tokio::test]
    async fn test_cached_token_is_reused() {
        let mut config = Config::embedded().unwrap();
        config.apply_overrides(|key| match key {
            "AZURE_CLIENT_SECRET" => Some("secret".into()),
            // Unroutable host: any real request would fail the test.
            "AZURE_AUTHORITY_HOST" => Some("http://127.0.0.1:9".into()),
            _ => None,
        });
        let credential = ClientCredentials::new(&config).unwrap();
        *credential.cache.lock().await = Some(CachedToken::issued(
            Secret::new("cached-token".into()),
            3600,
            Utc::now(),
        ));

        let token = credential.access_token().await.unwrap();
        assert_eq!(token.expose(), "cached-token");
    }

    #[tokio::test]
    async fn test_unreachable_authority_is_request_failure() {
        let mut config = Config::embedded().unwrap();
        config.apply_overrides(|key| match key {
            "AZURE_CLIENT_SECRET" => Some("secret".into()),
            "AZURE_AUTHORITY_HOST" => Some("http://127.0.0.1:9".into()),
            _ => None,
        });
        let credential = ClientCredentials::new(&config).unwrap();

        let result = credential.access_token().await;
        assert!(matches!(result, Err(AuthError::TokenRequestFailed(_))));
    }
}
