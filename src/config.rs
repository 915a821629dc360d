//! Configuration loading and management.
//!
//! Loads configuration from embedded config.toml with environment variable overrides.
//! Call [`load_env_files`] first so `.env.local` and `.env` can supply the overrides.

use serde::Deserialize;
use std::env;

use crate::auth::secret::Secret;
use crate::error::AppError;

/// Embedded configuration file content.
const CONFIG_TOML: &str = include_str!("../config.toml");

const PLACEHOLDER_CLIENT_ID: &str = "YOUR_AZURE_AD_CLIENT_ID";
const PLACEHOLDER_TENANT: &str = "YOUR_TENANT_ID";

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub oauth: OAuthConfig,
    pub api: ApiConfig,
    pub token: TokenConfig,
    #[serde(default)]
    pub menu: MenuConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthConfig {
    pub client_id: String,
    pub tenant: String,
    pub authority_host: String,
    pub scopes: ScopesConfig,
    /// Only ever populated from `AZURE_CLIENT_SECRET`.
    #[serde(skip)]
    pub client_secret: Secret,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScopesConfig {
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub graph_base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    25
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    pub refresh_before_expiry_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuConfig {
    /// Terminate on the first failed remote call. `false` re-prompts instead.
    #[serde(default = "default_exit_on_error")]
    pub exit_on_error: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            exit_on_error: default_exit_on_error(),
        }
    }
}

fn default_exit_on_error() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// Load configuration from the embedded config.toml and the process environment.
    pub fn load() -> Result<Self, AppError> {
        let mut config = Self::embedded()?;
        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parse the embedded configuration without any overrides.
    pub fn embedded() -> Result<Self, AppError> {
        toml::from_str(CONFIG_TOML)
            .map_err(|e| AppError::Config(format!("Failed to parse embedded config.toml: {}", e)))
    }

    /// Apply environment variable overrides using `lookup` to resolve names.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(client_id) = lookup("AZURE_CLIENT_ID") {
            self.oauth.client_id = client_id;
        }

        if let Some(tenant) = lookup("AZURE_TENANT_ID") {
            self.oauth.tenant = tenant;
        }

        if let Some(secret) = lookup("AZURE_CLIENT_SECRET") {
            self.oauth.client_secret = Secret::new(secret);
        }

        if let Some(host) = lookup("AZURE_AUTHORITY_HOST") {
            self.oauth.authority_host = host;
        }

        if let Some(base_url) = lookup("GRAPH_BASE_URL") {
            self.api.graph_base_url = base_url;
        }

        if let Some(log_level) = lookup("RUST_LOG") {
            self.logging.level = log_level;
        }
    }

    /// Validate that required configuration is present.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.oauth.client_id.is_empty() || self.oauth.client_id == PLACEHOLDER_CLIENT_ID {
            return Err(AppError::Config(
                "Azure AD client_id not configured. Set AZURE_CLIENT_ID in the environment or .env"
                    .into(),
            ));
        }

        if self.oauth.tenant.is_empty() || self.oauth.tenant == PLACEHOLDER_TENANT {
            return Err(AppError::Config(
                "Azure AD tenant not configured. Set AZURE_TENANT_ID in the environment or .env"
                    .into(),
            ));
        }

        if self.oauth.client_secret.is_empty() {
            return Err(AppError::Config(
                "Client secret not configured. Set AZURE_CLIENT_SECRET in the environment or .env"
                    .into(),
            ));
        }

        if self.api.page_size == 0 {
            return Err(AppError::Config("api.page_size must be at least 1".into()));
        }

        Ok(())
    }

    /// Get the token URL for the configured tenant.
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.oauth.authority_host.trim_end_matches('/'),
            self.oauth.tenant
        )
    }
}

/// Load `.env.local` then `.env` into the process environment. Neither file is
/// required. Variables already set are never overwritten, so `.env.local` wins
/// over `.env`.
pub fn load_env_files() {
    for name in [".env.local", ".env"] {
        if let Err(e) = dotenvy::from_filename(name) {
            // Missing files are expected - only report unreadable ones
            if !e.not_found() {
                eprintln!("Warning: Failed to load {} file: {}", name, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn configured() -> Config {
        let mut config = Config::embedded().unwrap();
        let vars: HashMap<&str, &str> = [
            ("AZURE_CLIENT_ID", "test-client"),
            ("AZURE_TENANT_ID", "test-tenant"),
            ("AZURE_CLIENT_SECRET", "s3cret"),
        ]
        .into_iter()
        .collect();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        config
    }

    #[test]
    fn test_config_parsing() {
        let config = Config::embedded().unwrap();
        assert_eq!(config.api.page_size, 25);
        assert!(config.menu.exit_on_error);
        assert_eq!(
            config.oauth.scopes.scopes,
            vec!["https://graph.microsoft.com/.default".to_string()]
        );
    }

    #[test]
    fn test_menu_section_defaults_to_fatal() {
        let menu: MenuConfig = toml::from_str("").unwrap();
        assert!(menu.exit_on_error);
        assert!(MenuConfig::default().exit_on_error);

        let menu: MenuConfig = toml::from_str("exit_on_error = false").unwrap();
        assert!(!menu.exit_on_error);
    }

    #[test]
    fn test_placeholders_rejected() {
        let config = Config::embedded().unwrap();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_missing_secret_rejected() {
        let mut config = Config::embedded().unwrap();
        config.apply_overrides(|key| match key {
            "AZURE_CLIENT_ID" => Some("id".into()),
            "AZURE_TENANT_ID" => Some("tenant".into()),
            _ => None,
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("AZURE_CLIENT_SECRET"));
    }

    #[test]
    fn test_overrides_and_urls() {
        let config = configured();
        assert!(config.validate().is_ok());
        assert_eq!(config.oauth.client_secret.expose(), "s3cret");
        assert_eq!(
            config.token_url(),
            "https://login.microsoftonline.com/test-tenant/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_authority_host_trailing_slash() {
        let mut config = configured();
        config.apply_overrides(|key| {
            (key == "AZURE_AUTHORITY_HOST").then(|| "https://login.example.test/".to_string())
        });
        assert_eq!(
            config.token_url(),
            "https://login.example.test/test-tenant/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_secret_not_in_debug_output() {
        let config = configured();
        assert!(!format!("{:?}", config).contains("s3cret"));
    }
}
