//! Authenticated Microsoft Graph session.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use crate::auth::client_credentials::ClientCredentials;
use crate::config::Config;
use crate::directory::Directory;
use crate::error::DirectoryError;
use crate::graph::{ApplicationRecord, GraphClient, PageResult, UserRecord};

/// App-only session: a credential plus the Graph client that uses it.
pub struct GraphSession {
    credential: ClientCredentials,
    graph: GraphClient,
}

/// Build the session and prove the credentials by acquiring a first token.
///
/// Called once at startup. Any error here is fatal for the process.
pub async fn initialize(config: &Config) -> Result<GraphSession> {
    let credential = ClientCredentials::new(config)?;
    let graph = GraphClient::new(&config.api)?;

    credential
        .access_token()
        .await
        .context("Error initializing Graph for app auth")?;

    info!("App-only session established for client {}", config.oauth.client_id);

    Ok(GraphSession { credential, graph })
}

#[async_trait]
impl Directory for GraphSession {
    async fn fetch_access_token(&self) -> Result<String, DirectoryError> {
        let token = self.credential.access_token().await?;
        Ok(token.expose().to_string())
    }

    async fn fetch_users_page(&self) -> Result<PageResult<UserRecord>, DirectoryError> {
        let token = self.credential.access_token().await?;
        Ok(self.graph.list_users(token.expose()).await?)
    }

    async fn fetch_applications_page(
        &self,
    ) -> Result<PageResult<ApplicationRecord>, DirectoryError> {
        let token = self.credential.access_token().await?;
        Ok(self.graph.list_applications(token.expose()).await?)
    }
}
