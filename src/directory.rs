//! Remote capabilities the menu depends on.

use async_trait::async_trait;

use crate::error::DirectoryError;
use crate::graph::{ApplicationRecord, PageResult, UserRecord};

/// Read access to the directory service.
///
/// Implemented by [`crate::session::GraphSession`] for Microsoft Graph and by
/// in-memory fakes in tests.
#[async_trait]
pub trait Directory: Send + Sync {
    /// The current app-only access token, in raw form.
    async fn fetch_access_token(&self) -> Result<String, DirectoryError>;

    /// First page of users.
    async fn fetch_users_page(&self) -> Result<PageResult<UserRecord>, DirectoryError>;

    /// First page of application registrations.
    async fn fetch_applications_page(
        &self,
    ) -> Result<PageResult<ApplicationRecord>, DirectoryError>;
}
