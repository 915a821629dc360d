//! Microsoft Graph data models for the directory listings.

use serde::Deserialize;

/// One page of a Graph collection response.
#[derive(Debug, Clone, Deserialize)]
pub struct PageResult<T> {
    /// Records on this page, in server order.
    #[serde(rename = "value")]
    pub items: Vec<T>,

    /// Continuation marker. Present when the server holds more records.
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

impl<T> PageResult<T> {
    #[cfg(test)]
    pub fn new(items: Vec<T>, next_link: Option<String>) -> Self {
        Self { items, next_link }
    }

    /// Whether more results are available server-side.
    pub fn has_more(&self) -> bool {
        self.next_link.is_some()
    }
}

/// A directory user from `GET /users`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub display_name: String,
    pub id: String,
    /// Users without a mailbox come back with `"mail": null`.
    #[serde(default)]
    pub mail: Option<String>,
}

/// An application registration from `GET /applications`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub display_name: String,
    pub id: String,
    pub created_date_time: String,
}
