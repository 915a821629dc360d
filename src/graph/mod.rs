//! Microsoft Graph integration.

pub mod client;
pub mod models;

pub use client::GraphClient;
pub use models::{ApplicationRecord, PageResult, UserRecord};
