//! App-only authentication against the Microsoft identity platform.
//!
//! Provides the OAuth2 client credentials grant with an in-memory token cache.

pub mod client_credentials;
pub mod secret;
pub mod token_cache;
