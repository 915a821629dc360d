//! In-memory cache for the app-only access token.

use chrono::{DateTime, Duration, Utc};

use super::secret::Secret;

/// Upper bound applied to `expires_in` values from the identity platform.
const MAX_LIFETIME_SECONDS: u64 = 24 * 60 * 60;

/// An issued access token and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub token: Secret,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Build a cache entry from an `expires_in` value relative to `issued_at`.
    /// Lifetimes above one day are clamped.
    pub fn issued(token: Secret, expires_in_seconds: u64, issued_at: DateTime<Utc>) -> Self {
        let lifetime = Duration::seconds(expires_in_seconds.min(MAX_LIFETIME_SECONDS) as i64);
        Self {
            token,
            expires_at: issued_at
                .checked_add_signed(lifetime)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// True if the token is still valid for more than `margin` at `now`.
    /// A margin reaching past the representable range means "never usable".
    pub fn is_usable(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.expires_at
            .checked_sub_signed(margin)
            .is_some_and(|refresh_at| refresh_at > now)
    }

    /// Remaining lifetime at `now`, or `None` once expired.
    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Option<Duration> {
        (self.expires_at > now).then(|| self.expires_at - now)
    }
}
