use std::time::Duration;

use moka::future::Cache;

/// Live refresh tokens keyed by `jti`. Entries expire with the token itself.
#[derive(Clone)]
pub struct RefreshTokenStore {
    tokens: Cache<String, u64>,
}

impl RefreshTokenStore {
    pub fn new(ttl_secs: usize) -> Self {
        Self {
            tokens: Cache::builder()
                .max_capacity(100_000)
                .time_to_live(Duration::from_secs(ttl_secs as u64))
                .build(),
        }
    }

    pub async fn remember(&self, jti: &str, user_id: u64) {
        self.tokens.insert(jti.to_string(), user_id).await;
    }

    /// Takes the token out of the store; a second call with the same `jti`
    /// finds nothing, which is what makes rotation single-use.
    pub async fn consume(&self, jti: &str) -> Option<u64> {
        self.tokens.remove(jti).await
    }
}
