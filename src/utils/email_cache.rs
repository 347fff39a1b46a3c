use anyhow::Result;
use chrono::{Duration as ChronoDuration, Utc};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::time::Duration;

use crate::store::Directory;

/// Emails known to be taken. Only positives are stored.
pub static EMAIL_CACHE: Lazy<Cache<String, bool>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(500_000)
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

pub async fn mark_taken(email: &str) {
    EMAIL_CACHE.insert(email.trim().to_lowercase(), true).await;
}

pub async fn is_taken(email: &str) -> bool {
    EMAIL_CACHE
        .get(&email.trim().to_lowercase())
        .await
        .unwrap_or(false)
}

async fn batch_mark(emails: &[String]) {
    let futures: Vec<_> = emails
        .iter()
        .map(|e| EMAIL_CACHE.insert(e.to_lowercase(), true))
        .collect();

    futures::future::join_all(futures).await;
}

/// Preload emails of accounts created in the last `days` days.
pub async fn warmup_email_cache(
    directory: &dyn Directory,
    days: i64,
    batch_size: usize,
) -> Result<()> {
    let since = Utc::now() - ChronoDuration::days(days);
    let recent: Vec<String> = directory
        .users()?
        .into_iter()
        .filter(|u| u.created_at >= since)
        .map(|u| u.email)
        .collect();

    for batch in recent.chunks(batch_size.max(1)) {
        batch_mark(batch).await;
    }

    log::info!(
        "Email cache warmup complete: {} recent users (last {} days)",
        recent.len(),
        days
    );
    Ok(())
}
