use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use std::sync::Arc;

mod api;
mod auth;
mod clock;
mod config;
mod docs;
mod engine;
mod error;
mod model;
mod models;
mod routes;
mod store;
mod utils;

#[cfg(test)]
mod test_support;

use auth::password::hash_password;
use auth::refresh_store::RefreshTokenStore;
use clock::{Clock, SystemClock};
use config::Config;
use engine::LeaveEngine;
use routes::RateLimiters;
use store::memory::{MemoryDirectory, MemoryPolicyCatalog, MemoryRequestStore};
use store::seed::{default_policies, seed_directory};

use crate::docs::ApiDoc;
use crate::utils::{email_cache, email_filter};
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the seeded in-memory engine the server runs on.
fn bootstrap(config: &Config) -> anyhow::Result<LeaveEngine> {
    let clock = Arc::new(SystemClock);
    let directory = Arc::new(MemoryDirectory::default());

    let seed_hash = hash_password(&config.seed_password)?;
    seed_directory(directory.as_ref(), &seed_hash, clock.now())?;

    Ok(LeaveEngine::new(
        directory,
        Arc::new(MemoryPolicyCatalog::new(default_policies())),
        Arc::new(MemoryRequestStore::default()),
        clock,
    )
    .with_policy_limits(config.enforce_policy_limits))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let level: tracing::Level = config
        .log_level
        .parse()
        .with_context(|| format!("LOG_LEVEL has an invalid value: {:?}", config.log_level))?;

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(environment = %config.environment, "Server starting...");

    let engine = Data::new(bootstrap(&config)?);
    if config.enforce_policy_limits {
        info!("Policy limits enforced at submission");
    }

    email_filter::warmup_email_filter(engine.directory(), 100)?;

    let engine_for_cache_warmup = engine.clone();
    actix_web::rt::spawn(async move {
        // Warm up accounts created in the last 30 days in batches of 250
        let directory = engine_for_cache_warmup.directory();
        if let Err(e) = email_cache::warmup_email_cache(directory, 30, 250).await {
            warn!(error = %e, "Failed to warmup email cache");
        }
    });

    let limiters = RateLimiters::from_config(&config)?;
    let tokens = Data::new(RefreshTokenStore::new(config.refresh_token_ttl));
    let config_data = Data::new(config.clone());
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(engine.clone())
            .app_data(config_data.clone())
            .app_data(tokens.clone())
            // auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, &config, &limiters))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
