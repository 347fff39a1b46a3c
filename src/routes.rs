use crate::{
    api::{
        calendar, health, json_error_handler, leave_request, path_error_handler, policy,
        query_error_handler, user,
    },
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{
    middleware::{Condition, from_fn},
    web,
};
use anyhow::anyhow;
use std::sync::Arc;

type Limiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiters, built once and shared by every worker.
#[derive(Clone)]
pub struct RateLimiters {
    enabled: bool,
    auth: Arc<Limiter>,
    default: Arc<Limiter>,
}

impl RateLimiters {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            enabled: config.rate_limit_enabled,
            auth: Arc::new(build_limiter(config.rate_auth_per_min)?),
            default: Arc::new(build_limiter(config.rate_default_per_min)?),
        })
    }
}

fn build_limiter(requests_per_min: u32) -> anyhow::Result<Limiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min} requests per minute"))?;
    Ok(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiters: &RateLimiters) {
    cfg.route("/healthz", web::get().to(health::healthz));

    cfg.service(
        web::scope(&config.api_prefix)
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            // Public routes
            .service(
                web::scope("/auth")
                    .wrap(Condition::new(limiters.enabled, limiters.auth.clone()))
                    .route("/register", web::post().to(handlers::register))
                    .route("/login", web::post().to(handlers::login))
                    .route("/refresh", web::post().to(handlers::refresh_token))
                    .route("/logout", web::post().to(handlers::logout)),
            )
            .route("/health/detailed", web::get().to(health::detailed_health))
            // Protected routes
            .service(
                web::scope("")
                    .wrap(from_fn(auth_middleware)) // authentication
                    .wrap(Condition::new(limiters.enabled, limiters.default.clone())) // rate limiting
                    .route("/users/me", web::get().to(user::me))
                    .route("/policies", web::get().to(policy::list_policies))
                    .route("/calendar", web::get().to(calendar::team_calendar))
                    .service(
                        web::scope("/requests")
                            // /requests
                            .service(
                                web::resource("")
                                    .route(web::post().to(leave_request::create_leave))
                                    .route(web::get().to(leave_request::leave_list)),
                            )
                            // /requests/pending, ahead of /{id}
                            .service(
                                web::resource("/pending")
                                    .route(web::get().to(leave_request::pending_leaves)),
                            )
                            // /requests/{id}
                            .service(
                                web::resource("/{id}").route(web::get().to(leave_request::get_leave)),
                            )
                            .service(
                                web::resource("/{id}/approve")
                                    .route(web::post().to(leave_request::approve_leave)),
                            )
                            .service(
                                web::resource("/{id}/reject")
                                    .route(web::post().to(leave_request::reject_leave)),
                            )
                            .service(
                                web::resource("/{id}/cancel")
                                    .route(web::post().to(leave_request::cancel_leave)),
                            ),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days, single use)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /auth/refresh { refresh_token }
//       └─ returns a new pair, old refresh token revoked
