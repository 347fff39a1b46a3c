use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::Config,
    engine::{EngineMetrics, LeaveEngine},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct Health {
    #[schema(example = "ok", value_type = String)]
    pub status: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DetailedHealth {
    #[schema(example = "ok", value_type = String)]
    pub status: &'static str,
    #[schema(example = "0.1.0", value_type = String)]
    pub version: &'static str,
    #[schema(example = "development")]
    pub environment: String,
    #[schema(format = "date-time", value_type = String)]
    pub timestamp: DateTime<Utc>,
    pub metrics: EngineMetrics,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "Service is up", body = Health)),
    tag = "Health"
)]
pub async fn healthz() -> impl Responder {
    HttpResponse::Ok().json(Health { status: "ok" })
}

/// Store counters; degrades to 503 if the tables cannot be read
#[utoipa::path(
    get,
    path = "/api/v1/health/detailed",
    responses(
        (status = 200, description = "Service and store are healthy", body = DetailedHealth),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Health"
)]
pub async fn detailed_health(
    engine: web::Data<LeaveEngine>,
    config: web::Data<Config>,
) -> impl Responder {
    match engine.metrics() {
        Ok(metrics) => HttpResponse::Ok().json(DetailedHealth {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            environment: config.environment.clone(),
            timestamp: engine.clock().now(),
            metrics,
        }),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({ "status": "unhealthy" }))
        }
    }
}
