use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use tracing::debug;

use crate::auth::auth::{AuthUser, access_claims};
use crate::config::Config;
use crate::error::AppError;

pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| AppError::Internal("App config missing".to_string()))?;

    let claims = match access_claims(req.headers(), &config.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(path = %req.path(), error = %e, "Rejected unauthenticated request");
            let resp = e.error_response();
            return Ok(req.into_response(resp));
        }
    };

    let user = AuthUser::from(claims);
    debug!(user_id = user.user_id, email = %user.email, path = %req.path(), "Authenticated request");
    req.extensions_mut().insert(user);

    next.call(req).await
}
