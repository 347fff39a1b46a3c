use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, http::header::HeaderMap, web::Data};
use futures::future::{Ready, ready};

use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::engine::{Actor, LeaveEngine};
use crate::error::AppError;
use crate::models::{Claims, TokenType};

/// Identity carried by a verified access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.sub,
        }
    }
}

impl AuthUser {
    /// Role and department are re-read from the directory, not the token.
    pub fn actor(&self, engine: &LeaveEngine) -> Result<Actor, AppError> {
        engine.current_actor(self.user_id)
    }
}

/// Reads `Authorization: Bearer <token>` and checks it is a live access token.
pub fn access_claims(headers: &HeaderMap, secret: &str) -> Result<Claims, AppError> {
    let header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header encoding".to_string()))?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Authorization header must start with Bearer".to_string())
    })?;

    let claims = verify_token(token, secret)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    if claims.token_type != TokenType::Access {
        return Err(AppError::Unauthorized("Access token required".to_string()));
    }
    Ok(claims)
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // already verified by the auth middleware
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let Some(config) = req.app_data::<Data<Config>>() else {
            return ready(Err(
                AppError::Internal("Config missing from app data".to_string()).into(),
            ));
        };

        ready(
            access_claims(req.headers(), &config.jwt_secret)
                .map(AuthUser::from)
                .map_err(Into::into),
        )
    }
}
