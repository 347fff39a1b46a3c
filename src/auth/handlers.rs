use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, info, instrument, warn};

use crate::{
    auth::{
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::{check_strength, hash_password, verify_password},
        refresh_store::RefreshTokenStore,
    },
    config::Config,
    engine::LeaveEngine,
    error::AppError,
    model::{role::Role, user::{NewUser, User}},
    models::{LoginRequest, RefreshRequest, RegisterRequest, TokenResponse, TokenType, UserResponse},
    utils::{email_cache, email_filter},
};

/// true  => email AVAILABLE
/// false => email TAKEN
pub async fn is_email_available(email: &str, engine: &LeaveEngine) -> Result<bool, AppError> {
    // 1️⃣ Cuckoo filter: fast negative
    if !email_filter::might_exist(email) {
        return Ok(true);
    }

    // 2️⃣ Moka cache: fast positive
    if email_cache::is_taken(email).await {
        return Ok(false);
    }

    // 3️⃣ Directory fallback
    let taken = engine.directory().user_by_email(email)?.is_some();
    if taken {
        email_cache::mark_taken(email).await;
    }
    Ok(!taken)
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

/// Issue an access/refresh pair and remember the refresh `jti`.
async fn issue_tokens(
    user: &User,
    config: &Config,
    tokens: &RefreshTokenStore,
) -> Result<TokenResponse, AppError> {
    let access_token = generate_access_token(user, &config.jwt_secret, config.access_token_ttl)?;
    let (refresh_token, refresh_claims) =
        generate_refresh_token(user, &config.jwt_secret, config.refresh_token_ttl)?;

    debug!(user_id = user.id, jti = %refresh_claims.jti, "Storing refresh token");
    tokens.remember(&refresh_claims.jti, user.id).await;

    Ok(TokenResponse {
        access_token,
        refresh_token,
        token_type: "bearer",
        expires_in: config.access_token_ttl,
        user: UserResponse::from(user),
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 409, description = "Email or employee code already registered", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid email, name or password", body = crate::error::ErrorBody)
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_register", skip_all, fields(email = %payload.email))]
pub async fn register(
    payload: web::Json<RegisterRequest>,
    engine: web::Data<LeaveEngine>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    let email = required(&payload.email, "email")?.to_lowercase();
    if !email.contains('@') {
        return Err(AppError::Validation("email must be a valid address".to_string()).into());
    }
    let name = required(&payload.name, "name")?;
    let employee_code = required(&payload.employee_code, "employee_code")?;
    check_strength(&payload.password)?;

    if !is_email_available(&email, &engine).await? {
        info!("Registration refused: email taken");
        return Err(AppError::Conflict("Email already registered".to_string()).into());
    }

    let password = payload.password;
    let password_hash = web::block(move || hash_password(&password))
        .await
        .map_err(AppError::from)??;

    let user = engine.directory().insert(
        NewUser {
            email,
            name,
            employee_code,
            department: payload.department.filter(|d| !d.trim().is_empty()),
            position: payload.position.filter(|p| !p.trim().is_empty()),
            role: Role::Employee,
            manager_id: None,
            password_hash,
        },
        engine.clock().now(),
    )?;

    email_filter::insert(&user.email);
    email_cache::mark_taken(&user.email).await;

    info!(user_id = user.id, "User registered");
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody)
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip_all, fields(email = %payload.email))]
pub async fn login(
    payload: web::Json<LoginRequest>,
    engine: web::Data<LeaveEngine>,
    config: web::Data<Config>,
    tokens: web::Data<RefreshTokenStore>,
) -> actix_web::Result<impl Responder> {
    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());
    let payload = payload.into_inner();

    let user = match engine.directory().user_by_email(payload.email.trim())? {
        Some(user) if user.is_active => user,
        Some(_) => {
            info!("Invalid credentials: account inactive");
            return Err(invalid().into());
        }
        None => {
            info!("Invalid credentials: user not found");
            return Err(invalid().into());
        }
    };

    let password = payload.password;
    let stored = user.password_hash.clone();
    let verified = web::block(move || verify_password(&password, &stored))
        .await
        .map_err(AppError::from)?;
    if let Err(e) = verified {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(invalid().into());
    }

    let response = issue_tokens(&user, &config, &tokens).await?;
    info!(user_id = user.id, "Login successful");
    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Rotated token pair", body = TokenResponse),
        (status = 401, description = "Refresh token invalid, expired or already used", body = crate::error::ErrorBody)
    ),
    tag = "Auth"
)]
pub async fn refresh_token(
    payload: web::Json<RefreshRequest>,
    engine: web::Data<LeaveEngine>,
    config: web::Data<Config>,
    tokens: web::Data<RefreshTokenStore>,
) -> actix_web::Result<impl Responder> {
    let rejected = || AppError::Unauthorized("Invalid refresh token".to_string());

    let claims = verify_token(&payload.refresh_token, &config.jwt_secret).map_err(|_| rejected())?;
    if claims.token_type != TokenType::Refresh {
        return Err(rejected().into());
    }

    // revoke the old jti before anything else so it can never be replayed
    match tokens.consume(&claims.jti).await {
        Some(owner) if owner == claims.user_id => {}
        _ => {
            warn!(user_id = claims.user_id, jti = %claims.jti, "Refresh with revoked or unknown token");
            return Err(rejected().into());
        }
    }

    let user = engine
        .directory()
        .user(claims.user_id)?
        .filter(|u| u.is_active)
        .ok_or_else(rejected)?;

    let response = issue_tokens(&user, &config, &tokens).await?;
    debug!(user_id = user.id, "Refresh token rotated");
    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    request_body(content = RefreshRequest, description = "Refresh token to revoke; the body may be omitted"),
    responses(
        (status = 204, description = "Logged out (also when the token was unknown)")
    ),
    tag = "Auth"
)]
pub async fn logout(
    payload: Option<web::Json<RefreshRequest>>,
    config: web::Data<Config>,
    tokens: web::Data<RefreshTokenStore>,
) -> impl Responder {
    let Some(payload) = payload else {
        return HttpResponse::NoContent().finish();
    };

    // only refresh tokens can be revoked; anything else is a no-op
    if let Ok(claims) = verify_token(&payload.refresh_token, &config.jwt_secret) {
        if claims.token_type == TokenType::Refresh && tokens.consume(&claims.jti).await.is_some() {
            info!(user_id = claims.user_id, "Refresh token revoked");
        }
    }

    HttpResponse::NoContent().finish()
}
