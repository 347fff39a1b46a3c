use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

use crate::error::AppError;
use crate::model::user::User;
use crate::models::{Claims, TokenType};

fn now() -> usize {
    usize::try_from(Utc::now().timestamp()).unwrap_or_default()
}

fn claims_for(user: &User, token_type: TokenType, ttl: usize) -> Claims {
    Claims {
        user_id: user.id,
        sub: user.email.clone(),
        role: user.role,
        department: user.department.clone(),
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type,
    }
}

fn sign(claims: &Claims, secret: &str) -> Result<String, AppError> {
    Ok(encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

pub fn generate_access_token(user: &User, secret: &str, ttl: usize) -> Result<String, AppError> {
    sign(&claims_for(user, TokenType::Access, ttl), secret)
}

/// Returns the claims too so the caller can remember the `jti`.
pub fn generate_refresh_token(
    user: &User,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), AppError> {
    let claims = claims_for(user, TokenType::Refresh, ttl);
    let token = sign(&claims, secret)?;
    Ok((token, claims))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
