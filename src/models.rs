use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;
use crate::model::user::User;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "laura@comfachoco.com", format = "email")]
    pub email: String,
    #[schema(example = "Laura Mosquera")]
    pub name: String,
    #[schema(example = "EMP042")]
    pub employee_code: String,
    #[schema(example = "Tecnología")]
    pub department: Option<String>,
    #[schema(example = "Analista")]
    pub position: Option<String>,
    /// At least 8 characters with an uppercase letter and a digit
    #[schema(example = "Secret123")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "empleado@comfachoco.com", format = "email")]
    pub email: String,
    #[schema(example = "Demo1234")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Public view of a directory entry. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 3)]
    pub id: u64,
    #[schema(example = "empleado@comfachoco.com")]
    pub email: String,
    #[schema(example = "Juan Pérez")]
    pub name: String,
    #[schema(example = "EMP001")]
    pub employee_code: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub manager_id: Option<u64>,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            employee_code: user.employee_code.clone(),
            department: user.department.clone(),
            position: user.position.clone(),
            role: user.role,
            is_active: user.is_active,
            manager_id: user.manager_id,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[schema(example = "bearer", value_type = String)]
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    #[schema(example = 900)]
    pub expires_in: usize,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// email
    pub sub: String,
    pub role: Role,
    pub department: Option<String>,
    pub exp: usize,
    pub jti: String,
    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TokenType {
    Access,
    Refresh,
}
