use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    api::leave_request::UserRef,
    auth::auth::AuthUser,
    engine::{LeaveEngine, balance::LeaveBalance},
    models::UserResponse,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: UserResponse,
    /// Who will be asked to approve the caller's requests
    pub manager: Option<UserRef>,
    /// Current-year vacation usage, absent when no vacation policy is active
    pub vacation_balance: Option<LeaveBalance>,
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Caller's profile, approver and vacation balance", body = MeResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "User"
)]
pub async fn me(
    auth: AuthUser,
    engine: web::Data<LeaveEngine>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor(&engine)?;
    let user = engine.user(actor.user_id)?;

    let manager = engine.resolve_approver(&user)?;
    let vacation_balance = engine.vacation_balance(user.id)?;

    Ok(HttpResponse::Ok().json(MeResponse {
        user: UserResponse::from(&user),
        manager: manager.as_ref().map(UserRef::from),
        vacation_balance,
    }))
}
