use actix_web::{HttpResponse, Responder, web};

use crate::{auth::auth::AuthUser, engine::LeaveEngine};

/// Active leave policies employees can apply against
#[utoipa::path(
    get,
    path = "/api/v1/policies",
    responses(
        (status = 200, description = "Active policies ordered by id", body = Vec<crate::model::policy::Policy>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Policy"
)]
pub async fn list_policies(
    _auth: AuthUser,
    engine: web::Data<LeaveEngine>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(engine.active_policies()?))
}
