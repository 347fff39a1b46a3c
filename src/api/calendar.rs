use actix_web::{HttpResponse, Responder, web};

use crate::{
    auth::auth::AuthUser,
    engine::{LeaveEngine, calendar::CalendarQuery},
};

/// Team absences overlapping a date window
#[utoipa::path(
    get,
    path = "/api/v1/calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Absences and per-department/status counts", body = crate::engine::calendar::CalendarReport),
        (status = 400, description = "start_date after end_date", body = crate::error::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
pub async fn team_calendar(
    auth: AuthUser,
    engine: web::Data<LeaveEngine>,
    query: web::Query<CalendarQuery>,
) -> actix_web::Result<impl Responder> {
    let report = engine.calendar(&auth.actor(&engine)?, &query)?;
    Ok(HttpResponse::Ok().json(report))
}
