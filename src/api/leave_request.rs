use crate::{
    auth::auth::AuthUser,
    engine::{LeaveEngine, RequestQuery},
    error::AppError,
    model::{
        leave_request::{LeaveApplication, LeaveRequest, RequestStatus},
        policy::{Policy, PolicyType},
        user::User,
    },
    utils::pagination::{PageParams, Paginated},
};
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct UserRef {
    #[schema(example = 3)]
    pub id: u64,
    #[schema(example = "Juan Pérez")]
    pub name: String,
    #[schema(example = "empleado@comfachoco.com")]
    pub email: String,
    pub department: Option<String>,
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            department: user.department.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PolicyRef {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Vacaciones Anuales")]
    pub name: String,
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
}

impl From<&Policy> for PolicyRef {
    fn from(policy: &Policy) -> Self {
        Self {
            id: policy.id,
            name: policy.name.clone(),
            policy_type: policy.policy_type,
        }
    }
}

/// Full view of a single request, including its decision trail.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveResponse {
    #[schema(example = 1)]
    pub id: u64,
    pub user: UserRef,
    pub policy: Policy,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-09", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = 5)]
    pub business_days: u32,
    #[schema(example = 5)]
    pub calendar_days: u32,
    pub reason: String,
    pub notes: Option<String>,
    pub half_day: bool,
    pub status: RequestStatus,
    pub approver: Option<UserRef>,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<u64>,
    pub approval_notes: Option<String>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<u64>,
    pub rejection_reason: Option<String>,
    pub rejection_notes: Option<String>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Row in the caller's own history.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveSummary {
    pub id: u64,
    pub policy: PolicyRef,
    #[schema(format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub business_days: u32,
    pub half_day: bool,
    pub status: RequestStatus,
    pub approver: Option<UserRef>,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

/// Row in an approver's queue.
#[derive(Debug, Serialize, ToSchema)]
pub struct PendingLeave {
    pub id: u64,
    pub user: UserRef,
    pub policy: PolicyRef,
    #[schema(format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub business_days: u32,
    pub half_day: bool,
    pub reason: String,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub items: Vec<LeaveSummary>,
    #[schema(example = 1)]
    pub total: usize,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 1)]
    pub pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl From<Paginated<LeaveSummary>> for LeaveListResponse {
    fn from(page: Paginated<LeaveSummary>) -> Self {
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            pages: page.pages,
            has_next: page.has_next,
            has_prev: page.has_prev,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaveListQuery {
    /// Filter by request status
    pub status: Option<RequestStatus>,
    /// Filter by leave type
    pub policy_type: Option<PolicyType>,
    /// Only requests ending on or after this date
    #[param(value_type = Option<String>, example = "2026-01-01")]
    pub date_from: Option<NaiveDate>,
    /// Only requests starting on or before this date
    #[param(value_type = Option<String>, example = "2026-12-31")]
    pub date_to: Option<NaiveDate>,
    /// Pagination page number (start with 1)
    pub page: Option<u32>,
    /// Items per page, at most 100
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApproveLeave {
    #[schema(example = "Enjoy your time off")]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RejectLeave {
    #[schema(example = "Team coverage is too thin that week")]
    pub reason: String,
    pub notes: Option<String>,
}

/// An empty body means no notes. Anything else must parse as [`ApproveLeave`].
fn approval_notes(body: &[u8]) -> Result<Option<String>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<ApproveLeave>(body)
        .map(|payload| payload.notes)
        .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))
}

fn detail(engine: &LeaveEngine, request: LeaveRequest) -> Result<LeaveResponse, AppError> {
    let owner = engine.user(request.user_id)?;
    let policy = engine.policy(request.policy_id)?;
    let approver = match request.approver_id {
        Some(id) => engine.directory().user(id)?,
        None => None,
    };

    Ok(LeaveResponse {
        id: request.id,
        user: UserRef::from(&owner),
        policy,
        start_date: request.start_date,
        end_date: request.end_date,
        business_days: request.business_days,
        calendar_days: request.calendar_days,
        reason: request.reason,
        notes: request.notes,
        half_day: request.half_day,
        status: request.status,
        approver: approver.as_ref().map(UserRef::from),
        created_at: request.created_at,
        updated_at: request.updated_at,
        approved_at: request.approved_at,
        approved_by: request.approved_by,
        approval_notes: request.approval_notes,
        rejected_at: request.rejected_at,
        rejected_by: request.rejected_by,
        rejection_reason: request.rejection_reason,
        rejection_notes: request.rejection_notes,
        cancelled_at: request.cancelled_at,
    })
}

/* =========================
Submit leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/requests",
    request_body(
        content = LeaveApplication,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted as pending", body = LeaveResponse),
        (status = 400, description = "Start date in the past or end before start", body = crate::error::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown or inactive policy", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid payload", body = crate::error::ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    engine: web::Data<LeaveEngine>,
    payload: web::Json<LeaveApplication>,
) -> actix_web::Result<impl Responder> {
    let request = engine.submit(&auth.actor(&engine)?, payload.into_inner())?;
    Ok(HttpResponse::Created().json(detail(&engine, request)?))
}

/// Caller's own requests, newest first
#[utoipa::path(
    get,
    path = "/api/v1/requests",
    params(LeaveListQuery),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 400, description = "date_from after date_to", body = crate::error::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    engine: web::Data<LeaveEngine>,
    query: web::Query<LeaveListQuery>,
) -> actix_web::Result<impl Responder> {
    let query = query.into_inner();
    let requests = engine.own_requests(
        &auth.actor(&engine)?,
        &RequestQuery {
            status: query.status,
            policy_type: query.policy_type,
            date_from: query.date_from,
            date_to: query.date_to,
        },
    )?;

    let mut items = Vec::with_capacity(requests.len());
    for request in requests {
        let policy = engine.policy(request.policy_id)?;
        let approver = match request.approver_id {
            Some(id) => engine.directory().user(id)?,
            None => None,
        };
        items.push(LeaveSummary {
            id: request.id,
            policy: PolicyRef::from(&policy),
            start_date: request.start_date,
            end_date: request.end_date,
            business_days: request.business_days,
            half_day: request.half_day,
            status: request.status,
            approver: approver.as_ref().map(UserRef::from),
            created_at: request.created_at,
        });
    }

    let page = Paginated::from_vec(
        items,
        PageParams {
            page: query.page,
            limit: query.limit,
        },
    );
    Ok(HttpResponse::Ok().json(LeaveListResponse::from(page)))
}

/// Requests awaiting a decision from the caller (manager or HR)
#[utoipa::path(
    get,
    path = "/api/v1/requests/pending",
    responses(
        (status = 200, description = "Pending requests, oldest first", body = Vec<PendingLeave>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
        (status = 403, description = "Manager or HR role required", body = crate::error::ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn pending_leaves(
    auth: AuthUser,
    engine: web::Data<LeaveEngine>,
) -> actix_web::Result<impl Responder> {
    let queue = engine.pending_queue(&auth.actor(&engine)?)?;

    let mut items = Vec::with_capacity(queue.len());
    for request in queue {
        let owner = engine.user(request.user_id)?;
        let policy = engine.policy(request.policy_id)?;
        items.push(PendingLeave {
            id: request.id,
            user: UserRef::from(&owner),
            policy: PolicyRef::from(&policy),
            start_date: request.start_date,
            end_date: request.end_date,
            business_days: request.business_days,
            half_day: request.half_day,
            reason: request.reason,
            created_at: request.created_at,
        });
    }

    Ok(HttpResponse::Ok().json(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/requests/{request_id}",
    params(
        ("request_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
        (status = 403, description = "Not the owner, their manager or HR", body = crate::error::ErrorBody),
        (status = 404, description = "Leave request not found", body = crate::error::ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    engine: web::Data<LeaveEngine>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let request = engine.request(&auth.actor(&engine)?, path.into_inner())?;
    Ok(HttpResponse::Ok().json(detail(&engine, request)?))
}

/* =========================
Approve leave (manager/HR)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/requests/{request_id}/approve",
    params(
        ("request_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    request_body(content = ApproveLeave, description = "Optional approval notes; the body may be empty"),
    responses(
        (status = 200, description = "Leave approved", body = LeaveResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
        (status = 403, description = "Forbidden", body = crate::error::ErrorBody),
        (status = 404, description = "Leave request not found", body = crate::error::ErrorBody),
        (status = 409, description = "Leave request already decided", body = crate::error::ErrorBody),
        (status = 422, description = "Malformed approval body", body = crate::error::ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    engine: web::Data<LeaveEngine>,
    path: web::Path<u64>,
    body: web::Bytes,
) -> actix_web::Result<impl Responder> {
    let notes = approval_notes(&body)?;
    let request = engine.approve(&auth.actor(&engine)?, path.into_inner(), notes)?;
    Ok(HttpResponse::Ok().json(detail(&engine, request)?))
}

/* =========================
Reject leave (manager/HR)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/requests/{request_id}/reject",
    params(
        ("request_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    request_body = RejectLeave,
    responses(
        (status = 200, description = "Leave rejected", body = LeaveResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
        (status = 403, description = "Forbidden", body = crate::error::ErrorBody),
        (status = 404, description = "Leave request not found", body = crate::error::ErrorBody),
        (status = 409, description = "Leave request already decided", body = crate::error::ErrorBody),
        (status = 422, description = "Missing rejection reason", body = crate::error::ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    engine: web::Data<LeaveEngine>,
    path: web::Path<u64>,
    payload: web::Json<RejectLeave>,
) -> actix_web::Result<impl Responder> {
    let RejectLeave { reason, notes } = payload.into_inner();
    let request = engine.reject(&auth.actor(&engine)?, path.into_inner(), reason, notes)?;
    Ok(HttpResponse::Ok().json(detail(&engine, request)?))
}

/// Withdraw one of the caller's pending requests
#[utoipa::path(
    post,
    path = "/api/v1/requests/{request_id}/cancel",
    params(
        ("request_id" = u64, Path, description = "ID of the leave request to cancel")
    ),
    responses(
        (status = 200, description = "Leave cancelled", body = LeaveResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
        (status = 403, description = "Only the requester can cancel", body = crate::error::ErrorBody),
        (status = 404, description = "Leave request not found", body = crate::error::ErrorBody),
        (status = 409, description = "Leave request already decided", body = crate::error::ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    engine: web::Data<LeaveEngine>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let request = engine.cancel(&auth.actor(&engine)?, path.into_inner())?;
    Ok(HttpResponse::Ok().json(detail(&engine, request)?))
}
