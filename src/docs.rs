use crate::api::health::{DetailedHealth, Health};
use crate::api::leave_request::{
    ApproveLeave, LeaveListResponse, LeaveResponse, LeaveSummary, PendingLeave, PolicyRef,
    RejectLeave, UserRef,
};
use crate::api::user::MeResponse;
use crate::engine::EngineMetrics;
use crate::engine::balance::LeaveBalance;
use crate::engine::calendar::{Absence, AbsentUser, CalendarPeriod, CalendarReport, CalendarSummary};
use crate::error::{ErrorBody, ErrorDetail};
use crate::model::leave_request::{LeaveApplication, RequestStatus};
use crate::model::policy::{Policy, PolicyType};
use crate::model::role::Role;
use crate::models::{LoginRequest, RefreshRequest, RegisterRequest, TokenResponse, UserResponse};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Portal API",
        version = "1.0.0",
        description = r#"
## Vacation & Leave Self-Service Portal

Employees apply for leave against company policies, managers and HR decide on
pending requests, and everyone can see who is out on the team calendar.

### 🔹 Key Features
- **Leave Requests**
  - Submit, list, view and cancel your own requests
  - Business days are counted Monday to Friday
- **Approvals**
  - Managers review their department's queue, HR admins review everyone's
- **Team Calendar**
  - Absences overlapping a date window with per-department counts
- **Balances**
  - Used, pending and remaining vacation days for the current year

### 🔐 Security
Protected endpoints need a **JWT Bearer** access token from `/api/v1/auth/login`.
Refresh tokens are single use and rotate on every `/api/v1/auth/refresh`.

### 📦 Errors
Every failure returns `{"error": {"code": "...", "message": "..."}}`.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::pending_leaves,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::cancel_leave,

        crate::api::policy::list_policies,
        crate::api::user::me,
        crate::api::calendar::team_calendar,

        crate::api::health::healthz,
        crate::api::health::detailed_health
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            TokenResponse,
            UserResponse,
            Role,
            LeaveApplication,
            LeaveResponse,
            LeaveSummary,
            LeaveListResponse,
            PendingLeave,
            ApproveLeave,
            RejectLeave,
            UserRef,
            PolicyRef,
            RequestStatus,
            Policy,
            PolicyType,
            MeResponse,
            LeaveBalance,
            CalendarReport,
            CalendarPeriod,
            CalendarSummary,
            Absence,
            AbsentUser,
            Health,
            DetailedHealth,
            EngineMetrics,
            ErrorBody,
            ErrorDetail
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and token rotation"),
        (name = "Leave", description = "Leave request lifecycle APIs"),
        (name = "Policy", description = "Leave policy catalog"),
        (name = "User", description = "Caller profile and balance"),
        (name = "Calendar", description = "Team absence calendar"),
        (name = "Health", description = "Liveness and store health"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
