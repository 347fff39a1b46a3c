//! Leave-request lifecycle: submission, decisions, visibility and the
//! read models built on top of them (balances, team calendar).

pub mod balance;
pub mod calendar;
pub mod days;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::clock::Clock;
use crate::error::AppError;
use crate::model::leave_request::{LeaveApplication, LeaveRequest, NewLeaveRequest, RequestStatus};
use crate::model::policy::{Policy, PolicyType};
use crate::model::role::Role;
use crate::model::user::User;
use crate::store::{Directory, PolicyCatalog, RequestFilter, RequestRepository};
use days::{DayCount, count_days};

/// Authenticated identity on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: u64,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
}

impl Actor {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            department: user.department.clone(),
        }
    }

    fn shares_department_with(&self, user: &User) -> bool {
        user.in_department(self.department.as_deref())
    }
}

/// Filters for the caller's own request history.
#[derive(Debug, Clone, Default)]
pub struct RequestQuery {
    pub status: Option<RequestStatus>,
    pub policy_type: Option<PolicyType>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EngineMetrics {
    pub active_users: usize,
    pub active_policies: usize,
    pub total_requests: usize,
    pub requests_today: usize,
    pub by_status: BTreeMap<String, usize>,
}

pub struct LeaveEngine {
    directory: Arc<dyn Directory>,
    policies: Arc<dyn PolicyCatalog>,
    requests: Arc<dyn RequestRepository>,
    clock: Arc<dyn Clock>,
    enforce_policy_limits: bool,
}

impl LeaveEngine {
    pub fn new(
        directory: Arc<dyn Directory>,
        policies: Arc<dyn PolicyCatalog>,
        requests: Arc<dyn RequestRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            policies,
            requests,
            clock,
            enforce_policy_limits: false,
        }
    }

    /// Enforce advance notice, maximum length and remaining balance on submission.
    pub fn with_policy_limits(mut self, enforce: bool) -> Self {
        self.enforce_policy_limits = enforce;
        self
    }

    pub fn directory(&self) -> &dyn Directory {
        self.directory.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn active_policies(&self) -> Result<Vec<Policy>, AppError> {
        Ok(self
            .policies
            .policies()?
            .into_iter()
            .filter(|p| p.is_active)
            .collect())
    }

    /// Any policy by id, active or not; requests keep pointing at retired ones.
    pub fn policy(&self, id: u64) -> Result<Policy, AppError> {
        self.policies
            .policy(id)?
            .ok_or_else(|| AppError::NotFound(format!("Policy {id} not found")))
    }

    pub fn user(&self, id: u64) -> Result<User, AppError> {
        self.directory
            .user(id)?
            .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))
    }

    /// The caller as the directory knows them now. Tokens can outlive a role
    /// change or a deactivation.
    pub fn current_actor(&self, user_id: u64) -> Result<Actor, AppError> {
        self.directory
            .user(user_id)?
            .filter(|u| u.is_active)
            .map(|u| Actor::from_user(&u))
            .ok_or_else(|| AppError::Unauthorized("Account no longer active".to_string()))
    }

    /// Create a pending request for `actor`.
    pub fn submit(
        &self,
        actor: &Actor,
        application: LeaveApplication,
    ) -> Result<LeaveRequest, AppError> {
        let policy = self
            .policies
            .policy(application.policy_id)?
            .filter(|p| p.is_active)
            .ok_or_else(|| {
                AppError::NotFound(format!("Policy {} not found", application.policy_id))
            })?;

        let today = self.clock.today();
        if application.start_date < today {
            return Err(AppError::InvalidRange(
                "Start date cannot be in the past".to_string(),
            ));
        }
        if application.end_date < application.start_date {
            return Err(AppError::InvalidRange(
                "end_date must be on or after start_date".to_string(),
            ));
        }
        if application.reason.trim().is_empty() {
            return Err(AppError::Validation("reason must not be empty".to_string()));
        }
        if application.half_day && application.start_date != application.end_date {
            return Err(AppError::Validation(
                "half-day requests must start and end on the same date".to_string(),
            ));
        }

        let requester = self.user(actor.user_id)?;
        if !requester.is_active {
            return Err(AppError::Forbidden("Account is inactive".to_string()));
        }

        let days = count_days(application.start_date, application.end_date);
        if self.enforce_policy_limits {
            self.check_policy_limits(&requester, &policy, &application, days, today)
                .inspect_err(|e| {
                    debug!(user_id = requester.id, policy_id = policy.id, error = %e, "Policy limit refused request");
                })?;
        }

        let approver = self.resolve_approver(&requester)?;
        if approver.is_none() {
            warn!(user_id = requester.id, "No approver found for requester's department");
        }

        let request = self.requests.insert(NewLeaveRequest {
            user_id: requester.id,
            policy_id: policy.id,
            start_date: application.start_date,
            end_date: application.end_date,
            business_days: days.business_days,
            calendar_days: days.calendar_days,
            reason: application.reason.trim().to_string(),
            notes: non_blank(application.notes),
            half_day: application.half_day,
            approver_id: approver.map(|a| a.id),
            created_at: self.clock.now(),
        })?;

        info!(
            request_id = request.id,
            user_id = requester.id,
            policy_id = policy.id,
            business_days = days.business_days,
            "Leave request submitted"
        );
        Ok(request)
    }

    fn check_policy_limits(
        &self,
        requester: &User,
        policy: &Policy,
        application: &LeaveApplication,
        days: DayCount,
        today: NaiveDate,
    ) -> Result<(), AppError> {
        let notice = (application.start_date - today).num_days();
        if notice < i64::from(policy.advance_notice_days) {
            return Err(AppError::Validation(format!(
                "{} requires {} days of advance notice",
                policy.name, policy.advance_notice_days
            )));
        }

        if let Some(max) = policy.max_consecutive_days {
            if days.calendar_days > max {
                return Err(AppError::Validation(format!(
                    "{} allows at most {max} consecutive days",
                    policy.name
                )));
            }
        }

        let balance = self.balance(requester.id, policy, application.start_date.year())?;
        let requested = if application.half_day && days.business_days > 0 {
            0.5
        } else {
            f64::from(days.business_days)
        };
        let available = f64::from(policy.days_allocated) - balance.used_days - balance.pending_days;
        if requested > available {
            return Err(AppError::Validation(format!(
                "Insufficient {} balance: {available:.1} days available",
                policy.name
            )));
        }

        Ok(())
    }

    /// The requester's assigned manager, else the lowest-id active manager in
    /// their department.
    pub fn resolve_approver(&self, user: &User) -> Result<Option<User>, AppError> {
        if let Some(manager_id) = user.manager_id {
            if let Some(manager) = self.directory.user(manager_id)? {
                if manager.id != user.id && manager.is_active_manager() {
                    return Ok(Some(manager));
                }
            }
        }

        Ok(self.directory.users()?.into_iter().find(|candidate| {
            candidate.id != user.id
                && candidate.is_active_manager()
                && candidate.in_department(user.department.as_deref())
        }))
    }

    /// A single request, if `actor` may see it.
    pub fn request(&self, actor: &Actor, id: u64) -> Result<LeaveRequest, AppError> {
        let request = self.find(id)?;
        if !self.can_view(actor, &request)? {
            debug!(request_id = id, actor_id = actor.user_id, "Read refused");
            return Err(AppError::Forbidden("Access denied".to_string()));
        }
        Ok(request)
    }

    /// The caller's own requests, newest first.
    pub fn own_requests(
        &self,
        actor: &Actor,
        query: &RequestQuery,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        if let (Some(from), Some(to)) = (query.date_from, query.date_to) {
            if from > to {
                return Err(AppError::InvalidRange(
                    "date_from must be on or before date_to".to_string(),
                ));
            }
        }

        let policy_ids = match query.policy_type {
            Some(kind) => Some(
                self.policies
                    .policies()?
                    .into_iter()
                    .filter(|p| p.policy_type == kind)
                    .map(|p| p.id)
                    .collect(),
            ),
            None => None,
        };
        let overlapping = match (query.date_from, query.date_to) {
            (None, None) => None,
            (from, to) => Some((from.unwrap_or(NaiveDate::MIN), to.unwrap_or(NaiveDate::MAX))),
        };

        let mut requests = self.requests.list(&RequestFilter {
            user_id: Some(actor.user_id),
            statuses: query.status.into_iter().collect(),
            policy_ids,
            overlapping,
        })?;
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(requests)
    }

    /// Pending requests awaiting `actor`, oldest first.
    ///
    /// HR admins see every pending request; managers only those raised by
    /// others in their own department.
    pub fn pending_queue(&self, actor: &Actor) -> Result<Vec<LeaveRequest>, AppError> {
        require_approver(actor)?;

        let pending = self.requests.list(&RequestFilter {
            statuses: vec![RequestStatus::Pending],
            ..RequestFilter::default()
        })?;

        let mut queue: Vec<_> = match actor.role {
            Role::HrAdmin => pending,
            _ => {
                let members: Vec<u64> = self
                    .directory
                    .users()?
                    .iter()
                    .filter(|u| u.id != actor.user_id && actor.shares_department_with(u))
                    .map(|u| u.id)
                    .collect();
                pending
                    .into_iter()
                    .filter(|r| members.contains(&r.user_id))
                    .collect()
            }
        };
        queue.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(queue)
    }

    pub fn approve(
        &self,
        actor: &Actor,
        id: u64,
        notes: Option<String>,
    ) -> Result<LeaveRequest, AppError> {
        self.authorize_decision(actor, id)?;

        let now = self.clock.now();
        let notes = non_blank(notes);
        let approved = self
            .requests
            .update(id, &mut |request| {
                ensure_pending(request)?;
                request.status = RequestStatus::Approved;
                request.approved_at = Some(now);
                request.approved_by = Some(actor.user_id);
                request.approval_notes = notes.clone();
                request.updated_at = now;
                Ok(())
            })
            .inspect_err(|e| warn!(request_id = id, actor_id = actor.user_id, error = %e, "Approve refused"))?;

        info!(request_id = id, actor_id = actor.user_id, "Leave request approved");
        Ok(approved)
    }

    pub fn reject(
        &self,
        actor: &Actor,
        id: u64,
        reason: String,
        notes: Option<String>,
    ) -> Result<LeaveRequest, AppError> {
        self.authorize_decision(actor, id)?;

        let reason = reason.trim().to_string();
        let now = self.clock.now();
        let notes = non_blank(notes);
        let rejected = self
            .requests
            .update(id, &mut |request| {
                ensure_pending(request)?;
                if reason.is_empty() {
                    return Err(AppError::Validation(
                        "A rejection reason is required".to_string(),
                    ));
                }
                request.status = RequestStatus::Rejected;
                request.rejected_at = Some(now);
                request.rejected_by = Some(actor.user_id);
                request.rejection_reason = Some(reason.clone());
                request.rejection_notes = notes.clone();
                request.updated_at = now;
                Ok(())
            })
            .inspect_err(|e| warn!(request_id = id, actor_id = actor.user_id, error = %e, "Reject refused"))?;

        info!(request_id = id, actor_id = actor.user_id, "Leave request rejected");
        Ok(rejected)
    }

    /// Withdraw a pending request. Only its owner may do so.
    pub fn cancel(&self, actor: &Actor, id: u64) -> Result<LeaveRequest, AppError> {
        let request = self.find(id)?;
        if request.user_id != actor.user_id {
            return Err(AppError::Forbidden(
                "Only the requester can cancel a request".to_string(),
            ));
        }

        let now = self.clock.now();
        let cancelled = self.requests.update(id, &mut |request| {
            ensure_pending(request)?;
            request.status = RequestStatus::Cancelled;
            request.cancelled_at = Some(now);
            request.updated_at = now;
            Ok(())
        })?;

        info!(request_id = id, actor_id = actor.user_id, "Leave request cancelled");
        Ok(cancelled)
    }

    pub fn metrics(&self) -> Result<EngineMetrics, AppError> {
        let today = self.clock.today();
        let requests = self.requests.list(&RequestFilter::default())?;

        let mut by_status: BTreeMap<String, usize> =
            RequestStatus::iter().map(|s| (s.to_string(), 0)).collect();
        for request in &requests {
            *by_status.entry(request.status.to_string()).or_default() += 1;
        }

        Ok(EngineMetrics {
            active_users: self.directory.users()?.iter().filter(|u| u.is_active).count(),
            active_policies: self.active_policies()?.len(),
            total_requests: requests.len(),
            requests_today: requests
                .iter()
                .filter(|r| r.created_at.date_naive() == today)
                .count(),
            by_status,
        })
    }

    fn find(&self, id: u64) -> Result<LeaveRequest, AppError> {
        self.requests
            .get(id)?
            .ok_or_else(|| AppError::NotFound(format!("Leave request {id} not found")))
    }

    fn owner_in_actor_department(&self, actor: &Actor, request: &LeaveRequest) -> Result<bool, AppError> {
        Ok(self
            .directory
            .user(request.user_id)?
            .is_some_and(|owner| actor.shares_department_with(&owner)))
    }

    fn can_view(&self, actor: &Actor, request: &LeaveRequest) -> Result<bool, AppError> {
        if request.user_id == actor.user_id {
            return Ok(true);
        }
        match actor.role {
            Role::HrAdmin => Ok(true),
            Role::Manager => self.owner_in_actor_department(actor, request),
            Role::Employee => Ok(false),
        }
    }

    fn authorize_decision(&self, actor: &Actor, id: u64) -> Result<(), AppError> {
        require_approver(actor)?;

        let request = self.find(id)?;
        if actor.role == Role::Manager && request.user_id == actor.user_id {
            return Err(AppError::Forbidden(
                "Managers cannot decide on their own requests".to_string(),
            ));
        }
        if actor.role == Role::Manager && !self.owner_in_actor_department(actor, &request)? {
            return Err(AppError::Forbidden(
                "Request belongs to another department".to_string(),
            ));
        }
        Ok(())
    }
}

fn require_approver(actor: &Actor) -> Result<(), AppError> {
    if actor.role.is_approver() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Access denied. Manager or HR role required.".to_string(),
        ))
    }
}

fn ensure_pending(request: &LeaveRequest) -> Result<(), AppError> {
    if request.is_pending() {
        Ok(())
    } else {
        Err(AppError::InvalidState(format!(
            "Leave request {} is {} and can no longer change",
            request.id, request.status
        )))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{application, date, fixture};

    #[test]
    fn submit_computes_days_and_assigns_department_manager() {
        let fx = fixture();
        let request = fx
            .engine
            .submit(&fx.employee, application(1, date(2024, 12, 16), date(2024, 12, 20)))
            .expect("submitted");

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.business_days, 5);
        assert_eq!(request.calendar_days, 5);
        assert_eq!(request.approver_id, Some(fx.manager.user_id));
        assert_eq!(request.user_id, fx.employee.user_id);
    }

    #[test]
    fn submit_without_department_manager_leaves_approver_empty() {
        let fx = fixture();
        let request = fx
            .engine
            .submit(&fx.admin, application(1, date(2024, 12, 14), date(2024, 12, 15)))
            .expect("submitted");
        assert_eq!(request.approver_id, None);
        assert_eq!(request.business_days, 0);
        assert_eq!(request.calendar_days, 2);
    }

    #[test]
    fn submit_rejects_past_start_regardless_of_end() {
        let fx = fixture();
        for end in [date(2024, 11, 30), date(2024, 12, 1), date(2025, 1, 31)] {
            let result = fx
                .engine
                .submit(&fx.employee, application(1, date(2024, 12, 1), end));
            assert!(matches!(result, Err(AppError::InvalidRange(_))), "end {end}");
        }
    }

    #[test]
    fn submit_rejects_end_before_start() {
        let fx = fixture();
        let result = fx
            .engine
            .submit(&fx.employee, application(1, date(2024, 12, 10), date(2024, 12, 9)));
        assert!(matches!(result, Err(AppError::InvalidRange(_))));
    }

    #[test]
    fn submit_against_unknown_or_inactive_policy_is_not_found() {
        let fx = fixture();
        for policy_id in [99, 4] {
            let result = fx
                .engine
                .submit(&fx.employee, application(policy_id, date(2024, 12, 9), date(2024, 12, 9)));
            assert!(matches!(result, Err(AppError::NotFound(_))), "policy {policy_id}");
        }
    }

    #[test]
    fn submit_validates_reason_and_half_day() {
        let fx = fixture();
        let mut blank = application(1, date(2024, 12, 9), date(2024, 12, 9));
        blank.reason = "   ".to_string();
        assert!(matches!(
            fx.engine.submit(&fx.employee, blank),
            Err(AppError::Validation(_))
        ));

        let mut half = application(1, date(2024, 12, 9), date(2024, 12, 10));
        half.half_day = true;
        assert!(matches!(
            fx.engine.submit(&fx.employee, half),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn policy_limits_are_ignored_unless_enabled() {
        let fx = fixture();
        // vacation needs 7 days notice; today is 2024-12-02
        let result = fx
            .engine
            .submit(&fx.employee, application(1, date(2024, 12, 3), date(2024, 12, 3)));
        assert!(result.is_ok());
    }

    #[test]
    fn enforced_limits_check_notice_length_and_balance() {
        let fx = fixture();
        let engine = fx.engine.with_policy_limits(true);

        let short_notice = engine.submit(&fx.employee, application(1, date(2024, 12, 3), date(2024, 12, 3)));
        assert!(matches!(short_notice, Err(AppError::Validation(_))));

        // sick leave allows at most 3 consecutive days
        let too_long = engine.submit(&fx.employee, application(2, date(2024, 12, 2), date(2024, 12, 5)));
        assert!(matches!(too_long, Err(AppError::Validation(_))));

        // personal leave: 3 days a year, 2 consecutive at most
        engine
            .submit(&fx.employee, application(3, date(2024, 12, 9), date(2024, 12, 10)))
            .expect("first personal leave fits");
        let over_balance = engine.submit(&fx.employee, application(3, date(2024, 12, 16), date(2024, 12, 17)));
        assert!(matches!(over_balance, Err(AppError::Validation(_))));
        engine
            .submit(&fx.employee, application(3, date(2024, 12, 18), date(2024, 12, 18)))
            .expect("last remaining day fits");
    }

    #[test]
    fn approve_then_second_decision_is_invalid_state() {
        let fx = fixture();
        let request = fx
            .engine
            .submit(&fx.employee, application(1, date(2024, 12, 9), date(2024, 12, 13)))
            .unwrap();

        let approved = fx
            .engine
            .approve(&fx.manager, request.id, Some(" enjoy ".to_string()))
            .expect("approved");
        assert_eq!(approved.status, RequestStatus::Approved);
        assert_eq!(approved.approved_by, Some(fx.manager.user_id));
        assert_eq!(approved.approval_notes.as_deref(), Some("enjoy"));
        assert!(approved.approved_at.is_some());

        let again = fx.engine.approve(&fx.admin, request.id, None);
        assert!(matches!(again, Err(AppError::InvalidState(_))));
        let reject = fx.engine.reject(&fx.admin, request.id, "late".to_string(), None);
        assert!(matches!(reject, Err(AppError::InvalidState(_))));

        let stored = fx.engine.request(&fx.admin, request.id).unwrap();
        assert_eq!(stored, approved);
    }

    #[test]
    fn reject_records_reason_and_requires_one() {
        let fx = fixture();
        let request = fx
            .engine
            .submit(&fx.employee, application(1, date(2024, 12, 9), date(2024, 12, 9)))
            .unwrap();

        let missing = fx.engine.reject(&fx.admin, request.id, " ".to_string(), None);
        assert!(matches!(missing, Err(AppError::Validation(_))));
        assert!(fx.engine.request(&fx.admin, request.id).unwrap().is_pending());

        let rejected = fx
            .engine
            .reject(&fx.admin, request.id, "Team offsite".to_string(), Some("sorry".to_string()))
            .unwrap();
        assert_eq!(rejected.status, RequestStatus::Rejected);
        assert_eq!(rejected.rejected_by, Some(fx.admin.user_id));
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Team offsite"));
        assert_eq!(rejected.rejection_notes.as_deref(), Some("sorry"));
        assert!(rejected.approved_at.is_none());

        let blank_again = fx.engine.reject(&fx.admin, request.id, "".to_string(), None);
        assert!(matches!(blank_again, Err(AppError::InvalidState(_))));
    }

    #[test]
    fn decisions_require_approver_role_and_department() {
        let fx = fixture();
        let request = fx
            .engine
            .submit(&fx.employee, application(1, date(2024, 12, 9), date(2024, 12, 9)))
            .unwrap();

        let by_employee = fx.engine.approve(&fx.outsider, request.id, None);
        assert!(matches!(by_employee, Err(AppError::Forbidden(_))));

        let by_other_manager = fx.engine.approve(&fx.finance_manager, request.id, None);
        assert!(matches!(by_other_manager, Err(AppError::Forbidden(_))));

        let missing = fx.engine.approve(&fx.manager, 404, None);
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[test]
    fn managers_cannot_decide_their_own_requests() {
        let fx = fixture();
        let own = fx
            .engine
            .submit(&fx.manager, application(1, date(2024, 12, 9), date(2024, 12, 9)))
            .unwrap();
        let result = fx.engine.approve(&fx.manager, own.id, None);
        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert!(fx.engine.approve(&fx.admin, own.id, None).is_ok());
    }

    #[test]
    fn current_actor_reflects_the_directory() {
        let fx = fixture();
        assert_eq!(fx.engine.current_actor(fx.manager.user_id).unwrap(), fx.manager);
        assert!(matches!(
            fx.engine.current_actor(404),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn hr_admin_can_decide_their_own_request() {
        let fx = fixture();
        let own = fx
            .engine
            .submit(&fx.admin, application(1, date(2024, 12, 9), date(2024, 12, 9)))
            .unwrap();
        let approved = fx.engine.approve(&fx.admin, own.id, None).unwrap();
        assert_eq!(approved.approved_by, Some(fx.admin.user_id));
    }

    #[test]
    fn cancel_is_owner_only_and_pending_only() {
        let fx = fixture();
        let request = fx
            .engine
            .submit(&fx.employee, application(1, date(2024, 12, 9), date(2024, 12, 9)))
            .unwrap();

        let by_manager = fx.engine.cancel(&fx.manager, request.id);
        assert!(matches!(by_manager, Err(AppError::Forbidden(_))));

        let cancelled = fx.engine.cancel(&fx.employee, request.id).unwrap();
        assert_eq!(cancelled.status, RequestStatus::Cancelled);
        assert!(cancelled.cancelled_at.is_some());

        let again = fx.engine.cancel(&fx.employee, request.id);
        assert!(matches!(again, Err(AppError::InvalidState(_))));
        let approve = fx.engine.approve(&fx.manager, request.id, None);
        assert!(matches!(approve, Err(AppError::InvalidState(_))));
    }

    #[test]
    fn visibility_follows_owner_department_and_role() {
        let fx = fixture();
        let request = fx
            .engine
            .submit(&fx.employee, application(1, date(2024, 12, 9), date(2024, 12, 9)))
            .unwrap();

        assert!(fx.engine.request(&fx.employee, request.id).is_ok());
        assert!(fx.engine.request(&fx.manager, request.id).is_ok());
        assert!(fx.engine.request(&fx.admin, request.id).is_ok());
        assert!(matches!(
            fx.engine.request(&fx.outsider, request.id),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            fx.engine.request(&fx.finance_manager, request.id),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            fx.engine.request(&fx.admin, 999),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn repeated_reads_are_identical() {
        let fx = fixture();
        let request = fx
            .engine
            .submit(&fx.employee, application(2, date(2024, 12, 4), date(2024, 12, 6)))
            .unwrap();
        let first = fx.engine.request(&fx.employee, request.id).unwrap();
        let second = fx.engine.request(&fx.employee, request.id).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn pending_queue_is_scoped_by_department() {
        let fx = fixture();
        let mine = fx
            .engine
            .submit(&fx.employee, application(1, date(2024, 12, 9), date(2024, 12, 9)))
            .unwrap();
        let theirs = fx
            .engine
            .submit(&fx.outsider, application(1, date(2024, 12, 10), date(2024, 12, 10)))
            .unwrap();
        let admins = fx
            .engine
            .submit(&fx.admin, application(1, date(2024, 12, 11), date(2024, 12, 11)))
            .unwrap();
        let managers = fx
            .engine
            .submit(&fx.manager, application(1, date(2024, 12, 12), date(2024, 12, 12)))
            .unwrap();

        let ids = |queue: Vec<LeaveRequest>| queue.into_iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids(fx.engine.pending_queue(&fx.manager).unwrap()), vec![mine.id]);
        assert_eq!(ids(fx.engine.pending_queue(&fx.finance_manager).unwrap()), vec![theirs.id]);
        assert_eq!(
            ids(fx.engine.pending_queue(&fx.admin).unwrap()),
            vec![mine.id, theirs.id, admins.id, managers.id]
        );
        assert!(matches!(
            fx.engine.pending_queue(&fx.employee),
            Err(AppError::Forbidden(_))
        ));

        fx.engine.approve(&fx.admin, mine.id, None).unwrap();
        assert!(fx.engine.pending_queue(&fx.manager).unwrap().is_empty());
    }

    #[test]
    fn own_requests_filter_and_order() {
        let fx = fixture();
        let vacation = fx
            .engine
            .submit(&fx.employee, application(1, date(2024, 12, 9), date(2024, 12, 13)))
            .unwrap();
        let sick = fx
            .engine
            .submit(&fx.employee, application(2, date(2025, 1, 6), date(2025, 1, 7)))
            .unwrap();
        fx.engine
            .submit(&fx.outsider, application(1, date(2024, 12, 9), date(2024, 12, 9)))
            .unwrap();
        fx.engine.approve(&fx.manager, vacation.id, None).unwrap();

        let all = fx.engine.own_requests(&fx.employee, &RequestQuery::default()).unwrap();
        assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![sick.id, vacation.id]);

        let approved = fx
            .engine
            .own_requests(
                &fx.employee,
                &RequestQuery {
                    status: Some(RequestStatus::Approved),
                    ..RequestQuery::default()
                },
            )
            .unwrap();
        assert_eq!(approved.len(), 1);

        let sick_only = fx
            .engine
            .own_requests(
                &fx.employee,
                &RequestQuery {
                    policy_type: Some(PolicyType::SickLeave),
                    ..RequestQuery::default()
                },
            )
            .unwrap();
        assert_eq!(sick_only[0].id, sick.id);

        let january = fx
            .engine
            .own_requests(
                &fx.employee,
                &RequestQuery {
                    date_from: Some(date(2025, 1, 1)),
                    ..RequestQuery::default()
                },
            )
            .unwrap();
        assert_eq!(january.len(), 1);

        let backwards = fx.engine.own_requests(
            &fx.employee,
            &RequestQuery {
                date_from: Some(date(2025, 1, 1)),
                date_to: Some(date(2024, 1, 1)),
                ..RequestQuery::default()
            },
        );
        assert!(matches!(backwards, Err(AppError::InvalidRange(_))));
    }

    #[test]
    fn assigned_manager_wins_over_department_scan() {
        let fx = fixture();
        let mut employee = fx.engine.user(fx.employee.user_id).unwrap();
        employee.manager_id = Some(fx.finance_manager.user_id);
        let approver = fx.engine.resolve_approver(&employee).unwrap().unwrap();
        assert_eq!(approver.id, fx.finance_manager.user_id);

        employee.manager_id = Some(fx.outsider.user_id);
        let fallback = fx.engine.resolve_approver(&employee).unwrap().unwrap();
        assert_eq!(fallback.id, fx.manager.user_id);
    }

    #[test]
    fn metrics_count_by_status() {
        let fx = fixture();
        let request = fx
            .engine
            .submit(&fx.employee, application(1, date(2024, 12, 9), date(2024, 12, 9)))
            .unwrap();
        fx.engine
            .submit(&fx.outsider, application(1, date(2024, 12, 9), date(2024, 12, 9)))
            .unwrap();
        fx.engine.approve(&fx.manager, request.id, None).unwrap();

        let metrics = fx.engine.metrics().unwrap();
        assert_eq!(metrics.total_requests, 2);
        assert_eq!(metrics.requests_today, 2);
        assert_eq!(metrics.by_status["approved"], 1);
        assert_eq!(metrics.by_status["pending"], 1);
        assert_eq!(metrics.by_status["cancelled"], 0);
        assert_eq!(metrics.active_policies, 3);
    }
}
