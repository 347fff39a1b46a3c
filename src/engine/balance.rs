use chrono::Datelike;
use serde::Serialize;
use utoipa::ToSchema;

use super::LeaveEngine;
use crate::error::AppError;
use crate::model::leave_request::RequestStatus;
use crate::model::policy::{Policy, PolicyType};
use crate::store::RequestFilter;

/// Allocation use for one user, one policy, one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LeaveBalance {
    pub policy_id: u64,
    pub policy_type: PolicyType,
    pub year: i32,
    pub annual_days: u32,
    pub used_days: f64,
    pub pending_days: f64,
    pub remaining_days: f64,
    /// Days earned per month
    pub accrual_rate: f64,
}

impl LeaveEngine {
    /// Requests count toward the year their first day falls in.
    pub fn balance(&self, user_id: u64, policy: &Policy, year: i32) -> Result<LeaveBalance, AppError> {
        let requests = self.requests.list(&RequestFilter {
            user_id: Some(user_id),
            statuses: vec![RequestStatus::Approved, RequestStatus::Pending],
            policy_ids: Some(vec![policy.id]),
            overlapping: None,
        })?;

        let (mut used, mut pending) = (0.0, 0.0);
        for request in requests.iter().filter(|r| r.start_date.year() == year) {
            match request.status {
                RequestStatus::Approved => used += request.charged_days(),
                RequestStatus::Pending => pending += request.charged_days(),
                RequestStatus::Rejected | RequestStatus::Cancelled => {}
            }
        }

        let annual = f64::from(policy.days_allocated);
        Ok(LeaveBalance {
            policy_id: policy.id,
            policy_type: policy.policy_type,
            year,
            annual_days: policy.days_allocated,
            used_days: used,
            pending_days: pending,
            remaining_days: annual - used,
            accrual_rate: (annual / 12.0 * 100.0).round() / 100.0,
        })
    }

    /// Current-year balance against the active vacation policy, if there is one.
    pub fn vacation_balance(&self, user_id: u64) -> Result<Option<LeaveBalance>, AppError> {
        let year = self.clock.today().year();
        self.active_policies()?
            .into_iter()
            .find(|p| p.policy_type == PolicyType::Vacation)
            .map(|policy| self.balance(user_id, &policy, year))
            .transpose()
    }
}
