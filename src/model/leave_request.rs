use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Display, EnumIter, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

/// Payload an employee submits to apply for leave.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LeaveApplication {
    #[schema(example = 1)]
    pub policy_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-09", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family trip")]
    pub reason: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub half_day: bool,
}

/// What the store needs to persist a new pending request.
#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub user_id: u64,
    pub policy_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub business_days: u32,
    pub calendar_days: u32,
    pub reason: String,
    pub notes: Option<String>,
    pub half_day: bool,
    pub approver_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRequest {
    pub id: u64,
    pub user_id: u64,
    pub policy_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub business_days: u32,
    pub calendar_days: u32,
    pub reason: String,
    pub notes: Option<String>,
    pub half_day: bool,
    pub status: RequestStatus,
    pub approver_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // audit trail, written once by the transition out of pending
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<u64>,
    pub approval_notes: Option<String>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<u64>,
    pub rejection_reason: Option<String>,
    pub rejection_notes: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    pub fn from_new(id: u64, new: NewLeaveRequest) -> Self {
        Self {
            id,
            user_id: new.user_id,
            policy_id: new.policy_id,
            start_date: new.start_date,
            end_date: new.end_date,
            business_days: new.business_days,
            calendar_days: new.calendar_days,
            reason: new.reason,
            notes: new.notes,
            half_day: new.half_day,
            status: RequestStatus::Pending,
            approver_id: new.approver_id,
            created_at: new.created_at,
            updated_at: new.created_at,
            approved_at: None,
            approved_by: None,
            approval_notes: None,
            rejected_at: None,
            rejected_by: None,
            rejection_reason: None,
            rejection_notes: None,
            cancelled_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Closed-interval overlap with `[start, end]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date >= start
    }

    /// Days charged against the allocation; a half day on a weekday costs 0.5.
    pub fn charged_days(&self) -> f64 {
        if self.half_day && self.business_days > 0 {
            0.5
        } else {
            f64::from(self.business_days)
        }
    }
}
