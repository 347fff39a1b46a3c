use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use utoipa::{IntoParams, ToSchema};

use super::{Actor, LeaveEngine};
use crate::error::AppError;
use crate::model::leave_request::RequestStatus;
use crate::model::policy::PolicyType;
use crate::store::RequestFilter;

const NO_DEPARTMENT: &str = "unassigned";

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CalendarQuery {
    /// First day of the window (defaults to the first of the current month)
    #[param(value_type = Option<String>, example = "2026-01-01")]
    pub start_date: Option<NaiveDate>,
    /// Last day of the window (defaults to the end of the current month)
    #[param(value_type = Option<String>, example = "2026-01-31")]
    pub end_date: Option<NaiveDate>,
    /// Only absences of people in this department
    pub department: Option<String>,
    /// Also show requests still awaiting a decision
    #[serde(default)]
    pub include_pending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CalendarPeriod {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-31", format = "date", value_type = String)]
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AbsentUser {
    pub id: u64,
    pub name: String,
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Absence {
    pub user: AbsentUser,
    pub request_id: u64,
    #[schema(format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub policy_type: PolicyType,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct CalendarSummary {
    pub total_absences: usize,
    pub by_department: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CalendarReport {
    pub period: CalendarPeriod,
    pub absences: Vec<Absence>,
    pub summary: CalendarSummary,
}

/// First and last day of the month containing `day`.
pub fn month_bounds(day: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let first = day.with_day(1)?;
    let next = if day.month() == 12 {
        NaiveDate::from_ymd_opt(day.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(day.year(), day.month() + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

impl LeaveEngine {
    /// Team absences overlapping a window, with per-department and per-status counts.
    pub fn calendar(&self, actor: &Actor, query: &CalendarQuery) -> Result<CalendarReport, AppError> {
        let (month_start, month_end) = month_bounds(self.clock.today())
            .ok_or_else(|| AppError::Internal("current month out of range".to_string()))?;
        let start = query.start_date.unwrap_or(month_start);
        let end = query.end_date.unwrap_or(month_end);
        if start > end {
            return Err(AppError::InvalidRange(
                "start_date must be on or before end_date".to_string(),
            ));
        }

        let mut statuses = vec![RequestStatus::Approved];
        if query.include_pending {
            statuses.push(RequestStatus::Pending);
        }
        let mut requests = self.requests.list(&RequestFilter {
            statuses,
            overlapping: Some((start, end)),
            ..RequestFilter::default()
        })?;
        requests.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));

        let mut absences = Vec::with_capacity(requests.len());
        let mut summary = CalendarSummary::default();
        for request in requests {
            let Some(owner) = self.directory.user(request.user_id)? else {
                warn!(request_id = request.id, user_id = request.user_id, "Request owner missing from directory");
                continue;
            };
            if let Some(department) = query.department.as_deref() {
                if !owner.in_department(Some(department)) {
                    continue;
                }
            }
            let policy = self.policy(request.policy_id)?;

            let department = owner.department.clone();
            *summary
                .by_department
                .entry(department.clone().unwrap_or_else(|| NO_DEPARTMENT.to_string()))
                .or_default() += 1;
            *summary.by_status.entry(request.status.to_string()).or_default() += 1;

            absences.push(Absence {
                user: AbsentUser {
                    id: owner.id,
                    name: owner.name,
                    department,
                },
                request_id: request.id,
                start_date: request.start_date,
                end_date: request.end_date,
                policy_type: policy.policy_type,
                status: request.status,
            });
        }
        summary.total_absences = absences.len();

        debug!(actor_id = actor.user_id, %start, %end, total = summary.total_absences, "Calendar built");
        Ok(CalendarReport {
            period: CalendarPeriod {
                start_date: start,
                end_date: end,
            },
            absences,
            summary,
        })
    }
}
