//! Storage seams for the lifecycle engine.
//!
//! The engine only talks to these traits, so the in-memory tables in
//! [`memory`] can be swapped for a database-backed implementation without
//! touching any lifecycle rule.

pub mod memory;
pub mod seed;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::AppError;
use crate::model::leave_request::{LeaveRequest, NewLeaveRequest, RequestStatus};
use crate::model::policy::Policy;
use crate::model::user::{NewUser, User};

/// Users, departments and roles.
pub trait Directory: Send + Sync {
    fn user(&self, id: u64) -> Result<Option<User>, AppError>;
    fn user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// All users ordered by id.
    fn users(&self) -> Result<Vec<User>, AppError>;
    /// Fails with `Conflict` when the email or employee code is already taken.
    fn insert(&self, user: NewUser, created_at: DateTime<Utc>) -> Result<User, AppError>;
}

/// Leave types and their allowances.
pub trait PolicyCatalog: Send + Sync {
    /// Looks a policy up regardless of its active flag.
    fn policy(&self, id: u64) -> Result<Option<Policy>, AppError>;
    fn policies(&self) -> Result<Vec<Policy>, AppError>;
}

/// Mutation hook applied by [`RequestRepository::update`].
pub type Transition<'a> = &'a mut dyn FnMut(&mut LeaveRequest) -> Result<(), AppError>;

pub trait RequestRepository: Send + Sync {
    fn insert(&self, request: NewLeaveRequest) -> Result<LeaveRequest, AppError>;
    fn get(&self, id: u64) -> Result<Option<LeaveRequest>, AppError>;
    /// Matching requests ordered by id.
    fn list(&self, filter: &RequestFilter) -> Result<Vec<LeaveRequest>, AppError>;
    /// Applies `transition` to the stored request as one atomic step.
    ///
    /// Implementations must serialize updates of the same id: the closure sees
    /// the latest committed state and its changes are kept only if it returns
    /// `Ok`.
    fn update(&self, id: u64, transition: Transition<'_>) -> Result<LeaveRequest, AppError>;
}

#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub user_id: Option<u64>,
    /// Empty means any status.
    pub statuses: Vec<RequestStatus>,
    pub policy_ids: Option<Vec<u64>>,
    /// Inclusive window the request must overlap.
    pub overlapping: Option<(NaiveDate, NaiveDate)>,
}

impl RequestFilter {
    pub fn matches(&self, request: &LeaveRequest) -> bool {
        if self.user_id.is_some_and(|id| id != request.user_id) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&request.status) {
            return false;
        }
        if let Some(ids) = &self.policy_ids {
            if !ids.contains(&request.policy_id) {
                return false;
            }
        }
        match self.overlapping {
            Some((start, end)) => request.overlaps(start, end),
            None => true,
        }
    }
}
