use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::{Directory, PolicyCatalog, RequestFilter, RequestRepository, Transition};
use crate::error::AppError;
use crate::model::leave_request::{LeaveRequest, NewLeaveRequest};
use crate::model::policy::Policy;
use crate::model::user::{NewUser, User};

#[derive(Default)]
pub struct MemoryDirectory {
    users: RwLock<BTreeMap<u64, User>>,
    next_id: AtomicU64,
}

impl Directory for MemoryDirectory {
    fn user(&self, id: u64) -> Result<Option<User>, AppError> {
        Ok(self.users.read().get(&id).cloned())
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.read().values().cloned().collect())
    }

    fn insert(&self, user: NewUser, created_at: DateTime<Utc>) -> Result<User, AppError> {
        let mut users = self.users.write();

        if users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        if users.values().any(|u| u.employee_code == user.employee_code) {
            return Err(AppError::Conflict("Employee code already exists".to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = User {
            id,
            email: user.email,
            name: user.name,
            employee_code: user.employee_code,
            department: user.department,
            position: user.position,
            role: user.role,
            is_active: true,
            manager_id: user.manager_id,
            password_hash: user.password_hash,
            created_at,
        };
        users.insert(id, stored.clone());
        Ok(stored)
    }
}

pub struct MemoryPolicyCatalog {
    policies: RwLock<BTreeMap<u64, Policy>>,
}

impl MemoryPolicyCatalog {
    pub fn new(policies: Vec<Policy>) -> Self {
        Self {
            policies: RwLock::new(policies.into_iter().map(|p| (p.id, p)).collect()),
        }
    }
}

impl PolicyCatalog for MemoryPolicyCatalog {
    fn policy(&self, id: u64) -> Result<Option<Policy>, AppError> {
        Ok(self.policies.read().get(&id).cloned())
    }

    fn policies(&self) -> Result<Vec<Policy>, AppError> {
        Ok(self.policies.read().values().cloned().collect())
    }
}

/// Single-writer request table: every update runs under the write lock.
#[derive(Default)]
pub struct MemoryRequestStore {
    requests: RwLock<BTreeMap<u64, LeaveRequest>>,
    next_id: AtomicU64,
}

impl RequestRepository for MemoryRequestStore {
    fn insert(&self, request: NewLeaveRequest) -> Result<LeaveRequest, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = LeaveRequest::from_new(id, request);
        self.requests.write().insert(id, stored.clone());
        Ok(stored)
    }

    fn get(&self, id: u64) -> Result<Option<LeaveRequest>, AppError> {
        Ok(self.requests.read().get(&id).cloned())
    }

    fn list(&self, filter: &RequestFilter) -> Result<Vec<LeaveRequest>, AppError> {
        Ok(self
            .requests
            .read()
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    fn update(&self, id: u64, transition: Transition<'_>) -> Result<LeaveRequest, AppError> {
        let mut requests = self.requests.write();
        let current = requests
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Leave request {id} not found")))?;

        let mut draft = current.clone();
        transition(&mut draft)?;
        requests.insert(id, draft.clone());
        Ok(draft)
    }
}
