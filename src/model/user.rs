use chrono::{DateTime, Utc};

use super::role::Role;

#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub employee_code: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub role: Role,
    pub is_active: bool,
    /// Explicit approver; takes precedence over department lookup.
    pub manager_id: Option<u64>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn in_department(&self, department: Option<&str>) -> bool {
        matches!((self.department.as_deref(), department), (Some(a), Some(b)) if a == b)
    }

    pub fn is_active_manager(&self) -> bool {
        self.is_active && self.role == Role::Manager
    }
}

/// Fields supplied when adding someone to the directory.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub employee_code: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub role: Role,
    pub manager_id: Option<u64>,
    pub password_hash: String,
}
