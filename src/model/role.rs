use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Employee,
    Manager,
    HrAdmin,
}

impl Role {
    /// Roles allowed to decide on pending requests.
    pub fn is_approver(&self) -> bool {
        matches!(self, Role::Manager | Role::HrAdmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_snake_case() {
        assert_eq!(serde_json::to_string(&Role::HrAdmin).unwrap(), "\"hr_admin\"");
        assert_eq!(Role::HrAdmin.to_string(), "hr_admin");
        assert!(!Role::Employee.is_approver());
        assert!(Role::Manager.is_approver());
    }
}
