use chrono::{DateTime, Utc};

use super::Directory;
use crate::error::AppError;
use crate::model::policy::{Policy, PolicyType};
use crate::model::role::Role;
use crate::model::user::NewUser;

/// Demo accounts: an HR admin, and a manager plus employee sharing a department.
pub fn seed_directory(
    directory: &dyn Directory,
    password_hash: &str,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let people = [
        ("admin@comfachoco.com", "Administrador Sistema", "ADM001", "RRHH", "Administrador", Role::HrAdmin),
        ("manager@comfachoco.com", "María García", "MGR001", "Tecnología", "Gerente de TI", Role::Manager),
        ("empleado@comfachoco.com", "Juan Pérez", "EMP001", "Tecnología", "Desarrollador Senior", Role::Employee),
    ];

    for (email, name, code, department, position, role) in people {
        directory.insert(
            NewUser {
                email: email.to_string(),
                name: name.to_string(),
                employee_code: code.to_string(),
                department: Some(department.to_string()),
                position: Some(position.to_string()),
                role,
                manager_id: None,
                password_hash: password_hash.to_string(),
            },
            now,
        )?;
    }

    Ok(())
}

pub fn default_policies() -> Vec<Policy> {
    vec![
        Policy {
            id: 1,
            name: "Vacaciones Anuales".to_string(),
            policy_type: PolicyType::Vacation,
            days_allocated: 15,
            requires_approval: true,
            advance_notice_days: 7,
            max_consecutive_days: Some(30),
            is_active: true,
        },
        Policy {
            id: 2,
            name: "Licencia por Enfermedad".to_string(),
            policy_type: PolicyType::SickLeave,
            days_allocated: 5,
            requires_approval: false,
            advance_notice_days: 0,
            max_consecutive_days: Some(3),
            is_active: true,
        },
        Policy {
            id: 3,
            name: "Permiso Personal".to_string(),
            policy_type: PolicyType::PersonalLeave,
            days_allocated: 3,
            requires_approval: true,
            advance_notice_days: 1,
            max_consecutive_days: Some(2),
            is_active: true,
        },
    ]
}
