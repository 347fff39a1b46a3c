//! Shared fixture for engine and HTTP tests.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::clock::{Clock, FixedClock};
use crate::engine::{Actor, LeaveEngine};
use crate::model::leave_request::LeaveApplication;
use crate::model::policy::{Policy, PolicyType};
use crate::model::role::Role;
use crate::model::user::NewUser;
use crate::store::memory::{MemoryDirectory, MemoryPolicyCatalog, MemoryRequestStore};
use crate::store::seed::{default_policies, seed_directory};
use crate::store::Directory;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A Monday.
pub fn today() -> NaiveDate {
    date(2024, 12, 2)
}

pub struct Fixture {
    pub engine: LeaveEngine,
    pub admin: Actor,
    pub manager: Actor,
    pub employee: Actor,
    pub outsider: Actor,
    pub finance_manager: Actor,
}

/// Seeded directory plus a second department (Finanzas) with its own
/// manager, the default policies and a retired policy with id 4.
pub fn fixture() -> Fixture {
    let clock = FixedClock::on(today());
    let directory = Arc::new(MemoryDirectory::default());
    seed_directory(directory.as_ref(), "not-a-real-hash", clock.now()).unwrap();

    for (email, code, role) in [
        ("ana@comfachoco.com", "EMP002", Role::Employee),
        ("luis@comfachoco.com", "MGR002", Role::Manager),
    ] {
        directory
            .insert(
                NewUser {
                    email: email.to_string(),
                    name: code.to_string(),
                    employee_code: code.to_string(),
                    department: Some("Finanzas".to_string()),
                    position: None,
                    role,
                    manager_id: None,
                    password_hash: "not-a-real-hash".to_string(),
                },
                clock.now(),
            )
            .unwrap();
    }

    let mut policies = default_policies();
    policies.push(Policy {
        id: 4,
        name: "Licencia Retirada".to_string(),
        policy_type: PolicyType::PersonalLeave,
        days_allocated: 1,
        requires_approval: true,
        advance_notice_days: 0,
        max_consecutive_days: None,
        is_active: false,
    });

    let actor = |id: u64| Actor::from_user(&directory.user(id).unwrap().unwrap());
    let (admin, manager, employee, outsider, finance_manager) =
        (actor(1), actor(2), actor(3), actor(4), actor(5));

    let engine = LeaveEngine::new(
        directory,
        Arc::new(MemoryPolicyCatalog::new(policies)),
        Arc::new(MemoryRequestStore::default()),
        Arc::new(clock),
    );

    Fixture {
        engine,
        admin,
        manager,
        employee,
        outsider,
        finance_manager,
    }
}

pub fn application(policy_id: u64, start_date: NaiveDate, end_date: NaiveDate) -> LeaveApplication {
    LeaveApplication {
        policy_id,
        start_date,
        end_date,
        reason: "Family trip".to_string(),
        notes: None,
        half_day: false,
    }
}
