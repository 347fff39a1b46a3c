use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PolicyType {
    Vacation,
    SickLeave,
    PersonalLeave,
}

/// A leave-type definition. Never edited once a request points at it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Policy {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Annual vacation")]
    pub name: String,
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    /// Business days granted per calendar year
    #[schema(example = 15)]
    pub days_allocated: u32,
    pub requires_approval: bool,
    #[schema(example = 7)]
    pub advance_notice_days: u32,
    #[schema(example = 30, nullable = true)]
    pub max_consecutive_days: Option<u32>,
    pub is_active: bool,
}
