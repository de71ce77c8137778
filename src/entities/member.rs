//! Member entity - join record between a user and a meetup

use super::enums::MemberRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique per (user_id, meetup_id).
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Member {
    pub member_id: i32,
    pub user_id: i32,
    pub meetup_id: i32,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
}
