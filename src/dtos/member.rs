//! Member DTOs

use crate::entities::{Member, MemberRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Member of a meetup together with the nickname of the user
#[derive(Serialize, Deserialize, Debug)]
pub struct MemberDTO {
    pub member_id: i32,
    pub meetup_id: i32,
    pub user_id: i32,
    pub nickname: Option<String>,
    pub role: MemberRole,
    pub member_since: DateTime<Utc>,
}

impl From<Member> for MemberDTO {
    fn from(value: Member) -> Self {
        Self {
            member_id: value.member_id,
            meetup_id: value.meetup_id,
            user_id: value.user_id,
            nickname: None, // not stored on the member row, filled in by the caller
            role: value.role,
            member_since: value.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MemberListResultDTO {
    pub result: Vec<MemberDTO>,
}

/// DTO for inserting a member row (no member_id, no created_at)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateMemberDTO {
    pub user_id: i32,
    pub meetup_id: i32,
    pub role: MemberRole,
}
