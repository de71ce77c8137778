//! Proposal entity - request of a non-member to join a meetup

use super::enums::ProposalStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique per (user_id, meetup_id).
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Proposal {
    pub proposal_id: i32,
    pub user_id: i32,
    pub meetup_id: i32,
    pub text: String,
    pub status: ProposalStatus,
    // archived from the proposer's own view, still visible to the organizer
    pub hidden_from_proposer: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Proposal joined with the public profile of whoever sent it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProposalWithProposer {
    pub proposal_id: i32,
    pub meetup_id: i32,
    pub user_id: i32,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub text: String,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
}
