//! Proposal DTOs

use crate::dtos::UserDTO;
use crate::entities::{Proposal, ProposalStatus, ProposalWithProposer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateProposalDTO {
    #[serde(default)]
    #[validate(length(max = 40))]
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProposalDTO {
    pub proposal_id: i32,
    pub user_id: i32,
    pub meetup_id: i32,
    pub text: String,
    pub status: ProposalStatus,
    pub hidden_from_proposer: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Proposal> for ProposalDTO {
    fn from(value: Proposal) -> Self {
        Self {
            proposal_id: value.proposal_id,
            user_id: value.user_id,
            meetup_id: value.meetup_id,
            text: value.text,
            status: value.status,
            hidden_from_proposer: value.hidden_from_proposer,
            created_at: value.created_at,
        }
    }
}

/// Proposal as seen by the organizer: who asked, what they wrote, where it stands
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProposalListItemDTO {
    pub proposal_id: i32,
    pub meetup_id: i32,
    pub user: UserDTO,
    pub text: String,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
}

impl From<ProposalWithProposer> for ProposalListItemDTO {
    fn from(value: ProposalWithProposer) -> Self {
        Self {
            proposal_id: value.proposal_id,
            meetup_id: value.meetup_id,
            user: UserDTO {
                user_id: value.user_id,
                nickname: value.nickname,
                profile_image: value.profile_image,
            },
            text: value.text,
            status: value.status,
            created_at: value.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ProposalListResultDTO {
    pub result: Vec<ProposalListItemDTO>,
    pub total: i64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SentProposalListResultDTO {
    pub result: Vec<ProposalDTO>,
}

/// DTO for inserting a proposal (status always starts as pending)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateProposalRowDTO {
    pub user_id: i32,
    pub meetup_id: i32,
    pub text: String,
}
