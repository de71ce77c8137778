//! Enumerations shared by the persisted entities

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum MemberRole {
    Organizer,
    Member,
}

/// Status of a join proposal.
///
/// `Pending` is the only state a proposal is created in; the other three are
/// terminal and only the organizer of the target meetup moves a proposal into
/// them.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Pending,
    Acceptance,
    Refuse,
    Ignore,
}

impl ProposalStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProposalStatus::Pending)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    MeetupComment,
    ScheduleComment,
    ReceivedProposal,
    SentProposal,
}

impl NotificationType {
    /// Deep link the client follows when the notification is opened.
    pub fn deep_link(&self, model_id: i32) -> String {
        match self {
            NotificationType::MeetupComment => format!("/ad/{}/", model_id),
            NotificationType::ScheduleComment => format!("/schedule/{}/", model_id),
            NotificationType::SentProposal => "/my-space/sent-proposal".to_string(),
            NotificationType::ReceivedProposal => "/my-space/received-proposal".to_string(),
        }
    }
}
