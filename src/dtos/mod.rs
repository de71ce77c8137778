//! DTOs module - Data Transfer Objects
//!
//! Request and response shapes of the HTTP API, kept apart from the entities
//! so that storage columns never leak or become writable by accident.

pub mod meetup;
pub mod member;
pub mod notification;
pub mod proposal;
pub mod query;
pub mod user;

pub use meetup::{CreateMeetupDTO, MeetupDTO, MeetupLikeDTO, UpdateMeetupDTO};
pub use member::{CreateMemberDTO, MemberDTO, MemberListResultDTO};
pub use notification::{CreateNotificationDTO, NotificationDTO, NotificationListResultDTO};
pub use proposal::{
    CreateProposalDTO, CreateProposalRowDTO, ProposalDTO, ProposalListItemDTO,
    ProposalListResultDTO, SentProposalListResultDTO,
};
pub use query::PageQuery;
pub use user::{CreateUserDTO, UserDTO};
