//! Entities module - rows persisted by the service
//!
//! Every entity maps one table of `migrations/`.

pub mod enums;
pub mod meetup;
pub mod member;
pub mod notification;
pub mod proposal;
pub mod user;

pub use enums::{MemberRole, NotificationType, ProposalStatus};
pub use meetup::Meetup;
pub use member::Member;
pub use notification::Notification;
pub use proposal::{Proposal, ProposalWithProposer};
pub use user::User;
