//! Lifecycle Module - the domain services behind the HTTP handlers
//!
//! - `ProposalEngine`: proposal state machine and its side effects
//! - `MembershipManager`: meetup founding and member rows
//! - `NotificationDispatcher`: fire-and-forget notifications

pub mod membership;
pub mod notification;
pub mod proposal;

pub use membership::MembershipManager;
pub use notification::NotificationDispatcher;
pub use proposal::{ProposalEngine, Transition, plan_transition};
