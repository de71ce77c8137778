//! Repositories module - one repository per table
//!
//! Queries are checked at run time (`query`/`query_as` with `FromRow`), so the
//! crate builds without a live database. Every repository owns a clone of the
//! pool; functions that take a `&mut SqliteConnection` instead are meant to be
//! called inside a transaction opened by the caller (`pool.begin()`), and all
//! writes that touch more than one table go through them.
//!
//! Uniqueness of members and proposals per (user, meetup) is enforced by the
//! schema, not by a read-then-write in the application: callers detect the
//! violation with `core::is_unique_violation`.

pub mod meetup;
pub mod member;
pub mod notification;
pub mod proposal;
pub mod traits;
pub mod user;

pub use traits::{Create, Delete, Read, ReadMany, Update};

pub use meetup::MeetupRepository;
pub use member::MemberRepository;
pub use notification::NotificationRepository;
pub use proposal::ProposalRepository;
pub use user::UserRepository;
