//! Application State - everything the handlers need, built once at startup

use crate::lifecycle::{MembershipManager, NotificationDispatcher, ProposalEngine};
use crate::repositories::{
    MeetupRepository, MemberRepository, NotificationRepository, ProposalRepository,
    UserRepository,
};
use sqlx::SqlitePool;

/// Shared by every route and middleware behind an `Arc`.
pub struct AppState {
    /// Identities known to the service
    pub user: UserRepository,

    pub meetup: MeetupRepository,

    /// Notification feed reads; writes go through the lifecycle services
    pub notification: NotificationRepository,

    /// Proposal lifecycle: submit, accept, refuse, ignore, hide, delete
    pub proposals: ProposalEngine,

    /// Meetup founding and membership management
    pub members: MembershipManager,

    /// Secret key for JWT tokens
    pub jwt_secret: String,
}

impl AppState {
    /// Wires repositories and core services on top of a single pool.
    ///
    /// # Arguments
    /// * `pool` - SQLite connection pool shared by every repository
    /// * `jwt_secret` - Key used to verify the JWT tokens
    pub fn new(pool: SqlitePool, jwt_secret: String) -> Self {
        let users = UserRepository::new(pool.clone());
        let meetups = MeetupRepository::new(pool.clone());
        let member_repo = MemberRepository::new(pool.clone());
        let proposal_repo = ProposalRepository::new(pool.clone());
        let notification_repo = NotificationRepository::new(pool.clone());

        let notifier = NotificationDispatcher::new(notification_repo.clone());
        let members = MembershipManager::new(pool.clone(), meetups.clone(), member_repo.clone());
        let proposals = ProposalEngine::new(
            pool,
            proposal_repo,
            meetups.clone(),
            member_repo,
            users.clone(),
            notifier,
        );

        Self {
            user: users,
            meetup: meetups,
            notification: notification_repo,
            proposals,
            members,
            jwt_secret,
        }
    }
}
