//! Proposal Lifecycle Engine
//!
//! A proposal is born `pending` and the organizer of its meetup moves it to
//! one of three terminal states:
//!
//! ```text
//!            +--> acceptance  (member row ensured, proposer notified)
//! pending ---+--> refuse      (proposer notified)
//!            +--> ignore      (silent)
//! ```
//!
//! Re-applying the state a proposal already holds succeeds without side
//! effects, except that acceptance re-ensures the membership. Moving between
//! two different terminal states is a conflict.

use crate::core::{AppError, guard, is_unique_violation};
use crate::dtos::{CreateProposalDTO, CreateProposalRowDTO, PageQuery};
use crate::entities::{Meetup, MemberRole, NotificationType, Proposal, ProposalStatus, ProposalWithProposer};
use crate::lifecycle::{MembershipManager, NotificationDispatcher};
use crate::repositories::{
    Delete, MeetupRepository, MemberRepository, ProposalRepository, Read, UserRepository,
};
use sqlx::SqlitePool;
use validator::Validate;
use tracing::{debug, info, instrument, warn};

/// What a status change request amounts to once the current state is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// pending -> terminal
    Apply,
    /// the proposal already holds the requested status
    Repeat,
}

/// Decides whether `current` may move to `target`.
pub fn plan_transition(current: ProposalStatus, target: ProposalStatus) -> Result<Transition, AppError> {
    if !target.is_terminal() {
        return Err(AppError::bad_request("A proposal cannot go back to pending"));
    }
    if current == target {
        return Ok(Transition::Repeat);
    }
    if current == ProposalStatus::Pending {
        return Ok(Transition::Apply);
    }
    Err(AppError::conflict("The proposal has already been resolved"))
}

#[derive(Clone)]
pub struct ProposalEngine {
    pool: SqlitePool,
    proposals: ProposalRepository,
    meetups: MeetupRepository,
    members: MemberRepository,
    users: UserRepository,
    notifier: NotificationDispatcher,
}

impl ProposalEngine {
    pub fn new(
        pool: SqlitePool,
        proposals: ProposalRepository,
        meetups: MeetupRepository,
        members: MemberRepository,
        users: UserRepository,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self {
            pool,
            proposals,
            meetups,
            members,
            users,
            notifier,
        }
    }

    async fn meetup(&self, meetup_id: i32) -> Result<Meetup, AppError> {
        self.meetups.read(&meetup_id).await?.ok_or_else(|| {
            warn!("Meetup not found: {}", meetup_id);
            AppError::not_found("Meetup not found")
        })
    }

    async fn proposal(&self, proposal_id: i32) -> Result<Proposal, AppError> {
        self.proposals.read(&proposal_id).await?.ok_or_else(|| {
            warn!("Proposal not found: {}", proposal_id);
            AppError::not_found("Proposal not found")
        })
    }

    /// Creates a pending proposal of `user_id` for `meetup_id` and tells the
    /// organizer about it.
    ///
    /// # Errors
    /// * `NotFound` - the meetup does not exist
    /// * `Conflict` - the user already proposed, or is already a member
    /// * `Validation` - text longer than 40 characters
    #[instrument(skip(self, data), fields(meetup_id = %meetup_id, user_id = %user_id))]
    pub async fn submit(
        &self,
        meetup_id: i32,
        user_id: i32,
        data: &CreateProposalDTO,
    ) -> Result<Proposal, AppError> {
        debug!("Submitting proposal");
        data.validate()?;

        let meetup = self.meetup(meetup_id).await?;
        let proposer = self.users.read(&user_id).await?.ok_or_else(|| {
            warn!("User not found: {}", user_id);
            AppError::not_found("User not found")
        })?;

        if self
            .members
            .find_by_user_and_meetup(&user_id, &meetup_id)
            .await?
            .is_some()
        {
            warn!("User {} is already a member of meetup {}", user_id, meetup_id);
            return Err(AppError::conflict("You are already a member of this meetup"));
        }

        if self
            .proposals
            .find_by_user_and_meetup(&user_id, &meetup_id)
            .await?
            .is_some()
        {
            warn!("User {} already proposed to meetup {}", user_id, meetup_id);
            return Err(AppError::conflict("Proposal already submitted"));
        }

        let row = CreateProposalRowDTO {
            user_id,
            meetup_id,
            text: data.text.clone(),
        };
        // the constraint settles concurrent submissions that passed the check above
        let proposal = self.proposals.insert(&row).await.map_err(|e| {
            if is_unique_violation(&e) {
                warn!("Concurrent duplicate proposal for meetup {}", meetup_id);
                AppError::conflict("Proposal already submitted")
            } else {
                AppError::from(e)
            }
        })?;

        info!("Proposal {} submitted", proposal.proposal_id);

        self.notifier
            .notify(
                NotificationType::ReceivedProposal,
                proposal.proposal_id,
                user_id,
                meetup.organizer_id,
                &format!("{} sent a proposal to {}", proposer.nickname, meetup.ad_title),
            )
            .await;

        Ok(proposal)
    }

    #[instrument(skip(self), fields(proposal_id = %proposal_id, acting_user_id = %acting_user_id))]
    pub async fn accept(&self, proposal_id: i32, acting_user_id: i32) -> Result<Proposal, AppError> {
        self.resolve(proposal_id, acting_user_id, ProposalStatus::Acceptance)
            .await
    }

    #[instrument(skip(self), fields(proposal_id = %proposal_id, acting_user_id = %acting_user_id))]
    pub async fn refuse(&self, proposal_id: i32, acting_user_id: i32) -> Result<Proposal, AppError> {
        self.resolve(proposal_id, acting_user_id, ProposalStatus::Refuse)
            .await
    }

    #[instrument(skip(self), fields(proposal_id = %proposal_id, acting_user_id = %acting_user_id))]
    pub async fn ignore(&self, proposal_id: i32, acting_user_id: i32) -> Result<Proposal, AppError> {
        self.resolve(proposal_id, acting_user_id, ProposalStatus::Ignore)
            .await
    }

    /// Shared path of accept, refuse and ignore. The status write and the
    /// membership write commit together; the notification follows the commit.
    async fn resolve(
        &self,
        proposal_id: i32,
        acting_user_id: i32,
        target: ProposalStatus,
    ) -> Result<Proposal, AppError> {
        let proposal = self.proposal(proposal_id).await?;
        let meetup = self.meetup(proposal.meetup_id).await?;
        guard::require_organizer(&meetup, acting_user_id)?;

        let transition = plan_transition(proposal.status, target).inspect_err(|_| {
            warn!(
                "Rejected transition of proposal {} from {:?} to {:?}",
                proposal_id, proposal.status, target
            );
        })?;
        debug!("Transition {:?} to {:?}", transition, target);

        // the conditional write is the first statement of the transaction, so
        // concurrent resolutions of one proposal queue on the write lock
        let mut tx = self.pool.begin().await?;
        let expected = match transition {
            Transition::Apply => ProposalStatus::Pending,
            Transition::Repeat => target,
        };
        let transition =
            if ProposalRepository::update_status(&mut tx, &proposal_id, expected, target).await? {
                transition
            } else {
                // another request resolved it between our read and our write
                match ProposalRepository::find_status_on(&mut tx, &proposal_id).await? {
                    Some(current) if current == target => Transition::Repeat,
                    Some(current) => {
                        warn!(
                            "Proposal {} was resolved concurrently as {:?}",
                            proposal_id, current
                        );
                        return Err(AppError::conflict("The proposal has already been resolved"));
                    }
                    None => return Err(AppError::not_found("Proposal not found")),
                }
            };

        if target == ProposalStatus::Acceptance {
            MembershipManager::add_member(
                &mut tx,
                proposal.user_id,
                proposal.meetup_id,
                MemberRole::Member,
            )
            .await?;
        }
        tx.commit().await?;

        if transition == Transition::Apply {
            info!("Proposal {} moved to {:?}", proposal_id, target);
            let message = match target {
                ProposalStatus::Acceptance => Some(format!("{} accepted your proposal", meetup.ad_title)),
                ProposalStatus::Refuse => Some(format!("{} refused your proposal", meetup.ad_title)),
                _ => None,
            };
            if let Some(message) = message {
                self.notifier
                    .notify(
                        NotificationType::SentProposal,
                        proposal_id,
                        acting_user_id,
                        proposal.user_id,
                        &message,
                    )
                    .await;
            }
        }

        self.proposal(proposal_id).await
    }

    /// Archives the proposal from the proposer's own view. Status untouched.
    #[instrument(skip(self), fields(proposal_id = %proposal_id, acting_user_id = %acting_user_id))]
    pub async fn hide(&self, proposal_id: i32, acting_user_id: i32) -> Result<(), AppError> {
        let proposal = self.proposal(proposal_id).await?;
        guard::require_self(&proposal, acting_user_id)?;

        self.proposals.hide_from_proposer(&proposal_id).await?;
        info!("Proposal {} hidden from its proposer", proposal_id);
        Ok(())
    }

    /// Hard delete, allowed to the organizer and to the proposer.
    #[instrument(skip(self), fields(proposal_id = %proposal_id, acting_user_id = %acting_user_id))]
    pub async fn delete(&self, proposal_id: i32, acting_user_id: i32) -> Result<(), AppError> {
        let proposal = self.proposal(proposal_id).await?;
        let meetup = self.meetup(proposal.meetup_id).await?;
        guard::require_organizer_or_self(&meetup, &proposal, acting_user_id)?;

        if !self.proposals.delete(&proposal_id).await? {
            return Err(AppError::not_found("Proposal not found"));
        }
        info!("Proposal {} deleted", proposal_id);
        Ok(())
    }

    /// One page of the proposals of a meetup, for its organizer only.
    #[instrument(skip(self, page), fields(meetup_id = %meetup_id, acting_user_id = %acting_user_id))]
    pub async fn list(
        &self,
        meetup_id: i32,
        acting_user_id: i32,
        page: &PageQuery,
    ) -> Result<(Vec<ProposalWithProposer>, i64), AppError> {
        let (limit, offset) = page.limit_offset().ok_or_else(|| {
            warn!("Invalid pagination: {:?}", page);
            AppError::bad_request("Invalid pagination parameters")
        })?;

        let meetup = self.meetup(meetup_id).await?;
        guard::require_organizer(&meetup, acting_user_id)?;

        let result = self
            .proposals
            .find_page_by_meetup_id(&meetup_id, limit, offset)
            .await?;
        let total = self.proposals.count_by_meetup_id(&meetup_id).await?;
        debug!("Returning {} of {} proposals", result.len(), total);

        Ok((result, total))
    }

    /// The caller's own proposal for the meetup, if any
    #[instrument(skip(self), fields(meetup_id = %meetup_id, acting_user_id = %acting_user_id))]
    pub async fn get_mine(
        &self,
        meetup_id: i32,
        acting_user_id: i32,
    ) -> Result<Option<Proposal>, AppError> {
        self.meetup(meetup_id).await?;
        Ok(self
            .proposals
            .find_by_user_and_meetup(&acting_user_id, &meetup_id)
            .await?)
    }

    pub async fn list_sent(&self, user_id: i32) -> Result<Vec<Proposal>, AppError> {
        Ok(self.proposals.find_visible_by_user_id(&user_id).await?)
    }

    pub async fn list_received(&self, organizer_id: i32) -> Result<Vec<ProposalWithProposer>, AppError> {
        Ok(self
            .proposals
            .find_received_by_organizer_id(&organizer_id)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use crate::core::database::connect_in_memory;
    use crate::entities::User;
    use crate::lifecycle::test_support::{file_pool, is_member, seed_user, test_meetup};
    use crate::repositories::NotificationRepository;

    #[test]
    fn test_plan_from_pending() {
        for target in [ProposalStatus::Acceptance, ProposalStatus::Refuse, ProposalStatus::Ignore] {
            assert_eq!(plan_transition(ProposalStatus::Pending, target).unwrap(), Transition::Apply);
        }
    }

    #[test]
    fn test_plan_repeat_is_idempotent() {
        for status in [ProposalStatus::Acceptance, ProposalStatus::Refuse, ProposalStatus::Ignore] {
            assert_eq!(plan_transition(status, status).unwrap(), Transition::Repeat);
        }
    }

    #[test]
    fn test_plan_between_terminal_states_conflicts() {
        let err = plan_transition(ProposalStatus::Refuse, ProposalStatus::Acceptance).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        let err = plan_transition(ProposalStatus::Acceptance, ProposalStatus::Ignore).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_plan_back_to_pending_is_rejected() {
        let err = plan_transition(ProposalStatus::Pending, ProposalStatus::Pending).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    struct Fixture {
        pool: SqlitePool,
        engine: ProposalEngine,
        members: MembershipManager,
        notifications: NotificationRepository,
        organizer: User,
        meetup: Meetup,
    }

    async fn setup() -> Fixture {
        setup_on(connect_in_memory().await.unwrap()).await
    }

    /// Fixture over a file database with several connections, so requests
    /// really run side by side
    async fn setup_shared() -> (tempfile::TempDir, Fixture) {
        let dir = tempfile::tempdir().unwrap();
        let pool = file_pool(&dir).await;
        (dir, setup_on(pool).await)
    }

    async fn setup_on(pool: SqlitePool) -> Fixture {
        let meetups = MeetupRepository::new(pool.clone());
        let member_repo = MemberRepository::new(pool.clone());
        let notifications = NotificationRepository::new(pool.clone());
        let members = MembershipManager::new(pool.clone(), meetups.clone(), member_repo.clone());
        let engine = ProposalEngine::new(
            pool.clone(),
            ProposalRepository::new(pool.clone()),
            meetups,
            member_repo,
            UserRepository::new(pool.clone()),
            NotificationDispatcher::new(notifications.clone()),
        );

        let organizer = seed_user(&pool, "alice").await;
        let (meetup, _) = members
            .create_meetup(organizer.user_id, &test_meetup())
            .await
            .unwrap();

        Fixture {
            pool,
            engine,
            members,
            notifications,
            organizer,
            meetup,
        }
    }

    fn text(s: &str) -> CreateProposalDTO {
        CreateProposalDTO { text: s.to_string() }
    }

    #[tokio::test]
    async fn test_submit_then_accept_scenario() {
        let f = setup().await;
        let bob = seed_user(&f.pool, "bob").await;

        let proposal = f
            .engine
            .submit(f.meetup.meetup_id, bob.user_id, &text("let me in"))
            .await
            .unwrap();
        assert_eq!(proposal.status, ProposalStatus::Pending);

        let inbox = f.notifications.find_latest_by_recipient(&f.organizer.user_id, 10).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].notification_type, NotificationType::ReceivedProposal);
        assert_eq!(inbox[0].url, "/my-space/received-proposal");

        let accepted = f
            .engine
            .accept(proposal.proposal_id, f.organizer.user_id)
            .await
            .unwrap();
        assert_eq!(accepted.status, ProposalStatus::Acceptance);

        let members = f.members.list_members(f.meetup.meetup_id).await.unwrap();
        assert_eq!(members.len(), 2);
        assert!(is_member(&f.pool, bob.user_id, f.meetup.meetup_id).await);

        let inbox = f.notifications.find_latest_by_recipient(&bob.user_id, 10).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].notification_type, NotificationType::SentProposal);
        assert_eq!(inbox[0].sender_id, f.organizer.user_id);
    }

    #[tokio::test]
    async fn test_duplicate_submit_conflicts() {
        let f = setup().await;
        let carol = seed_user(&f.pool, "carol").await;

        f.engine.submit(f.meetup.meetup_id, carol.user_id, &text("hi")).await.unwrap();
        let err = f
            .engine
            .submit(f.meetup.meetup_id, carol.user_id, &text("something else"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let count = f.engine.list(f.meetup.meetup_id, f.organizer.user_id, &PageQuery::default())
            .await
            .unwrap()
            .1;
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_submit_edge_cases() {
        let f = setup().await;
        let bob = seed_user(&f.pool, "bob").await;

        let err = f.engine.submit(999, bob.user_id, &text("hi")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = f
            .engine
            .submit(f.meetup.meetup_id, bob.user_id, &text(&"x".repeat(41)))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        // the organizer is already a member
        let err = f
            .engine
            .submit(f.meetup.meetup_id, f.organizer.user_id, &text("me too"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        // empty text is allowed
        f.engine.submit(f.meetup.meetup_id, bob.user_id, &text("")).await.unwrap();
    }

    #[tokio::test]
    async fn test_accept_twice_keeps_one_membership() {
        let f = setup().await;
        let bob = seed_user(&f.pool, "bob").await;
        let proposal = f.engine.submit(f.meetup.meetup_id, bob.user_id, &text("hi")).await.unwrap();

        f.engine.accept(proposal.proposal_id, f.organizer.user_id).await.unwrap();
        let again = f.engine.accept(proposal.proposal_id, f.organizer.user_id).await.unwrap();
        assert_eq!(again.status, ProposalStatus::Acceptance);

        assert_eq!(f.members.list_members(f.meetup.meetup_id).await.unwrap().len(), 2);
        // the repeat does not notify again
        let inbox = f.notifications.find_latest_by_recipient(&bob.user_id, 10).await.unwrap();
        assert_eq!(inbox.len(), 1);
    }

    #[tokio::test]
    async fn test_terminal_states_do_not_flip() {
        let f = setup().await;
        let bob = seed_user(&f.pool, "bob").await;
        let proposal = f.engine.submit(f.meetup.meetup_id, bob.user_id, &text("hi")).await.unwrap();

        f.engine.refuse(proposal.proposal_id, f.organizer.user_id).await.unwrap();
        let err = f.engine.accept(proposal.proposal_id, f.organizer.user_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        assert!(!is_member(&f.pool, bob.user_id, f.meetup.meetup_id).await);
        let current = f.engine.get_mine(f.meetup.meetup_id, bob.user_id).await.unwrap().unwrap();
        assert_eq!(current.status, ProposalStatus::Refuse);
    }

    #[tokio::test]
    async fn test_ignore_is_silent() {
        let f = setup().await;
        let bob = seed_user(&f.pool, "bob").await;
        let proposal = f.engine.submit(f.meetup.meetup_id, bob.user_id, &text("hi")).await.unwrap();

        let ignored = f.engine.ignore(proposal.proposal_id, f.organizer.user_id).await.unwrap();
        assert_eq!(ignored.status, ProposalStatus::Ignore);

        let inbox = f.notifications.find_latest_by_recipient(&bob.user_id, 10).await.unwrap();
        assert!(inbox.is_empty());
    }

    #[tokio::test]
    async fn test_only_the_organizer_resolves() {
        let f = setup().await;
        let bob = seed_user(&f.pool, "bob").await;
        let dave = seed_user(&f.pool, "dave").await;
        let proposal = f.engine.submit(f.meetup.meetup_id, bob.user_id, &text("hi")).await.unwrap();

        for user_id in [dave.user_id, bob.user_id] {
            let err = f.engine.accept(proposal.proposal_id, user_id).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Forbidden);
        }

        let current = f.engine.get_mine(f.meetup.meetup_id, bob.user_id).await.unwrap().unwrap();
        assert_eq!(current.status, ProposalStatus::Pending);

        let err = f.engine.refuse(12345, f.organizer.user_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_hide_is_proposer_only() {
        let f = setup().await;
        let bob = seed_user(&f.pool, "bob").await;
        let proposal = f.engine.submit(f.meetup.meetup_id, bob.user_id, &text("hi")).await.unwrap();

        let err = f.engine.hide(proposal.proposal_id, f.organizer.user_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        f.engine.hide(proposal.proposal_id, bob.user_id).await.unwrap();
        assert!(f.engine.list_sent(bob.user_id).await.unwrap().is_empty());

        // still visible to the organizer, still pending
        let received = f.engine.list_received(f.organizer.user_id).await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].status, ProposalStatus::Pending);
    }

    #[tokio::test]
    async fn test_delete_symmetry() {
        let f = setup().await;
        let bob = seed_user(&f.pool, "bob").await;
        let carol = seed_user(&f.pool, "carol").await;
        let dave = seed_user(&f.pool, "dave").await;

        let by_bob = f.engine.submit(f.meetup.meetup_id, bob.user_id, &text("hi")).await.unwrap();
        let by_carol = f.engine.submit(f.meetup.meetup_id, carol.user_id, &text("hi")).await.unwrap();

        let err = f.engine.delete(by_bob.proposal_id, dave.user_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        f.engine.delete(by_bob.proposal_id, bob.user_id).await.unwrap();
        f.engine.delete(by_carol.proposal_id, f.organizer.user_id).await.unwrap();

        assert!(f.engine.get_mine(f.meetup.meetup_id, bob.user_id).await.unwrap().is_none());
        let err = f.engine.delete(by_bob.proposal_id, bob.user_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_is_paginated_and_organizer_only() {
        let f = setup().await;
        for name in ["u1", "u2", "u3"] {
            let user = seed_user(&f.pool, name).await;
            f.engine.submit(f.meetup.meetup_id, user.user_id, &text(name)).await.unwrap();
        }

        let page = PageQuery { page: Some(2), size: Some(2) };
        let (result, total) = f.engine.list(f.meetup.meetup_id, f.organizer.user_id, &page).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].nickname, "u3");

        let stranger = seed_user(&f.pool, "stranger").await;
        let err = f
            .engine
            .list(f.meetup.meetup_id, stranger.user_id, &PageQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let bad = PageQuery { page: Some(0), size: None };
        let err = f.engine.list(f.meetup.meetup_id, f.organizer.user_id, &bad).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_get_mine_absent_is_not_an_error() {
        let f = setup().await;
        let bob = seed_user(&f.pool, "bob").await;
        assert!(f.engine.get_mine(f.meetup.meetup_id, bob.user_id).await.unwrap().is_none());
    }

    async fn count_members(pool: &SqlitePool, user_id: i32, meetup_id: i32) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM members WHERE user_id = ? AND meetup_id = ?",
        )
        .bind(user_id)
        .bind(meetup_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submits_keep_one_proposal() {
        let (_dir, f) = setup_shared().await;
        let meetup_id = f.meetup.meetup_id;

        for run in 0..10 {
            let user_id = seed_user(&f.pool, &format!("carol{}", run)).await.user_id;
            let first = tokio::spawn({
                let engine = f.engine.clone();
                async move { engine.submit(meetup_id, user_id, &text("hi")).await }
            });
            let second = tokio::spawn({
                let engine = f.engine.clone();
                async move { engine.submit(meetup_id, user_id, &text("hello")).await }
            });
            let (first, second) = tokio::join!(first, second);
            let results = [first.unwrap(), second.unwrap()];

            assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1, "run {}", run);
            let err = results.into_iter().find_map(Result::err).unwrap();
            assert_eq!(err.kind(), ErrorKind::Conflict, "run {}", run);
        }

        let (_, total) = f
            .engine
            .list(meetup_id, f.organizer.user_id, &PageQuery { page: None, size: Some(100) })
            .await
            .unwrap();
        assert_eq!(total, 10);
        let inbox = f.notifications.find_latest_by_recipient(&f.organizer.user_id, 100).await.unwrap();
        assert_eq!(inbox.len(), 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_accepts_keep_one_membership() {
        let (_dir, f) = setup_shared().await;
        let meetup_id = f.meetup.meetup_id;
        let organizer_id = f.organizer.user_id;

        for run in 0..10 {
            let user = seed_user(&f.pool, &format!("bob{}", run)).await;
            let proposal = f.engine.submit(meetup_id, user.user_id, &text("hi")).await.unwrap();
            let proposal_id = proposal.proposal_id;

            let first = tokio::spawn({
                let engine = f.engine.clone();
                async move { engine.accept(proposal_id, organizer_id).await }
            });
            let second = tokio::spawn({
                let engine = f.engine.clone();
                async move { engine.accept(proposal_id, organizer_id).await }
            });
            let (first, second) = tokio::join!(first, second);

            for result in [first.unwrap(), second.unwrap()] {
                assert_eq!(result.unwrap().status, ProposalStatus::Acceptance, "run {}", run);
            }
            assert_eq!(count_members(&f.pool, user.user_id, meetup_id).await, 1, "run {}", run);
            let inbox = f.notifications.find_latest_by_recipient(&user.user_id, 100).await.unwrap();
            assert_eq!(inbox.len(), 1, "run {}", run);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_accept_and_refuse_agree() {
        let (_dir, f) = setup_shared().await;
        let meetup_id = f.meetup.meetup_id;
        let organizer_id = f.organizer.user_id;

        for run in 0..20 {
            let user = seed_user(&f.pool, &format!("dave{}", run)).await;
            let proposal = f.engine.submit(meetup_id, user.user_id, &text("hi")).await.unwrap();
            let proposal_id = proposal.proposal_id;

            let accept = tokio::spawn({
                let engine = f.engine.clone();
                async move { engine.accept(proposal_id, organizer_id).await }
            });
            let refuse = tokio::spawn({
                let engine = f.engine.clone();
                async move { engine.refuse(proposal_id, organizer_id).await }
            });
            let (accept, refuse) = tokio::join!(accept, refuse);
            let (accept, refuse) = (accept.unwrap(), refuse.unwrap());

            // exactly one side wins, the other sees a conflict
            assert_ne!(accept.is_ok(), refuse.is_ok(), "run {}", run);
            let loser = if accept.is_ok() { refuse.unwrap_err() } else { accept.unwrap_err() };
            assert_eq!(loser.kind(), ErrorKind::Conflict, "run {}", run);

            let status = f
                .engine
                .get_mine(meetup_id, user.user_id)
                .await
                .unwrap()
                .unwrap()
                .status;
            let members = count_members(&f.pool, user.user_id, meetup_id).await;
            match status {
                ProposalStatus::Acceptance => assert_eq!(members, 1, "run {}", run),
                ProposalStatus::Refuse => assert_eq!(members, 0, "run {}", run),
                other => panic!("run {}: unexpected status {:?}", run, other),
            }
            let inbox = f.notifications.find_latest_by_recipient(&user.user_id, 100).await.unwrap();
            assert_eq!(inbox.len(), 1, "run {}", run);
        }
    }
}
