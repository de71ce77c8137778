//! Membership Manager - owns the member rows of every meetup
//!
//! A member row exists for the organizer from the moment the meetup exists,
//! and for every user whose proposal was accepted. There is at most one row
//! per (user, meetup); the schema enforces it and `add_member` turns the
//! resulting violation into a no-op.

use crate::core::{AppError, guard, is_unique_violation};
use crate::dtos::{CreateMeetupDTO, CreateMemberDTO};
use crate::entities::{Meetup, Member, MemberRole};
use crate::repositories::{Delete, MeetupRepository, MemberRepository, Read};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, instrument, warn};

#[derive(Clone)]
pub struct MembershipManager {
    pool: SqlitePool,
    meetups: MeetupRepository,
    members: MemberRepository,
}

impl MembershipManager {
    pub fn new(pool: SqlitePool, meetups: MeetupRepository, members: MemberRepository) -> Self {
        Self {
            pool,
            meetups,
            members,
        }
    }

    /// Creates the meetup and the ORGANIZER membership of its creator in a
    /// single transaction: either both rows exist afterwards or neither does.
    #[instrument(skip(self, data), fields(organizer_id = %organizer_id))]
    pub async fn create_meetup(
        &self,
        organizer_id: i32,
        data: &CreateMeetupDTO,
    ) -> Result<(Meetup, Member), AppError> {
        debug!("Founding meetup");
        let mut tx = self.pool.begin().await?;

        let meetup = MeetupRepository::insert(&mut tx, organizer_id, data).await?;
        let organizer = Self::ensure_organizer_membership(&mut tx, &meetup).await?;

        tx.commit().await?;

        info!("Meetup {} created", meetup.meetup_id);
        Ok((meetup, organizer))
    }

    /// Writes the organizer's own member row. Called once, right after the
    /// meetup row, on the same transaction.
    pub async fn ensure_organizer_membership(
        conn: &mut SqliteConnection,
        meetup: &Meetup,
    ) -> Result<Member, AppError> {
        let member = MemberRepository::insert(
            conn,
            &CreateMemberDTO {
                user_id: meetup.organizer_id,
                meetup_id: meetup.meetup_id,
                role: MemberRole::Organizer,
            },
        )
        .await?;

        Ok(member)
    }

    /// Adds `user_id` to `meetup_id`, or returns the existing row if the user
    /// is already a member. Never creates a second row.
    pub async fn add_member(
        conn: &mut SqliteConnection,
        user_id: i32,
        meetup_id: i32,
        role: MemberRole,
    ) -> Result<Member, AppError> {
        let data = CreateMemberDTO {
            user_id,
            meetup_id,
            role,
        };

        match MemberRepository::insert(conn, &data).await {
            Ok(member) => {
                debug!("User {} joined meetup {}", user_id, meetup_id);
                Ok(member)
            }
            Err(e) if is_unique_violation(&e) => {
                debug!("User {} is already a member of meetup {}", user_id, meetup_id);
                MemberRepository::find_by_user_and_meetup_on(conn, &user_id, &meetup_id)
                    .await?
                    .ok_or_else(|| AppError::internal_server_error("Membership vanished"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Removes a member. Allowed to the member themselves (leave) and to the
    /// organizer (kick). The last ORGANIZER row cannot be removed.
    #[instrument(skip(self), fields(member_id = %member_id, acting_user_id = %acting_user_id))]
    pub async fn remove_member(&self, member_id: i32, acting_user_id: i32) -> Result<(), AppError> {
        let member = self.members.read(&member_id).await?.ok_or_else(|| {
            warn!("Member not found: {}", member_id);
            AppError::not_found("Member not found")
        })?;

        let meetup = self.meetups.read(&member.meetup_id).await?.ok_or_else(|| {
            warn!("Meetup not found: {}", member.meetup_id);
            AppError::not_found("Meetup not found")
        })?;

        guard::require_organizer_or_self(&meetup, &member, acting_user_id)?;

        if member.role == MemberRole::Organizer {
            let organizers = self
                .members
                .count_by_role(&meetup.meetup_id, MemberRole::Organizer)
                .await?;
            if organizers <= 1 {
                warn!("Attempted to remove the organizer of meetup {}", meetup.meetup_id);
                return Err(AppError::conflict(
                    "The organizer cannot leave the meetup. Delete the meetup instead.",
                ));
            }
        }

        if !self.members.delete(&member_id).await? {
            return Err(AppError::not_found("Member not found"));
        }

        info!("Member {} removed from meetup {}", member_id, meetup.meetup_id);
        Ok(())
    }

    /// Every member of an existing meetup, organizer first
    #[instrument(skip(self), fields(meetup_id = %meetup_id))]
    pub async fn list_members(&self, meetup_id: i32) -> Result<Vec<Member>, AppError> {
        if self.meetups.read(&meetup_id).await?.is_none() {
            warn!("Meetup not found: {}", meetup_id);
            return Err(AppError::not_found("Meetup not found"));
        }

        let members = self.members.find_many_by_meetup_id(&meetup_id).await?;
        debug!("Found {} members", members.len());
        Ok(members)
    }
}
