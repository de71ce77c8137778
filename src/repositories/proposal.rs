//! ProposalRepository - join proposals

use super::{Delete, Read};
use crate::dtos::CreateProposalRowDTO;
use crate::entities::{Proposal, ProposalStatus, ProposalWithProposer};
use chrono::Utc;
use sqlx::{Error, SqliteConnection, SqlitePool};

const PROPOSAL_COLUMNS: &str =
    "proposal_id, user_id, meetup_id, text, status, hidden_from_proposer, created_at, updated_at";

const PROPOSAL_WITH_PROPOSER: &str = r#"
    SELECT p.proposal_id, p.meetup_id, p.user_id, u.nickname, u.profile_image,
           p.text, p.status, p.created_at
    FROM proposals p
    JOIN users u ON u.user_id = p.user_id
"#;

#[derive(Clone)]
pub struct ProposalRepository {
    connection_pool: SqlitePool,
}

impl ProposalRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Inserts a pending proposal.
    ///
    /// A second proposal for the same (user, meetup) pair is refused by the
    /// `unique_proposal_user_meetup` constraint.
    pub async fn insert(&self, data: &CreateProposalRowDTO) -> Result<Proposal, Error> {
        let now = Utc::now();
        let status = ProposalStatus::Pending;

        let result = sqlx::query(
            r#"
            INSERT INTO proposals (user_id, meetup_id, text, status, hidden_from_proposer,
                created_at, updated_at)
            VALUES (?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(data.user_id)
        .bind(data.meetup_id)
        .bind(&data.text)
        .bind(status)
        .bind(now)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        Ok(Proposal {
            proposal_id: result.last_insert_rowid() as i32,
            user_id: data.user_id,
            meetup_id: data.meetup_id,
            text: data.text.clone(),
            status,
            hidden_from_proposer: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn find_by_user_and_meetup(
        &self,
        user_id: &i32,
        meetup_id: &i32,
    ) -> Result<Option<Proposal>, Error> {
        let proposal = sqlx::query_as::<_, Proposal>(&format!(
            "SELECT {} FROM proposals WHERE user_id = ? AND meetup_id = ?",
            PROPOSAL_COLUMNS
        ))
        .bind(user_id)
        .bind(meetup_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(proposal)
    }

    /// One page of the proposals of a meetup, oldest first
    pub async fn find_page_by_meetup_id(
        &self,
        meetup_id: &i32,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProposalWithProposer>, Error> {
        let proposals = sqlx::query_as::<_, ProposalWithProposer>(&format!(
            "{} WHERE p.meetup_id = ? ORDER BY p.proposal_id LIMIT ? OFFSET ?",
            PROPOSAL_WITH_PROPOSER
        ))
        .bind(meetup_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(proposals)
    }

    pub async fn count_by_meetup_id(&self, meetup_id: &i32) -> Result<i64, Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM proposals WHERE meetup_id = ?")
            .bind(meetup_id)
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(count)
    }

    /// Proposals sent by `user_id` that the user did not hide, newest first
    pub async fn find_visible_by_user_id(&self, user_id: &i32) -> Result<Vec<Proposal>, Error> {
        let proposals = sqlx::query_as::<_, Proposal>(&format!(
            "SELECT {} FROM proposals WHERE user_id = ? AND hidden_from_proposer = 0 \
             ORDER BY proposal_id DESC",
            PROPOSAL_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(proposals)
    }

    /// Proposals addressed to any meetup organized by `organizer_id`, newest first
    pub async fn find_received_by_organizer_id(
        &self,
        organizer_id: &i32,
    ) -> Result<Vec<ProposalWithProposer>, Error> {
        let proposals = sqlx::query_as::<_, ProposalWithProposer>(&format!(
            "{} JOIN meetups m ON m.meetup_id = p.meetup_id \
             WHERE m.organizer_id = ? ORDER BY p.proposal_id DESC",
            PROPOSAL_WITH_PROPOSER
        ))
        .bind(organizer_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(proposals)
    }

    /// Moves the proposal from `expected` to `new_status` on an open connection.
    ///
    /// The write is conditional on the current status, so of two concurrent
    /// transitions only the first one to take the write lock matches.
    ///
    /// # Returns
    /// * `Ok(false)` - no proposal with that id holds `expected`
    pub async fn update_status(
        conn: &mut SqliteConnection,
        proposal_id: &i32,
        expected: ProposalStatus,
        new_status: ProposalStatus,
    ) -> Result<bool, Error> {
        let result = sqlx::query(
            "UPDATE proposals SET status = ?, updated_at = ? WHERE proposal_id = ? AND status = ?",
        )
        .bind(new_status)
        .bind(Utc::now())
        .bind(proposal_id)
        .bind(expected)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Current status, read on an open connection
    pub async fn find_status_on(
        conn: &mut SqliteConnection,
        proposal_id: &i32,
    ) -> Result<Option<ProposalStatus>, Error> {
        let status = sqlx::query_scalar::<_, ProposalStatus>(
            "SELECT status FROM proposals WHERE proposal_id = ?",
        )
        .bind(proposal_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(status)
    }

    pub async fn hide_from_proposer(&self, proposal_id: &i32) -> Result<(), Error> {
        let result = sqlx::query(
            "UPDATE proposals SET hidden_from_proposer = 1, updated_at = ? WHERE proposal_id = ?",
        )
        .bind(Utc::now())
        .bind(proposal_id)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }
        Ok(())
    }
}

impl Read<Proposal, i32> for ProposalRepository {
    async fn read(&self, id: &i32) -> Result<Option<Proposal>, Error> {
        let proposal = sqlx::query_as::<_, Proposal>(&format!(
            "SELECT {} FROM proposals WHERE proposal_id = ?",
            PROPOSAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(proposal)
    }
}

impl Delete<i32> for ProposalRepository {
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM proposals WHERE proposal_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
