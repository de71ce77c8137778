//! MemberRepository - membership rows of meetups

use super::{Delete, Read};
use crate::dtos::CreateMemberDTO;
use crate::entities::{Member, MemberRole};
use chrono::Utc;
use sqlx::{Error, SqliteConnection, SqlitePool};

#[derive(Clone)]
pub struct MemberRepository {
    connection_pool: SqlitePool,
}

impl MemberRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Inserts a member row on an open connection.
    ///
    /// A second row for the same (user, meetup) pair is refused by the
    /// `unique_member_user_meetup` constraint and surfaces as a database error.
    pub async fn insert(conn: &mut SqliteConnection, data: &CreateMemberDTO) -> Result<Member, Error> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO members (user_id, meetup_id, role, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(data.user_id)
        .bind(data.meetup_id)
        .bind(data.role)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(Member {
            member_id: result.last_insert_rowid() as i32,
            user_id: data.user_id,
            meetup_id: data.meetup_id,
            role: data.role,
            created_at: now,
        })
    }

    /// Member row of `user_id` in `meetup_id`, read on an open connection
    pub async fn find_by_user_and_meetup_on(
        conn: &mut SqliteConnection,
        user_id: &i32,
        meetup_id: &i32,
    ) -> Result<Option<Member>, Error> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            SELECT member_id, user_id, meetup_id, role, created_at
            FROM members
            WHERE user_id = ? AND meetup_id = ?
            "#,
        )
        .bind(user_id)
        .bind(meetup_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(member)
    }

    pub async fn find_by_user_and_meetup(
        &self,
        user_id: &i32,
        meetup_id: &i32,
    ) -> Result<Option<Member>, Error> {
        let mut conn = self.connection_pool.acquire().await?;
        Self::find_by_user_and_meetup_on(&mut conn, user_id, meetup_id).await
    }

    /// All members of a meetup, organizer first
    pub async fn find_many_by_meetup_id(&self, meetup_id: &i32) -> Result<Vec<Member>, Error> {
        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT member_id, user_id, meetup_id, role, created_at
            FROM members
            WHERE meetup_id = ?
            ORDER BY CASE role WHEN 'ORGANIZER' THEN 0 ELSE 1 END, member_id
            "#,
        )
        .bind(meetup_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(members)
    }

    pub async fn count_by_role(&self, meetup_id: &i32, role: MemberRole) -> Result<i64, Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM members WHERE meetup_id = ? AND role = ?",
        )
        .bind(meetup_id)
        .bind(role)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(count)
    }
}

impl Read<Member, i32> for MemberRepository {
    async fn read(&self, id: &i32) -> Result<Option<Member>, Error> {
        let member = sqlx::query_as::<_, Member>(
            "SELECT member_id, user_id, meetup_id, role, created_at FROM members WHERE member_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(member)
    }
}

impl Delete<i32> for MemberRepository {
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM members WHERE member_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
