//! MeetupRepository - meetups and their likes

use super::{Delete, Read, Update};
use crate::dtos::{CreateMeetupDTO, UpdateMeetupDTO};
use crate::entities::Meetup;
use chrono::Utc;
use sqlx::{Error, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

const MEETUP_COLUMNS: &str = "meetup_id, organizer_id, name, description, place, \
    place_description, image, started_at, ended_at, ad_title, ad_ended_at, is_public, \
    category, like_count, created_at";

#[derive(Clone)]
pub struct MeetupRepository {
    connection_pool: SqlitePool,
}

impl MeetupRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Inserts a meetup owned by `organizer_id` on an open connection, so the
    /// organizer membership can be written in the same transaction.
    pub async fn insert(
        conn: &mut SqliteConnection,
        organizer_id: i32,
        data: &CreateMeetupDTO,
    ) -> Result<Meetup, Error> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO meetups (organizer_id, name, description, place, place_description,
                image, started_at, ended_at, ad_title, ad_ended_at, is_public, category,
                like_count, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(organizer_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.place)
        .bind(&data.place_description)
        .bind(&data.image)
        .bind(data.started_at)
        .bind(data.ended_at)
        .bind(&data.ad_title)
        .bind(data.ad_ended_at)
        .bind(data.is_public)
        .bind(&data.category)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(Meetup {
            meetup_id: result.last_insert_rowid() as i32,
            organizer_id,
            name: data.name.clone(),
            description: data.description.clone(),
            place: data.place.clone(),
            place_description: data.place_description.clone(),
            image: data.image.clone(),
            started_at: data.started_at,
            ended_at: data.ended_at,
            ad_title: data.ad_title.clone(),
            ad_ended_at: data.ad_ended_at,
            is_public: data.is_public,
            category: data.category.clone(),
            like_count: 0,
            created_at: now,
        })
    }

    /// Likes or unlikes the meetup for `user_id` and keeps `like_count` in
    /// step, atomically.
    ///
    /// # Returns
    /// * `Ok(Some((is_like, like_count)))` - state after the toggle
    /// * `Ok(None)` - the meetup does not exist
    pub async fn toggle_like(
        &self,
        user_id: &i32,
        meetup_id: &i32,
    ) -> Result<Option<(bool, i32)>, Error> {
        let mut tx = self.connection_pool.begin().await?;

        // writing first takes the lock before anything is read
        let removed = sqlx::query("DELETE FROM meetup_likes WHERE user_id = ? AND meetup_id = ?")
            .bind(user_id)
            .bind(meetup_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            let exists =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM meetups WHERE meetup_id = ?")
                    .bind(meetup_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if exists == 0 {
                return Ok(None);
            }
        }

        let is_like = if removed > 0 {
            sqlx::query(
                "UPDATE meetups SET like_count = MAX(like_count - 1, 0) WHERE meetup_id = ?",
            )
            .bind(meetup_id)
            .execute(&mut *tx)
            .await?;
            false
        } else {
            sqlx::query("INSERT INTO meetup_likes (user_id, meetup_id) VALUES (?, ?)")
                .bind(user_id)
                .bind(meetup_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE meetups SET like_count = like_count + 1 WHERE meetup_id = ?")
                .bind(meetup_id)
                .execute(&mut *tx)
                .await?;
            true
        };

        let like_count =
            sqlx::query_scalar::<_, i32>("SELECT like_count FROM meetups WHERE meetup_id = ?")
                .bind(meetup_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(Some((is_like, like_count)))
    }
}

impl Read<Meetup, i32> for MeetupRepository {
    async fn read(&self, id: &i32) -> Result<Option<Meetup>, Error> {
        let meetup = sqlx::query_as::<_, Meetup>(&format!(
            "SELECT {} FROM meetups WHERE meetup_id = ?",
            MEETUP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(meetup)
    }
}

impl Update<Meetup, UpdateMeetupDTO, i32> for MeetupRepository {
    async fn update(&self, id: &i32, data: &UpdateMeetupDTO) -> Result<Meetup, Error> {
        let current = self.read(id).await?.ok_or(Error::RowNotFound)?;

        if data.is_empty() {
            return Ok(current);
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new("UPDATE meetups SET ");

        let mut separated = query_builder.separated(", ");
        if let Some(ref name) = data.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(ref description) = data.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description);
        }
        if let Some(ref place) = data.place {
            separated.push("place = ");
            separated.push_bind_unseparated(place);
        }
        if let Some(ref place_description) = data.place_description {
            separated.push("place_description = ");
            separated.push_bind_unseparated(place_description);
        }
        if let Some(ref image) = data.image {
            separated.push("image = ");
            separated.push_bind_unseparated(image);
        }
        if let Some(started_at) = data.started_at {
            separated.push("started_at = ");
            separated.push_bind_unseparated(started_at);
        }
        if let Some(ended_at) = data.ended_at {
            separated.push("ended_at = ");
            separated.push_bind_unseparated(ended_at);
        }
        if let Some(ref ad_title) = data.ad_title {
            separated.push("ad_title = ");
            separated.push_bind_unseparated(ad_title);
        }
        if let Some(ad_ended_at) = data.ad_ended_at {
            separated.push("ad_ended_at = ");
            separated.push_bind_unseparated(ad_ended_at);
        }
        if let Some(is_public) = data.is_public {
            separated.push("is_public = ");
            separated.push_bind_unseparated(is_public);
        }
        if let Some(ref category) = data.category {
            separated.push("category = ");
            separated.push_bind_unseparated(category);
        }

        query_builder.push(" WHERE meetup_id = ");
        query_builder.push_bind(id);

        query_builder.build().execute(&self.connection_pool).await?;

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for MeetupRepository {
    /// Members, proposals and likes go with it (ON DELETE CASCADE)
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM meetups WHERE meetup_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
