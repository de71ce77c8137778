//! UserRepository - identities mirrored from the identity provider

use super::{Create, Read, ReadMany};
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use sqlx::{Error, QueryBuilder, Sqlite, SqlitePool};

#[derive(Clone)]
pub struct UserRepository {
    connection_pool: SqlitePool,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> UserRepository {
        Self { connection_pool }
    }

    /// Nicknames are unique
    pub async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, nickname, profile_image FROM users WHERE nickname = ?",
        )
        .bind(nickname)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        let result = sqlx::query("INSERT INTO users (nickname, profile_image) VALUES (?, ?)")
            .bind(&data.nickname)
            .bind(&data.profile_image)
            .execute(&self.connection_pool)
            .await?;

        Ok(User {
            user_id: result.last_insert_rowid() as i32,
            nickname: data.nickname.clone(),
            profile_image: data.profile_image.clone(),
        })
    }
}

impl Read<User, i32> for UserRepository {
    async fn read(&self, id: &i32) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, nickname, profile_image FROM users WHERE user_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }
}

impl ReadMany<User, i32> for UserRepository {
    async fn read_many(&self, ids: &[i32]) -> Result<Vec<User>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new(
            "SELECT user_id, nickname, profile_image FROM users WHERE user_id IN (",
        );
        let mut separated = query_builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let users = query_builder
            .build_query_as::<User>()
            .fetch_all(&self.connection_pool)
            .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::connect_in_memory;
    use crate::core::is_unique_violation;

    fn dto(nickname: &str) -> CreateUserDTO {
        CreateUserDTO {
            nickname: nickname.to_string(),
            profile_image: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_read() {
        let repo = UserRepository::new(connect_in_memory().await.unwrap());
        let alice = repo.create(&dto("alice")).await.unwrap();

        let found = repo.read(&alice.user_id).await.unwrap();
        assert_eq!(found, Some(alice.clone()));
        assert_eq!(repo.find_by_nickname("alice").await.unwrap(), Some(alice));
        assert_eq!(repo.read(&999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_nickname_is_unique() {
        let repo = UserRepository::new(connect_in_memory().await.unwrap());
        repo.create(&dto("alice")).await.unwrap();
        let err = repo.create(&dto("alice")).await.unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_read_many_skips_missing_ids() {
        let repo = UserRepository::new(connect_in_memory().await.unwrap());
        let alice = repo.create(&dto("alice")).await.unwrap();
        let bob = repo.create(&dto("bob")).await.unwrap();

        let users = repo
            .read_many(&[alice.user_id, bob.user_id, 404])
            .await
            .unwrap();
        assert_eq!(users.len(), 2);
        assert!(repo.read_many(&[]).await.unwrap().is_empty());
    }
}
