//! NotificationRepository - append-only activity feed

use super::Create;
use crate::dtos::CreateNotificationDTO;
use crate::entities::Notification;
use chrono::Utc;
use sqlx::{Error, SqlitePool};

#[derive(Clone)]
pub struct NotificationRepository {
    connection_pool: SqlitePool,
}

impl NotificationRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Latest `limit` notifications addressed to `recipient_id`
    pub async fn find_latest_by_recipient(
        &self,
        recipient_id: &i32,
        limit: i64,
    ) -> Result<Vec<Notification>, Error> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT notification_id, notification_type, model_id, sender_id, recipient_id,
                   message, url, is_read, created_at
            FROM notifications
            WHERE recipient_id = ?
            ORDER BY created_at DESC, notification_id DESC
            LIMIT ?
            "#,
        )
        .bind(recipient_id)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(notifications)
    }

    /// Marks a notification read; only its recipient may do it
    ///
    /// # Returns
    /// * `Ok(false)` - no notification with that id addressed to `recipient_id`
    pub async fn mark_read(&self, notification_id: &i32, recipient_id: &i32) -> Result<bool, Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = 1 WHERE notification_id = ? AND recipient_id = ?",
        )
        .bind(notification_id)
        .bind(recipient_id)
        .execute(&self.connection_pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl Create<Notification, CreateNotificationDTO> for NotificationRepository {
    async fn create(&self, data: &CreateNotificationDTO) -> Result<Notification, Error> {
        let now = Utc::now();
        let url = data.notification_type.deep_link(data.model_id);

        let result = sqlx::query(
            r#"
            INSERT INTO notifications (notification_type, model_id, sender_id, recipient_id,
                message, url, is_read, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(data.notification_type)
        .bind(data.model_id)
        .bind(data.sender_id)
        .bind(data.recipient_id)
        .bind(&data.message)
        .bind(&url)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        Ok(Notification {
            notification_id: result.last_insert_rowid() as i32,
            notification_type: data.notification_type,
            model_id: data.model_id,
            sender_id: data.sender_id,
            recipient_id: data.recipient_id,
            message: data.message.clone(),
            url,
            is_read: false,
            created_at: now,
        })
    }
}
