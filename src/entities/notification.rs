//! Notification entity - append-only activity record

use super::enums::NotificationType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Notification {
    pub notification_id: i32,
    pub notification_type: NotificationType,
    // id of the subject entity, not a foreign key
    pub model_id: i32,
    pub sender_id: i32,
    pub recipient_id: i32,
    pub message: String,
    pub url: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
