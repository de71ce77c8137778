//! Notification DTOs

use crate::entities::{Notification, NotificationType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NotificationDTO {
    pub notification_id: i32,
    pub notification_type: NotificationType,
    pub sender_id: i32,
    pub message: String,
    pub url: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationDTO {
    fn from(value: Notification) -> Self {
        Self {
            notification_id: value.notification_id,
            notification_type: value.notification_type,
            sender_id: value.sender_id,
            message: value.message,
            url: value.url,
            is_read: value.is_read,
            created_at: value.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct NotificationListResultDTO {
    pub result: Vec<NotificationDTO>,
}

/// DTO for appending a notification; the url is derived from type and model id
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateNotificationDTO {
    pub notification_type: NotificationType,
    pub model_id: i32,
    pub sender_id: i32,
    pub recipient_id: i32,
    pub message: String,
}
