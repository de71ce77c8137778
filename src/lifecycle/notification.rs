//! Notification Dispatcher - fire-and-forget activity records

use crate::dtos::CreateNotificationDTO;
use crate::entities::{Notification, NotificationType};
use crate::repositories::{Create, NotificationRepository};
use tracing::{debug, error, instrument};

/// Longest message stored on a notification, in characters
pub const MAX_MESSAGE_CHARS: usize = 50;

#[derive(Clone)]
pub struct NotificationDispatcher {
    notifications: NotificationRepository,
}

impl NotificationDispatcher {
    pub fn new(notifications: NotificationRepository) -> Self {
        Self { notifications }
    }

    /// Appends a notification for `recipient_id`.
    ///
    /// Never fails: the transition that triggered the notification is already
    /// committed, so a failed write is logged and `None` is returned.
    #[instrument(skip(self, message))]
    pub async fn notify(
        &self,
        notification_type: NotificationType,
        model_id: i32,
        sender_id: i32,
        recipient_id: i32,
        message: &str,
    ) -> Option<Notification> {
        let data = CreateNotificationDTO {
            notification_type,
            model_id,
            sender_id,
            recipient_id,
            message: truncate_message(message),
        };

        match self.notifications.create(&data).await {
            Ok(notification) => {
                debug!("Notification {} recorded", notification.notification_id);
                Some(notification)
            }
            Err(e) => {
                error!("Failed to record notification: {}", e);
                None
            }
        }
    }
}

/// Cuts `message` to `MAX_MESSAGE_CHARS` characters on a char boundary
pub fn truncate_message(message: &str) -> String {
    match message.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((byte_index, _)) => message[..byte_index].to_string(),
        None => message.to_string(),
    }
}
