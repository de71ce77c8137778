//! Notification services - the caller's activity feed

use crate::core::extract::{Json, Path};
use crate::core::{AppError, AppState};
use crate::dtos::{NotificationDTO, NotificationListResultDTO};
use crate::entities::User;
use axum::{
    Extension,
    extract::State,
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Size of the feed returned by `GET /notification`
const FEED_SIZE: i64 = 10;

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<NotificationListResultDTO>, AppError> {
    let notifications = state
        .notification
        .find_latest_by_recipient(&current_user.user_id, FEED_SIZE)
        .await?;

    Ok(Json(NotificationListResultDTO {
        result: notifications.into_iter().map(NotificationDTO::from).collect(),
    }))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, notification_id = %notification_id))]
pub async fn read_notification(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(notification_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !state
        .notification
        .mark_read(&notification_id, &current_user.user_id)
        .await?
    {
        warn!("Notification {} not found for this user", notification_id);
        return Err(AppError::not_found("Notification not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
