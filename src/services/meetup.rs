//! Meetup services - founding, reading, editing and liking meetups

use crate::core::extract::{Json, Path};
use crate::core::{AppError, AppState, guard};
use crate::dtos::{CreateMeetupDTO, MeetupDTO, MeetupLikeDTO, UpdateMeetupDTO, UserDTO};
use crate::entities::{Meetup, User};
use crate::repositories::{Delete, Read, Update};
use axum::{
    Extension,
    extract::State,
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

async fn find_meetup(state: &AppState, meetup_id: i32) -> Result<Meetup, AppError> {
    state.meetup.read(&meetup_id).await?.ok_or_else(|| {
        warn!("Meetup not found: {}", meetup_id);
        AppError::not_found("Meetup not found")
    })
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn create_meetup(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<CreateMeetupDTO>,
) -> Result<(StatusCode, Json<MeetupDTO>), AppError> {
    debug!("Creating meetup");
    body.validate()?;

    let (meetup, _) = state
        .members
        .create_meetup(current_user.user_id, &body)
        .await?;

    let viewer_id = current_user.user_id;
    Ok((
        StatusCode::CREATED,
        Json(MeetupDTO::for_viewer(
            meetup,
            Some(UserDTO::from(current_user)),
            viewer_id,
        )),
    ))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, meetup_id = %meetup_id))]
pub async fn get_meetup(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(meetup_id): Path<i32>,
) -> Result<Json<MeetupDTO>, AppError> {
    let meetup = find_meetup(&state, meetup_id).await?;
    let organizer = state.user.read(&meetup.organizer_id).await?.map(UserDTO::from);

    Ok(Json(MeetupDTO::for_viewer(
        meetup,
        organizer,
        current_user.user_id,
    )))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id, meetup_id = %meetup_id))]
pub async fn update_meetup(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(meetup_id): Path<i32>,
    Json(body): Json<UpdateMeetupDTO>,
) -> Result<Json<MeetupDTO>, AppError> {
    debug!("Updating meetup");
    body.validate()?;
    if body.is_empty() {
        warn!("Empty meetup update");
        return Err(AppError::bad_request("Nothing to update"));
    }

    let meetup = find_meetup(&state, meetup_id).await?;
    guard::require_organizer(&meetup, current_user.user_id)?;

    let updated = state.meetup.update(&meetup_id, &body).await?;
    info!("Meetup {} updated", meetup_id);

    let viewer_id = current_user.user_id;
    Ok(Json(MeetupDTO::for_viewer(
        updated,
        Some(UserDTO::from(current_user)),
        viewer_id,
    )))
}

/// Deletes the meetup together with its members, proposals and likes
#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, meetup_id = %meetup_id))]
pub async fn delete_meetup(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(meetup_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let meetup = find_meetup(&state, meetup_id).await?;
    guard::require_organizer(&meetup, current_user.user_id)?;

    if !state.meetup.delete(&meetup_id).await? {
        return Err(AppError::not_found("Meetup not found"));
    }

    info!("Meetup {} deleted", meetup_id);
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, meetup_id = %meetup_id))]
pub async fn toggle_meetup_like(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(meetup_id): Path<i32>,
) -> Result<Json<MeetupLikeDTO>, AppError> {
    let (is_like, like_count) = state
        .meetup
        .toggle_like(&current_user.user_id, &meetup_id)
        .await?
        .ok_or_else(|| {
            warn!("Meetup not found: {}", meetup_id);
            AppError::not_found("Meetup not found")
        })?;

    debug!("Like toggled: is_like={}, like_count={}", is_like, like_count);
    Ok(Json(MeetupLikeDTO {
        meetup_id,
        is_like,
        like_count,
    }))
}
