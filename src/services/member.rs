//! Member services - listing and removing the members of a meetup

use crate::core::extract::{Json, Path};
use crate::core::{AppError, AppState};
use crate::dtos::{MemberDTO, MemberListResultDTO};
use crate::entities::User;
use crate::repositories::ReadMany;
use axum::{
    Extension,
    extract::State,
    http::StatusCode,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, meetup_id = %meetup_id))]
pub async fn list_meetup_members(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(meetup_id): Path<i32>,
) -> Result<Json<MemberListResultDTO>, AppError> {
    let members = state.members.list_members(meetup_id).await?;

    // one query for every nickname of the page
    let user_ids: Vec<i32> = members.iter().map(|m| m.user_id).collect();
    let nicknames: HashMap<i32, String> = state
        .user
        .read_many(&user_ids)
        .await?
        .into_iter()
        .map(|u| (u.user_id, u.nickname))
        .collect();

    let result: Vec<MemberDTO> = members
        .into_iter()
        .map(|member| {
            let nickname = nicknames.get(&member.user_id).cloned();
            MemberDTO {
                nickname,
                ..MemberDTO::from(member)
            }
        })
        .collect();

    debug!("Returning {} members", result.len());
    Ok(Json(MemberListResultDTO { result }))
}

/// Leave (the member themselves) or kick (the organizer)
#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, member_id = %member_id))]
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(member_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    state
        .members
        .remove_member(member_id, current_user.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
