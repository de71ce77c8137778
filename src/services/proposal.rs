//! Proposal services - HTTP surface of the proposal lifecycle

use crate::core::extract::{Json, Path, Query};
use crate::core::{AppError, AppState};
use crate::dtos::{
    CreateProposalDTO, PageQuery, ProposalDTO, ProposalListItemDTO, ProposalListResultDTO,
    SentProposalListResultDTO,
};
use crate::entities::User;
use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id, meetup_id = %meetup_id))]
pub async fn submit_proposal(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(meetup_id): Path<i32>,
    Json(body): Json<CreateProposalDTO>,
) -> Result<(StatusCode, Json<ProposalDTO>), AppError> {
    let proposal = state
        .proposals
        .submit(meetup_id, current_user.user_id, &body)
        .await?;

    Ok((StatusCode::CREATED, Json(ProposalDTO::from(proposal))))
}

#[instrument(skip(state, current_user, page), fields(user_id = %current_user.user_id, meetup_id = %meetup_id))]
pub async fn list_meetup_proposals(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(meetup_id): Path<i32>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ProposalListResultDTO>, AppError> {
    let (proposals, total) = state
        .proposals
        .list(meetup_id, current_user.user_id, &page)
        .await?;

    Ok(Json(ProposalListResultDTO {
        result: proposals.into_iter().map(ProposalListItemDTO::from).collect(),
        total,
    }))
}

/// 200 with the caller's proposal, 204 when the caller never proposed
#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, meetup_id = %meetup_id))]
pub async fn get_my_proposal(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(meetup_id): Path<i32>,
) -> Result<Response, AppError> {
    match state
        .proposals
        .get_mine(meetup_id, current_user.user_id)
        .await?
    {
        Some(proposal) => Ok(Json(ProposalDTO::from(proposal)).into_response()),
        None => {
            debug!("No proposal for this meetup");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, proposal_id = %proposal_id))]
pub async fn accept_proposal(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(proposal_id): Path<i32>,
) -> Result<Json<ProposalDTO>, AppError> {
    let proposal = state
        .proposals
        .accept(proposal_id, current_user.user_id)
        .await?;
    Ok(Json(ProposalDTO::from(proposal)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, proposal_id = %proposal_id))]
pub async fn refuse_proposal(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(proposal_id): Path<i32>,
) -> Result<Json<ProposalDTO>, AppError> {
    let proposal = state
        .proposals
        .refuse(proposal_id, current_user.user_id)
        .await?;
    Ok(Json(ProposalDTO::from(proposal)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, proposal_id = %proposal_id))]
pub async fn ignore_proposal(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(proposal_id): Path<i32>,
) -> Result<Json<ProposalDTO>, AppError> {
    let proposal = state
        .proposals
        .ignore(proposal_id, current_user.user_id)
        .await?;
    Ok(Json(ProposalDTO::from(proposal)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, proposal_id = %proposal_id))]
pub async fn hide_proposal(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(proposal_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    state
        .proposals
        .hide(proposal_id, current_user.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, proposal_id = %proposal_id))]
pub async fn delete_proposal(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(proposal_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    state
        .proposals
        .delete(proposal_id, current_user.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_sent_proposals(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<SentProposalListResultDTO>, AppError> {
    let proposals = state.proposals.list_sent(current_user.user_id).await?;
    info!("Found {} sent proposals", proposals.len());

    Ok(Json(SentProposalListResultDTO {
        result: proposals.into_iter().map(ProposalDTO::from).collect(),
    }))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_received_proposals(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<ProposalListResultDTO>, AppError> {
    let proposals = state
        .proposals
        .list_received(current_user.user_id)
        .await?;
    let total = proposals.len() as i64;
    info!("Found {} received proposals", total);

    Ok(Json(ProposalListResultDTO {
        result: proposals.into_iter().map(ProposalListItemDTO::from).collect(),
        total,
    }))
}
