//! Services module - HTTP handlers grouped by resource
//!
//! Handlers extract the caller from the request extensions (set by the
//! authentication middleware), delegate to the lifecycle services or the
//! repositories, and shape the response.

pub mod meetup;
pub mod member;
pub mod notification;
pub mod proposal;

pub use meetup::{create_meetup, delete_meetup, get_meetup, toggle_meetup_like, update_meetup};
pub use member::{list_meetup_members, remove_member};
pub use notification::{list_notifications, read_notification};
pub use proposal::{
    accept_proposal, delete_proposal, get_my_proposal, hide_proposal, ignore_proposal,
    list_meetup_proposals, list_received_proposals, list_sent_proposals, refuse_proposal,
    submit_proposal,
};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
