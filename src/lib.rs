//! Meetup server library - exposes the main modules for the tests

pub mod core;
pub mod dtos;
pub mod entities;
pub mod lifecycle;
pub mod repositories;
pub mod services;

// Re-export of the main types
pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;

/// Builds the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/meetup", configure_meetup_routes(state.clone()))
        .nest("/proposal", configure_proposal_routes(state.clone()))
        .nest("/member", configure_member_routes(state.clone()))
        .nest("/notification", configure_notification_routes(state.clone()))
        .with_state(state)
}

/// Meetups, their proposals and their members
fn configure_meetup_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/", post(create_meetup))
        .route(
            "/{meetup_id}",
            get(get_meetup).put(update_meetup).delete(delete_meetup),
        )
        .route("/{meetup_id}/like", post(toggle_meetup_like))
        .route(
            "/{meetup_id}/proposal",
            get(list_meetup_proposals).post(submit_proposal),
        )
        .route("/{meetup_id}/proposal/status", get(get_my_proposal))
        .route("/{meetup_id}/member", get(list_meetup_members))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Proposal transitions and the proposer/organizer views
fn configure_proposal_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/sent", get(list_sent_proposals))
        .route("/received", get(list_received_proposals))
        .route("/{proposal_id}", delete(delete_proposal))
        .route("/{proposal_id}/acceptance", post(accept_proposal))
        .route("/{proposal_id}/refuse", post(refuse_proposal))
        .route("/{proposal_id}/ignore", post(ignore_proposal))
        .route("/{proposal_id}/hide", post(hide_proposal))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

fn configure_member_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/{member_id}", delete(remove_member))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

fn configure_notification_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/", get(list_notifications))
        .route("/{notification_id}/read", post(read_notification))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}
