//! Authorization Guard - capability checks applied before every mutation
//!
//! Two predicates cover every rule of the service:
//! - `is_organizer`: the acting user owns the meetup
//! - `is_self`: the acting user is the user the entity belongs to
//!
//! The `require_*` helpers turn a failed predicate into a `Forbidden` error.

use crate::core::AppError;
use crate::entities::{Meetup, Member, Proposal};
use tracing::warn;

/// Entity that belongs to a single user.
pub trait Owned {
    fn owner_id(&self) -> i32;
}

impl Owned for Proposal {
    fn owner_id(&self) -> i32 {
        self.user_id
    }
}

impl Owned for Member {
    fn owner_id(&self) -> i32 {
        self.user_id
    }
}

pub fn is_organizer(meetup: &Meetup, user_id: i32) -> bool {
    meetup.organizer_id == user_id
}

pub fn is_self<E: Owned>(entity: &E, user_id: i32) -> bool {
    entity.owner_id() == user_id
}

pub fn require_organizer(meetup: &Meetup, user_id: i32) -> Result<(), AppError> {
    if is_organizer(meetup, user_id) {
        return Ok(());
    }
    warn!(
        "User {} is not the organizer of meetup {}",
        user_id, meetup.meetup_id
    );
    Err(AppError::forbidden(
        "Only the organizer of the meetup can perform this action",
    ))
}

pub fn require_self<E: Owned>(entity: &E, user_id: i32) -> Result<(), AppError> {
    if is_self(entity, user_id) {
        return Ok(());
    }
    warn!(
        "User {} acted on a resource owned by user {}",
        user_id,
        entity.owner_id()
    );
    Err(AppError::forbidden("This resource belongs to another user"))
}

pub fn require_organizer_or_self<E: Owned>(
    meetup: &Meetup,
    entity: &E,
    user_id: i32,
) -> Result<(), AppError> {
    if is_organizer(meetup, user_id) || is_self(entity, user_id) {
        return Ok(());
    }
    warn!(
        "User {} is neither the organizer of meetup {} nor the owner of the resource",
        user_id, meetup.meetup_id
    );
    Err(AppError::forbidden(
        "Only the organizer or the owner can perform this action",
    ))
}
