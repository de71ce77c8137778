//! Meetup DTOs

use crate::dtos::UserDTO;
use crate::entities::Meetup;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payload for founding a meetup. The organizer is always the caller.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateMeetupDTO {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: String,
    #[validate(length(min = 1, max = 255))]
    pub place: String,
    pub place_description: String,
    pub image: Option<String>,
    pub started_at: Option<NaiveDate>,
    pub ended_at: Option<NaiveDate>,
    #[validate(length(min = 1, max = 255))]
    pub ad_title: String,
    pub ad_ended_at: NaiveDate,
    pub is_public: bool,
    #[validate(length(max = 255))]
    pub category: Option<String>,
}

/// Every field the organizer may change. Anything else in the payload
/// (organizer, like counter, ids) is rejected.
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateMeetupDTO {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub place: Option<String>,
    pub place_description: Option<String>,
    pub image: Option<String>,
    pub started_at: Option<NaiveDate>,
    pub ended_at: Option<NaiveDate>,
    #[validate(length(min = 1, max = 255))]
    pub ad_title: Option<String>,
    pub ad_ended_at: Option<NaiveDate>,
    pub is_public: Option<bool>,
    #[validate(length(max = 255))]
    pub category: Option<String>,
}

impl UpdateMeetupDTO {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.place.is_none()
            && self.place_description.is_none()
            && self.image.is_none()
            && self.started_at.is_none()
            && self.ended_at.is_none()
            && self.ad_title.is_none()
            && self.ad_ended_at.is_none()
            && self.is_public.is_none()
            && self.category.is_none()
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MeetupDTO {
    pub meetup_id: i32,
    pub organizer: Option<UserDTO>,
    pub is_organizer: bool,
    pub name: String,
    pub description: String,
    pub place: String,
    pub place_description: String,
    pub image: Option<String>,
    pub started_at: Option<NaiveDate>,
    pub ended_at: Option<NaiveDate>,
    pub ad_title: String,
    pub ad_ended_at: NaiveDate,
    pub is_public: bool,
    pub category: Option<String>,
    pub like_count: i32,
    pub created_at: DateTime<Utc>,
}

impl MeetupDTO {
    /// Builds the response for `viewer_id`, attaching the organizer profile
    pub fn for_viewer(meetup: Meetup, organizer: Option<UserDTO>, viewer_id: i32) -> Self {
        Self {
            meetup_id: meetup.meetup_id,
            is_organizer: meetup.organizer_id == viewer_id,
            organizer,
            name: meetup.name,
            description: meetup.description,
            place: meetup.place,
            place_description: meetup.place_description,
            image: meetup.image,
            started_at: meetup.started_at,
            ended_at: meetup.ended_at,
            ad_title: meetup.ad_title,
            ad_ended_at: meetup.ad_ended_at,
            is_public: meetup.is_public,
            category: meetup.category,
            like_count: meetup.like_count,
            created_at: meetup.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MeetupLikeDTO {
    pub meetup_id: i32,
    pub is_like: bool,
    pub like_count: i32,
}
