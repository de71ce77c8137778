//! Meetup entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Meetup {
    pub meetup_id: i32,
    // set once at creation, never updated
    pub organizer_id: i32,
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
