//! User entity - identity as known to this service

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub user_id: i32,
    pub nickname: String,
    pub profile_image: Option<String>,
}
