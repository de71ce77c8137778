//! User DTOs - public profile of a user

use crate::entities::User;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserDTO {
    pub user_id: i32,
    pub nickname: String,
    pub profile_image: Option<String>,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            user_id: value.user_id,
            nickname: value.nickname,
            profile_image: value.profile_image,
        }
    }
}

/// Identity record mirrored from the identity provider (no user_id)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateUserDTO {
    pub nickname: String,
    pub profile_image: Option<String>,
}
