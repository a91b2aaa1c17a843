use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::UserRef;

/// Body of `POST /likes` and `DELETE /likes`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LikeRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "likedUser")]
    pub liked_user: i64,
}

impl LikeRequest {
    pub fn target(&self) -> UserRef {
        UserRef(self.liked_user)
    }
}
