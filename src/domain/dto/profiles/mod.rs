//! 프로필 관련 요청/응답 DTO

use serde::{Deserialize, Serialize};

/// `GET /profiles?accountId=..&orderKey=..&orderType=..`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileListQuery {
    #[serde(rename = "accountId")]
    pub account_id: Option<String>,

    #[serde(rename = "orderKey")]
    pub order_key: Option<String>,

    #[serde(rename = "orderType")]
    pub order_type: Option<String>,
}

/// `POST /profiles/upload` 응답
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileImageResponse {
    #[serde(rename = "profileImageURI")]
    pub profile_image_uri: String,
}
