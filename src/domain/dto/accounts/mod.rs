//! 계정 관련 요청/응답 DTO

use serde::{Deserialize, Serialize};
use validator::Validate;

/// `POST /accounts/login`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password should not be empty."))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password should not be empty."))]
    pub password: String,
}

/// `PUT /accounts/reset-password`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[serde(default, rename = "authCode")]
    #[validate(length(min = 1, message = "AuthCode, Email and New Password should not be empty."))]
    pub auth_code: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "AuthCode, Email and New Password should not be empty."))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "AuthCode, Email and New Password should not be empty."))]
    pub password: String,
}

/// `GET /accounts?email=..&orderKey=..&orderType=..`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountListQuery {
    pub email: Option<String>,

    #[serde(rename = "orderKey")]
    pub order_key: Option<String>,

    #[serde(rename = "orderType")]
    pub order_type: Option<String>,
}

/// `GET /accounts/auth/{email}` 응답
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCodeResponse {
    #[serde(rename = "authCode")]
    pub auth_code: String,
}

/// OAuth 콜백 쿼리
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}
