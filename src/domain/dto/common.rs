//! 공통 응답 DTO

use serde::{Deserialize, Serialize};

use crate::domain::models::token::TokenPair;

/// 생성/수정 결과 `{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputId {
    pub id: String,
}

impl OutputId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// 처리 결과 메시지 `{message}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputMessage {
    pub message: String,
}

impl OutputMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 존재 여부 확인 결과 `{result}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub result: bool,
}

/// 토큰 발급 응답 `{token: {accessToken, refreshToken}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: TokenPair,
}
