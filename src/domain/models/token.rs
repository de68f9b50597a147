//! JWT 페이로드 및 토큰 쌍
//!
//! 계정 토큰은 `{id}` 만, 프로필 토큰은 `{id, role, name}` 을 담습니다.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::Role;

/// 토큰에 서명되는 신원 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TokenPayload {
    pub fn account(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: None,
            name: None,
        }
    }

    pub fn profile(id: impl Into<String>, role: Role, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Some(role),
            name: Some(name.into()),
        }
    }

    /// 프로필 토큰 요건(role, name) 충족 여부
    pub fn is_profile(&self) -> bool {
        self.role.is_some() && self.name.as_deref().is_some_and(|name| !name.is_empty())
    }
}

/// JWT 클레임
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub iat: i64,

    pub exp: i64,
}

impl TokenClaims {
    pub fn payload(&self) -> TokenPayload {
        TokenPayload {
            id: self.id.clone(),
            role: self.role,
            name: self.name.clone(),
        }
    }
}

/// 액세스/리프레시 토큰 쌍
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "accessToken")]
    pub access_token: String,

    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}
