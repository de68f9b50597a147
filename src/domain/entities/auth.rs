//! 로그인 자격 증명 엔티티

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, now};
use crate::domain::catalog::AuthKind;

/// 로그인 정보
///
/// EMAIL 종류는 `email` + bcrypt `password`, 소셜 종류는 외부 `user_id` 를 가집니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Auth {
    pub id: String,

    pub auth_kind: AuthKind,

    pub loginfo: LogInfo,

    pub account_id: String,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Auth {
    pub fn email(account_id: &str, email: &str, password_hash: String) -> Self {
        Self {
            id: new_id(),
            auth_kind: AuthKind::Email,
            loginfo: LogInfo {
                user_id: None,
                email: Some(email.to_string()),
                password: Some(password_hash),
            },
            account_id: account_id.to_string(),
            created_at: now(),
        }
    }

    pub fn social(account_id: &str, kind: AuthKind, user_id: &str) -> Self {
        Self {
            id: new_id(),
            auth_kind: kind,
            loginfo: LogInfo {
                user_id: Some(user_id.to_string()),
                email: None,
                password: None,
            },
            account_id: account_id.to_string(),
            created_at: now(),
        }
    }

    /// 비밀번호 해시를 제거한 사본
    pub fn without_password(mut self) -> Self {
        self.loginfo.password = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_password_strips_hash() {
        let auth = Auth::email("acc", "a@b.c", "$2b$10$hash".to_string());
        let stripped = auth.without_password();

        assert!(stripped.loginfo.password.is_none());
        assert_eq!(stripped.loginfo.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_social_auth_serialises_without_email_fields() {
        let auth = Auth::social("acc", AuthKind::Kakao, "12345");
        let json = serde_json::to_value(&auth).unwrap();

        assert_eq!(json["auth_kind"], "KAKAO");
        assert_eq!(json["loginfo"]["user_id"], "12345");
        assert!(json["loginfo"].get("password").is_none());
    }
}
