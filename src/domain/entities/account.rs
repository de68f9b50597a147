//! 계정 엔티티

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, now};

/// 마케팅 수신 채널
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marketing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kakao: Option<String>,
}

/// 신원 루트
///
/// Auth, Profile 레코드는 `account_id` 로 이 계정을 참조합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,

    pub is_active: bool,

    #[serde(default)]
    pub is_tester: bool,

    #[serde(default)]
    pub marketing: Marketing,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(marketing: Marketing) -> Self {
        let now = now();
        Self {
            id: new_id(),
            is_active: true,
            is_tester: false,
            marketing,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = now();
    }
}
