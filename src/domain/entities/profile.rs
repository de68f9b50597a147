//! 프로필 엔티티

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::Role;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    #[serde(default)]
    pub favorite: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedExam {
    pub kind: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ExamDetail>,
}

/// 계정 아래의 이름 붙은 페르소나
///
/// `nickname` 은 전체 프로필 사이에서 유일합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,

    pub is_active: bool,

    pub role: Role,

    pub nickname: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub determination: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepared_exam: Option<PreparedExam>,

    pub account_id: String,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}
