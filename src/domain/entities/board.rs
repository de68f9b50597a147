//! 게시글 엔티티

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::BoardCategory;

pub const BOARD_DESC_LIMIT: usize = 500;

/// 게시글
///
/// `seq` 는 저장소가 생성 시 부여하는 단조 증가 번호이며 커서 정렬의 보조 키입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,

    pub seq: i64,

    pub is_active: bool,

    pub is_published: bool,

    pub category: BoardCategory,

    pub title: String,

    pub desc: String,

    pub created_by: String,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

/// 저장소에 넘기는 생성 요청 (`seq` 미정)
#[derive(Debug, Clone, PartialEq)]
pub struct NewBoard {
    pub id: String,
    pub is_active: bool,
    pub is_published: bool,
    pub category: BoardCategory,
    pub title: String,
    pub desc: String,
    pub created_by: String,
}

impl NewBoard {
    pub fn into_board(self, seq: i64) -> Board {
        let now = super::now();
        Board {
            id: self.id,
            seq,
            is_active: self.is_active,
            is_published: self.is_published,
            category: self.category,
            title: self.title,
            desc: self.desc,
            created_by: self.created_by,
            created_at: now,
            updated_at: now,
        }
    }
}
