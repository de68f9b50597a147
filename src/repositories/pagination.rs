//! 게시글 커서 페이지네이션
//!
//! 정렬 키는 `(created_at, seq)` 입니다. 커서는 마지막으로 받은 행의 키를
//! `"{created_at_millis}:{seq}"` 로 만든 뒤 URL-safe base64 로 인코딩한 문자열입니다.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{BoardCategory, OrderType};
use crate::domain::entities::Board;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardCursor {
    pub created_at: i64,
    pub seq: i64,
}

impl BoardCursor {
    pub fn of(board: &Board) -> Self {
        Self {
            created_at: board.created_at.timestamp_millis(),
            seq: board.seq,
        }
    }

    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!("{}:{}", self.created_at, self.seq))
    }

    pub fn decode(raw: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(raw.trim_end_matches('=')).ok()?;
        let text = String::from_utf8(bytes).ok()?;
        let (created_at, seq) = text.split_once(':')?;
        Some(Self {
            created_at: created_at.parse().ok()?,
            seq: seq.parse().ok()?,
        })
    }

    /// 주어진 정렬 방향에서 `board` 가 이 커서 뒤에 오는지
    pub fn precedes(&self, board: &Board, order: OrderType) -> bool {
        let key = (board.created_at.timestamp_millis(), board.seq);
        let cursor = (self.created_at, self.seq);
        match order {
            OrderType::Asc => key > cursor,
            OrderType::Desc => key < cursor,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFilter {
    pub created_by: Option<String>,
    pub category: Option<BoardCategory>,
}

impl BoardFilter {
    pub fn matches(&self, board: &Board) -> bool {
        self.created_by.as_ref().is_none_or(|creator| &board.created_by == creator)
            && self.category.is_none_or(|category| board.category == category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardQuery {
    pub filter: BoardFilter,
    pub order: OrderType,
    pub after: Option<BoardCursor>,
    pub limit: usize,
}

/// 한 페이지
///
/// `count` 는 커서와 무관하게 필터에 맞는 전체 행 수이고,
/// `has_more` 는 이 페이지 뒤에 행이 더 있는지를 나타냅니다.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardPage {
    pub boards: Vec<Board>,
    pub count: u64,
    pub has_more: bool,
}

/// 응답에 실리는 커서 쌍
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    #[serde(rename = "beforeCursor")]
    pub before: Option<String>,

    #[serde(rename = "afterCursor")]
    pub after: Option<String>,
}

impl PageCursor {
    pub fn from_page(page: &BoardPage, had_cursor: bool) -> Self {
        let before = if had_cursor {
            page.boards.first().map(|board| BoardCursor::of(board).encode())
        } else {
            None
        };
        let after = if page.has_more {
            page.boards.last().map(|board| BoardCursor::of(board).encode())
        } else {
            None
        };
        Self { before, after }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewBoard;

    fn board(seq: i64) -> Board {
        NewBoard {
            id: format!("b{}", seq),
            is_active: true,
            is_published: false,
            category: BoardCategory::Buy,
            title: "title".to_string(),
            desc: "desc".to_string(),
            created_by: "p1".to_string(),
        }
        .into_board(seq)
    }

    #[test]
    fn test_cursor_encode_decode() {
        let cursor = BoardCursor { created_at: 1_700_000_000_123, seq: 42 };
        assert_eq!(BoardCursor::decode(&cursor.encode()), Some(cursor));
    }

    #[test]
    fn test_garbage_cursor_is_rejected() {
        assert_eq!(BoardCursor::decode("not a cursor"), None);
        assert_eq!(BoardCursor::decode(&URL_SAFE_NO_PAD.encode("12:abc")), None);
    }

    #[test]
    fn test_precedes_breaks_ties_on_seq() {
        let first = board(1);
        let mut second = board(2);
        second.created_at = first.created_at;
        let cursor = BoardCursor::of(&second);

        assert!(cursor.precedes(&first, OrderType::Desc));
        assert!(!cursor.precedes(&first, OrderType::Asc));
    }

    #[test]
    fn test_filter_matches_creator_and_category() {
        let board = board(1);
        let filter = BoardFilter {
            created_by: Some("p1".to_string()),
            category: Some(BoardCategory::Buy),
        };
        assert!(filter.matches(&board));

        let other = BoardFilter {
            created_by: None,
            category: Some(BoardCategory::Sell),
        };
        assert!(!other.matches(&board));
    }
}
