//! 게시글 usecase
//!
//! 생성은 인증된 프로필이면 누구나 가능하고, 수정과 삭제는 작성자만 할 수 있습니다.
//! 삭제는 행을 실제로 지웁니다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::guard::Guard;
use crate::core::errors::Fail;
use crate::core::usecase::Usecase;
use crate::domain::catalog::{BoardCategory, OrderType};
use crate::domain::dto::{OutputId, OutputMessage};
use crate::domain::entities::{new_id, now, Board, NewBoard, BOARD_DESC_LIMIT};
use crate::repositories::{BoardCursor, BoardFilter, BoardQuery, Connection, PageCursor};

pub const DEFAULT_WINDOW_SIZE: usize = 10;
pub const MAX_WINDOW_SIZE: usize = 100;

fn not_authorized(executor: &str, action: &str, id: &str) -> Fail {
    Fail::forbidden(format!("Not Authorized, [{}], execute {} on {}.", executor, action, id))
}

pub struct BoardInput {
    pub id: Option<String>,
    pub is_active: Option<bool>,
    pub is_published: Option<bool>,
    pub category: BoardCategory,
    pub title: String,
    pub desc: String,
    pub created_by: String,
}

/// `id` 가 있으면 수정, 없으면 생성
pub struct CreateOrUpdateBoard;

#[async_trait]
impl Usecase for CreateOrUpdateBoard {
    type Input = BoardInput;
    type Output = OutputId;

    fn name(&self) -> &'static str {
        "CreateOrUpdateBoard"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        let guard = Guard::object(input)?;
        let is_active = guard.optional_bool("is_active")?;
        let is_published = guard.optional_bool("is_published")?;
        let category = guard.enumeration("category")?;
        let title = guard.string("title")?;

        let desc = guard.optional_string("desc")?.unwrap_or_default();
        if desc.chars().count() > BOARD_DESC_LIMIT {
            return Err(format!("`desc` should be in {} character limit.", BOARD_DESC_LIMIT));
        }

        Ok(BoardInput {
            id: guard.optional_string("id")?,
            is_active,
            is_published,
            category,
            title,
            desc,
            created_by: guard.string("created_by")?,
        })
    }

    async fn authorize(&self, conn: &dyn Connection, input: &Self::Input) -> Result<(), Fail> {
        let Some(id) = &input.id else {
            return Ok(());
        };

        let board = conn
            .boards()
            .find_by_id(id)
            .await?
            .filter(|board| board.is_active)
            .ok_or_else(|| Fail::forbidden(format!("'{}' dose not exist for update.", id)))?;

        if board.created_by != input.created_by {
            return Err(not_authorized(&input.created_by, "update", id));
        }
        Ok(())
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
        if let Some(id) = &input.id {
            let mut board = conn
                .boards()
                .find_by_id(id)
                .await?
                .ok_or_else(|| Fail::forbidden(format!("'{}' dose not exist for update.", id)))?;

            board.is_active = input.is_active.unwrap_or(board.is_active);
            board.is_published = input.is_published.unwrap_or(board.is_published);
            board.category = input.category;
            board.title = input.title;
            board.desc = input.desc;
            board.updated_at = now();
            conn.boards().save(&board).await?;

            return Ok(OutputId::new(board.id));
        }

        let board = conn
            .boards()
            .create(NewBoard {
                id: new_id(),
                is_active: input.is_active.unwrap_or(true),
                is_published: input.is_published.unwrap_or(false),
                category: input.category,
                title: input.title,
                desc: input.desc,
                created_by: input.created_by,
            })
            .await?;

        Ok(OutputId::new(board.id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardOutput {
    pub board: Board,
}

pub struct GetBoard;

#[async_trait]
impl Usecase for GetBoard {
    type Input = String;
    type Output = BoardOutput;

    fn name(&self) -> &'static str {
        "GetBoard"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        Guard::object(input)?.string("id")
    }

    async fn execute(&self, conn: &dyn Connection, id: Self::Input) -> Result<Self::Output, Fail> {
        conn.boards()
            .find_by_id(&id)
            .await?
            .map(|board| BoardOutput { board })
            .ok_or_else(|| Fail::not_found(format!("'{}' is not found in Boards.", id)))
    }
}

pub struct DeleteBoardInput {
    pub id: String,
    pub created_by: String,
}

/// 작성자만 삭제 가능
pub struct DeleteBoard;

#[async_trait]
impl Usecase for DeleteBoard {
    type Input = DeleteBoardInput;
    type Output = OutputMessage;

    fn name(&self) -> &'static str {
        "DeleteBoard"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        let guard = Guard::object(input)?;
        Ok(DeleteBoardInput {
            id: guard.string("id")?,
            created_by: guard.string("created_by")?,
        })
    }

    async fn authorize(&self, conn: &dyn Connection, input: &Self::Input) -> Result<(), Fail> {
        let board = conn
            .boards()
            .find_by_id(&input.id)
            .await?
            .ok_or_else(|| Fail::not_found(format!("'{}' is not found in Boards.", input.id)))?;

        if board.created_by != input.created_by {
            return Err(not_authorized(&input.created_by, "delete", &input.id));
        }
        Ok(())
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
        if !conn.boards().delete(&input.id).await? {
            return Err(Fail::not_found(format!("'{}' is not found in Boards.", input.id)));
        }
        Ok(OutputMessage::new(format!("Deleted Raw On {}", input.id)))
    }
}

pub struct QueryBoardInput {
    pub order_type: OrderType,
    pub cursor: Option<String>,
    pub window_size: usize,
    pub created_by: Option<String>,
    pub category: Option<BoardCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardsOutput {
    pub boards: Vec<Board>,
    pub count: u64,
    pub cursor: PageCursor,
}

/// `(created_at, seq)` 커서 페이지네이션 목록
pub struct QueryBoard;

#[async_trait]
impl Usecase for QueryBoard {
    type Input = QueryBoardInput;
    type Output = BoardsOutput;

    fn name(&self) -> &'static str {
        "QueryBoard"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        let guard = Guard::object(input)?;
        guard.one_of("orderKey", &["created_at"], "`orderKey` should be `created_at`.")?;
        let order_type = guard.order_type()?;

        let window_size = match guard.optional_string("windowSize")? {
            None => DEFAULT_WINDOW_SIZE,
            Some(raw) if raw.is_empty() => return Err("`windowSize` should not be empty.".to_string()),
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| "`windowSize` should be number in string.".to_string())?,
        };
        if window_size > MAX_WINDOW_SIZE {
            return Err(format!("`windowSize` should be at most {}.", MAX_WINDOW_SIZE));
        }

        Ok(QueryBoardInput {
            order_type,
            window_size,
            cursor: guard.optional_string("cursor")?,
            created_by: guard.optional_string("created_by")?,
            category: guard.optional_enumeration("category")?,
        })
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
        let invalid_cursor = || Fail::invalid_input("Invalid pagination(cursor)");

        let after = match &input.cursor {
            Some(raw) => Some(BoardCursor::decode(raw).ok_or_else(invalid_cursor)?),
            None => None,
        };

        let page = conn
            .boards()
            .page(&BoardQuery {
                filter: BoardFilter {
                    created_by: input.created_by,
                    category: input.category,
                },
                order: input.order_type,
                after,
                limit: input.window_size,
            })
            .await?;

        if page.count > 0 && page.boards.is_empty() {
            return Err(invalid_cursor());
        }

        let cursor = PageCursor::from_page(&page, after.is_some());
        Ok(BoardsOutput {
            count: page.count,
            boards: page.boards,
            cursor,
        })
    }
}
