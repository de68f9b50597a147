//! 게시글 서비스

use serde_json::Value;

use crate::core::errors::Fail;
use crate::core::usecase::UsecaseExecutor;
use crate::domain::dto::{OutputId, OutputMessage};
use crate::usecases::{BoardOutput, BoardsOutput, CreateOrUpdateBoard, DeleteBoard, GetBoard, QueryBoard};

pub struct BoardService {
    executor: UsecaseExecutor,
}

impl BoardService {
    pub fn new(executor: UsecaseExecutor) -> Self {
        Self { executor }
    }

    pub async fn create_or_update(&self, input: Value) -> Result<OutputId, Fail> {
        self.executor.run(&CreateOrUpdateBoard, input).await
    }

    pub async fn find_one(&self, input: Value) -> Result<BoardOutput, Fail> {
        self.executor.run(&GetBoard, input).await
    }

    pub async fn query(&self, input: Value) -> Result<BoardsOutput, Fail> {
        self.executor.run(&QueryBoard, input).await
    }

    pub async fn delete(&self, input: Value) -> Result<OutputMessage, Fail> {
        self.executor.run(&DeleteBoard, input).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::services::testing::harness;

    #[tokio::test]
    async fn test_board_lifecycle() {
        let h = harness();
        let boards = BoardService::new(h.executor.clone());

        let id = boards
            .create_or_update(json!({
                "category": "SELL",
                "title": "red pill",
                "desc": "barely used",
                "created_by": "p1",
            }))
            .await
            .unwrap()
            .id;

        let found = boards.find_one(json!({ "id": id })).await.unwrap();
        assert_eq!(found.board.title, "red pill");

        let listed = boards.query(json!({ "created_by": "p1" })).await.unwrap();
        assert_eq!(listed.count, 1);

        let fail = boards
            .delete(json!({ "id": id, "created_by": "p2" }))
            .await
            .unwrap_err();
        assert_eq!(fail.status, 403);

        boards
            .delete(json!({ "id": id, "created_by": "p1" }))
            .await
            .unwrap();
        assert_eq!(boards.find_one(json!({ "id": id })).await.unwrap_err().status, 404);
    }
}
