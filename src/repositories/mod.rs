//! # Repository Layer
//!
//! 영속성 협력자를 trait 으로 정의합니다. usecase 는 [`Store::connect`] 로
//! 얻은 [`Connection`] 핸들만 사용하며 실제 저장소 종류를 알지 못합니다.
//!
//! ## 구현체
//!
//! | 구현체 | 모듈 | 용도 |
//! |--------|------|------|
//! | `MongoStore` | [`mongo`] | 운영 저장소 (MongoDB) |
//! | `MemoryStore` | [`memory`] | 로컬 실행 및 테스트 |
//!
//! ## 유일성 제약
//!
//! email, (auth_kind, user_id), nickname, board seq 의 유일성은 저장소가 보장합니다.
//! 애플리케이션의 사전 중복 검사를 통과한 동시 요청이 충돌하면
//! [`StoreError::Conflict`] 가 반환되고 400 `Fail` 로 변환됩니다.

pub mod memory;
pub mod mongo;
pub mod pagination;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::errors::Fail;
use crate::domain::catalog::{AuthKind, OrderType};
use crate::domain::entities::{Account, Auth, Board, NewBoard, Profile};

pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use pagination::{BoardCursor, BoardFilter, BoardPage, BoardQuery, PageCursor};

/// 저장소 계층 에러
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// 연결 실패
    #[error("{0}")]
    Unavailable(String),

    /// 유일성 제약 위반
    #[error("{0}")]
    Conflict(String),

    /// 쿼리 실행 실패
    #[error("{0}")]
    Query(String),
}

impl From<StoreError> for Fail {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Conflict(message) => Fail::invalid_input(message),
            StoreError::Unavailable(message) | StoreError::Query(message) => Fail::unavailable(message),
        }
    }
}

/// 계정 정렬 키
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountOrderKey {
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl AccountOrderKey {
    pub fn field(&self) -> &'static str {
        match self {
            AccountOrderKey::CreatedAt => "created_at",
            AccountOrderKey::UpdatedAt => "updated_at",
        }
    }
}

/// 저장소 연결 획득
#[async_trait]
pub trait Store: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn Connection>, StoreError>;
}

/// 연결된 저장소 핸들
pub trait Connection: Send + Sync {
    fn accounts(&self) -> &dyn AccountRepository;
    fn auths(&self) -> &dyn AuthRepository;
    fn profiles(&self) -> &dyn ProfileRepository;
    fn boards(&self) -> &dyn BoardRepository;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// 활성 여부와 무관하게 조회
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError>;

    async fn find_active(&self, id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.find_by_id(id).await?.filter(|account| account.is_active))
    }

    async fn find_active_by_ids(
        &self,
        ids: &[String],
        order_key: AccountOrderKey,
        order_type: OrderType,
    ) -> Result<Vec<Account>, StoreError>;

    /// 계정과 첫 자격 증명을 함께 생성합니다. 자격 증명 생성이 실패하면 계정도 남기지 않습니다.
    async fn create_with_auth(&self, account: &Account, auth: &Auth) -> Result<(), StoreError>;

    async fn save(&self, account: &Account) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// EMAIL 종류 자격 증명을 email 로 조회
    async fn find_by_email(&self, email: &str) -> Result<Option<Auth>, StoreError>;

    async fn find_social(&self, kind: AuthKind, user_id: &str) -> Result<Option<Auth>, StoreError>;

    async fn save(&self, auth: &Auth) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_active(&self, id: &str) -> Result<Option<Profile>, StoreError>;

    /// 활성 여부와 무관하게 nickname 으로 조회
    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<Profile>, StoreError>;

    async fn find_active_by_account(&self, account_id: &str) -> Result<Vec<Profile>, StoreError>;

    async fn create(&self, profile: &Profile) -> Result<(), StoreError>;

    async fn save(&self, profile: &Profile) -> Result<(), StoreError>;

    /// 계정의 모든 프로필을 비활성화하고 변경된 수를 반환
    async fn deactivate_by_account(&self, account_id: &str) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait BoardRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Board>, StoreError>;

    /// `seq` 를 부여하여 저장하고 완성된 게시글을 반환
    async fn create(&self, board: NewBoard) -> Result<Board, StoreError>;

    async fn save(&self, board: &Board) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    async fn page(&self, query: &BoardQuery) -> Result<BoardPage, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_maps_to_bad_request() {
        let fail: Fail = StoreError::Conflict("Nickname 'neo' already exists.".to_string()).into();
        assert_eq!(fail.status, 400);
        assert_eq!(fail.message, "Nickname 'neo' already exists.");
    }

    #[test]
    fn test_query_error_keeps_store_text() {
        let fail: Fail = StoreError::Query("Kind: I/O error: timed out".to_string()).into();
        assert_eq!(fail.status, 503);
        assert!(fail.message.contains("timed out"));
    }
}
