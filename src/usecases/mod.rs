//! # Usecase Layer
//!
//! 각 usecase 는 [`Usecase`](crate::core::usecase::Usecase) trait 을 구현하고
//! [`UsecaseExecutor`](crate::core::usecase::UsecaseExecutor) 로 실행됩니다.
//!
//! - [`accounts`] - 가입, 로그인, 계정 조회/수정/삭제, 비밀번호 변경
//! - [`profiles`] - 프로필 생성/수정, 조회, 삭제
//! - [`boards`] - 게시글 생성/수정, 조회, 삭제, 커서 목록
//! - [`guard`] - 입력 검증 도우미

pub mod accounts;
pub mod boards;
pub mod guard;
pub mod profiles;

pub use accounts::*;
pub use boards::*;
pub use profiles::*;

use crate::core::errors::Fail;

pub const OWNER_MISMATCH: &str = "Executor and owner should be the same.";

/// 실행자가 주어졌다면 소유자와 같아야 함
pub(crate) fn ensure_owner(executor: Option<&str>, owner: &str) -> Result<(), Fail> {
    match executor {
        Some(executor) if executor != owner => Err(Fail::forbidden(OWNER_MISMATCH)),
        _ => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use serde_json::json;

    use super::accounts::RegisterAccount;
    use crate::core::usecase::UsecaseExecutor;
    use crate::repositories::{Connection, MemoryStore, Store};

    pub const PASSWORD: &str = "matrix123!";

    pub fn setup() -> (UsecaseExecutor, MemoryStore) {
        let store = MemoryStore::new();
        let executor = UsecaseExecutor::new(Arc::new(store.clone()));
        (executor, store)
    }

    pub async fn connect(store: &MemoryStore) -> Arc<dyn Connection> {
        store.connect().await.unwrap()
    }

    pub async fn register(executor: &UsecaseExecutor, email: &str) -> String {
        executor
            .run(
                &RegisterAccount::new(4),
                json!({ "email": email, "password": PASSWORD, "auth_kind": "EMAIL" }),
            )
            .await
            .unwrap()
            .id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_owner() {
        assert!(ensure_owner(None, "a1").is_ok());
        assert!(ensure_owner(Some("a1"), "a1").is_ok());
        assert_eq!(
            ensure_owner(Some("a2"), "a1").unwrap_err(),
            Fail::forbidden(OWNER_MISMATCH)
        );
    }
}
