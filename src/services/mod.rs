//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 핸들러는 서비스 메서드만 호출하고, 서비스는 usecase 실행과 외부 연동
//! (세션 토큰, 메일, 오브젝트 저장소, OAuth)을 조합합니다.
//! 모든 서비스는 `main` 에서 명시적으로 조립되어 [`AppServices`](crate::core::registry::AppServices)
//! 로 핸들러에 전달됩니다.
//!
//! # Modules
//!
//! - [`accounts`] - 계정 가입/로그인/조회/수정/삭제, 인증 메일, 비밀번호 재설정
//! - [`profiles`] - 프로필 CRUD, 프로필 토큰, 이미지 업로드
//! - [`boards`] - 게시글 CRUD 와 커서 목록
//! - [`auth`] - JWT, 세션, OAuth
//! - [`mail`] - 인증 메일 발송
//! - [`storage`] - 오브젝트 저장소

pub mod accounts;
pub mod auth;
pub mod boards;
pub mod mail;
pub mod profiles;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use chrono::Duration;

    use super::auth::{SessionService, TokenService};
    use super::mail::testing::RecordingMailer;
    use super::storage::MemoryObjectStorage;
    use crate::caching::MemoryKeyValueStore;
    use crate::core::usecase::UsecaseExecutor;
    use crate::repositories::MemoryStore;

    pub use crate::usecases::testing::PASSWORD;

    pub struct Harness {
        pub store: MemoryStore,
        pub executor: UsecaseExecutor,
        pub kv: Arc<MemoryKeyValueStore>,
        pub session: Arc<SessionService>,
        pub mailer: Arc<RecordingMailer>,
        pub storage: Arc<MemoryObjectStorage>,
    }

    pub fn token_service() -> TokenService {
        TokenService::new("test_secret", Duration::minutes(30), Duration::days(14))
    }

    pub fn harness() -> Harness {
        let store = MemoryStore::new();
        let executor = UsecaseExecutor::new(Arc::new(store.clone()));
        let kv = Arc::new(MemoryKeyValueStore::new());
        let session = Arc::new(SessionService::new(token_service(), kv.clone()));

        Harness {
            store,
            executor,
            kv,
            session,
            mailer: Arc::new(RecordingMailer::default()),
            storage: Arc::new(MemoryObjectStorage::new("memory://objects")),
        }
    }
}
