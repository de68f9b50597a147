//! # Service Registry - 명시적 서비스 조립
//!
//! 모든 서비스는 `main` 에서 한 번 조립되어 `web::Data<AppServices>` 로 핸들러에 전달됩니다.
//! 전역 싱글톤은 없으며, 테스트는 인메모리 구현으로 같은 컨테이너를 만듭니다.
//!
//! ## 조립 순서
//!
//! ```text
//! 1. Store         STORE_BACKEND=mongo|memory  → MongoStore | MemoryStore
//! 2. Key-value     KV_BACKEND=redis|memory     → RedisClient | MemoryKeyValueStore
//! 3. Mail          EMAIL_HOST 유무              → SmtpMailer | ConsoleMailer
//! 4. Storage       STORAGE_ENDPOINT 유무        → HttpObjectStorage | MemoryObjectStorage
//! 5. Services      TokenService, SessionService, OAuthService
//!                  AccountService, ProfileService, BoardService
//! ```
//!
//! MongoDB 연결은 첫 usecase 실행 시점에 맺어집니다. 연결 실패는 서버를 멈추지 않고
//! 해당 요청에서 503 `Failed to connect to database.` 로 나타납니다.
//! Redis 는 조립 시점에 PING 으로 확인하며, 실패해도 경고만 남기고 계속 진행합니다.

use std::sync::Arc;

use log::{info, warn};

use crate::caching::{KeyValueStore, MemoryKeyValueStore, RedisClient};
use crate::config::{DatabaseConfig, KvBackend, PasswordConfig, RedisConfig, StoreBackend};
use crate::core::errors::{Fail, FailContext};
use crate::core::usecase::UsecaseExecutor;
use crate::repositories::{MemoryStore, MongoStore, Store};
use crate::services::accounts::AccountService;
use crate::services::auth::{OAuthService, SessionService, TokenService};
use crate::services::boards::BoardService;
use crate::services::mail::{ConsoleMailer, Mailer, SmtpMailer};
use crate::services::profiles::ProfileService;
use crate::services::storage::{HttpObjectStorage, MemoryObjectStorage, ObjectStorage};
use crate::utils::display_terminal::{
    print_boxed_title, print_final_summary, print_step_complete, print_step_start, print_sub_task,
};

/// 외부 협력자 묶음
pub struct Infrastructure {
    pub store: Arc<dyn Store>,
    pub kv: Arc<dyn KeyValueStore>,
    pub mailer: Arc<dyn Mailer>,
    pub storage: Arc<dyn ObjectStorage>,
}

impl Infrastructure {
    /// 모든 협력자를 프로세스 메모리로 구성
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            kv: Arc::new(MemoryKeyValueStore::new()),
            mailer: Arc::new(ConsoleMailer),
            storage: Arc::new(MemoryObjectStorage::new("memory://objects")),
        }
    }

    /// 환경 변수에 따라 구현체 선택
    pub async fn from_config() -> Result<Self, Fail> {
        print_step_start(1, "Store");
        let store: Arc<dyn Store> = match DatabaseConfig::backend() {
            StoreBackend::Mongo => {
                print_sub_task("backend", &format!("mongo ({})", DatabaseConfig::name()));
                Arc::new(MongoStore::new())
            }
            StoreBackend::Memory => {
                print_sub_task("backend", "memory");
                Arc::new(MemoryStore::new())
            }
        };
        print_step_complete(1, "Store");

        print_step_start(2, "Key-value");
        let kv: Arc<dyn KeyValueStore> = match RedisConfig::backend() {
            KvBackend::Redis => {
                print_sub_task("backend", "redis");
                let redis = RedisClient::new().context("Failed to open redis client")?;
                if let Err(e) = redis.ping().await {
                    warn!("Redis 응답 없음, 요청 시 503 으로 처리됩니다: {}", e);
                }
                Arc::new(redis)
            }
            KvBackend::Memory => {
                print_sub_task("backend", "memory");
                Arc::new(MemoryKeyValueStore::new())
            }
        };
        print_step_complete(2, "Key-value");

        print_step_start(3, "Mail");
        let mailer: Arc<dyn Mailer> = match SmtpMailer::from_config()? {
            Some(smtp) => {
                print_sub_task("transport", "smtp");
                Arc::new(smtp)
            }
            None => {
                print_sub_task("transport", "console");
                Arc::new(ConsoleMailer)
            }
        };
        print_step_complete(3, "Mail");

        print_step_start(4, "Object storage");
        let storage: Arc<dyn ObjectStorage> = match HttpObjectStorage::from_config() {
            Some(http) => {
                print_sub_task("backend", "http");
                Arc::new(http)
            }
            None => {
                print_sub_task("backend", "memory");
                Arc::new(MemoryObjectStorage::new("memory://objects"))
            }
        };
        print_step_complete(4, "Object storage");

        Ok(Self {
            store,
            kv,
            mailer,
            storage,
        })
    }
}

/// 핸들러가 사용하는 서비스 컨테이너
#[derive(Clone)]
pub struct AppServices {
    pub accounts: Arc<AccountService>,
    pub profiles: Arc<ProfileService>,
    pub boards: Arc<BoardService>,
    pub oauth: Arc<OAuthService>,
    pub tokens: TokenService,
}

impl AppServices {
    pub fn assemble(infra: Infrastructure, tokens: TokenService, oauth: OAuthService, bcrypt_cost: u32) -> Self {
        let executor = UsecaseExecutor::new(infra.store);
        let session = Arc::new(SessionService::new(tokens.clone(), infra.kv));

        Self {
            accounts: Arc::new(AccountService::new(
                executor.clone(),
                session.clone(),
                infra.mailer,
                bcrypt_cost,
            )),
            profiles: Arc::new(ProfileService::new(executor.clone(), session, infra.storage)),
            boards: Arc::new(BoardService::new(executor)),
            oauth: Arc::new(oauth),
            tokens,
        }
    }

    pub async fn from_config() -> Result<Self, Fail> {
        print_boxed_title("LOGIN & BOARD BACKEND");

        let infra = Infrastructure::from_config().await?;

        print_step_start(5, "Services");
        let bcrypt_cost = PasswordConfig::bcrypt_cost();
        let services = Self::assemble(
            infra,
            TokenService::from_config(),
            OAuthService::from_config(),
            bcrypt_cost,
        );
        print_step_complete(5, "Services");

        print_final_summary(&[
            ("store", format!("{:?}", DatabaseConfig::backend())),
            ("kv", format!("{:?}", RedisConfig::backend())),
            ("bcrypt", format!("cost {}", bcrypt_cost)),
        ]);
        info!("서비스 조립 완료");

        Ok(services)
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::in_memory_services;

    #[tokio::test]
    async fn test_assembled_services_share_one_store() {
        let services = in_memory_services();

        let account_id = services
            .accounts
            .register(json!({ "email": "neo@matrix.io", "password": "matrix123!", "auth_kind": "EMAIL" }))
            .await
            .unwrap()
            .id;

        let profile_id = services
            .profiles
            .create_or_update(json!({ "role": "MEMBER", "nickname": "neo", "accountId": account_id }))
            .await
            .unwrap()
            .id;

        let pair = services
            .profiles
            .generate_token(json!({ "id": profile_id, "accountId": account_id }))
            .await
            .unwrap();
        assert!(services.tokens.verify(&pair.access_token, true));
    }
}
