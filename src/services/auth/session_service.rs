//! 세션 토큰 발급/교체와 비밀번호 재설정 코드
//!
//! 리프레시 토큰은 신원 id 당 하나만 `refresh_token:{id}` 에 저장되며
//! 새 로그인이 이전 값을 덮어씁니다.
//!
//! 토큰 교체는 아래 순서로 검사하고 첫 실패에서 401 을 돌려줍니다.
//! 저장소 조회 자체가 실패하면 503 입니다.
//!
//! 1. 리프레시 토큰 서명/만료 → `The refresh token is invalid for refreshVerify.`
//! 2. 리프레시 페이로드 id → `The refresh token is invalid for decode.`
//! 3. 저장된 값과 일치 → `The refresh token is not found in database.`
//! 4. 액세스 토큰이 아직 유효 → `The access token is not expired.`
//!
//! 성공하면 같은 페이로드로 새 액세스 토큰을 만들고 리프레시 토큰은 그대로 돌려줍니다.

use std::sync::Arc;

use log::{debug, warn};

use crate::caching::{refresh_token_key, reset_code_key, KeyValueStore};
use crate::core::errors::Fail;
use crate::domain::models::token::{TokenPair, TokenPayload};
use crate::services::auth::TokenService;
use crate::utils::codes::{reset_code, RESET_CODE_TTL_SECONDS};

pub struct SessionService {
    tokens: TokenService,
    kv: Arc<dyn KeyValueStore>,
}

impl SessionService {
    pub fn new(tokens: TokenService, kv: Arc<dyn KeyValueStore>) -> Self {
        Self { tokens, kv }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// 토큰 쌍을 서명하고 리프레시 토큰을 저장
    pub async fn issue(&self, payload: &TokenPayload) -> Result<TokenPair, Fail> {
        let access_token = self.tokens.sign_access(payload)?;
        let refresh_token = self.tokens.sign_refresh(payload)?;

        self.kv
            .set(&refresh_token_key(&payload.id), &refresh_token)
            .await
            .map_err(|e| {
                warn!("리프레시 토큰 저장 실패 ({}): {}", payload.id, e);
                Fail::unauthorized("Fail to save refresh token on database.")
            })?;

        debug!("토큰 발급: {}", payload.id);
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// 만료된 액세스 토큰 교체
    ///
    /// `strict` 이면 프로필 토큰으로 취급합니다.
    pub async fn rotate(&self, refresh_token: &str, access_token: &str, strict: bool) -> Result<TokenPair, Fail> {
        if !self.tokens.verify(refresh_token, false) {
            return Err(Fail::unauthorized("The refresh token is invalid for refreshVerify."));
        }

        let payload = self
            .tokens
            .decode(refresh_token)
            .filter(|payload| !payload.id.is_empty())
            .ok_or_else(|| Fail::unauthorized("The refresh token is invalid for decode."))?;

        let saved = self
            .kv
            .get(&refresh_token_key(&payload.id))
            .await
            .map_err(|e| {
                warn!("리프레시 토큰 조회 실패 ({}): {}", payload.id, e);
                Fail::unavailable(e.to_string())
            })?;
        if saved.as_deref() != Some(refresh_token) {
            return Err(Fail::unauthorized("The refresh token is not found in database."));
        }

        if self.tokens.verify(access_token, strict) {
            return Err(Fail::unauthorized("The access token is not expired."));
        }

        let payload = if strict {
            payload
        } else {
            TokenPayload::account(payload.id)
        };

        Ok(TokenPair {
            access_token: self.tokens.sign_access(&payload)?,
            refresh_token: refresh_token.to_string(),
        })
    }

    /// 재설정 코드를 만들어 5분간 저장
    pub async fn save_reset_code(&self, email: &str) -> Result<String, Fail> {
        let code = reset_code();
        self.kv
            .set_with_expiry(&reset_code_key(email), &code, RESET_CODE_TTL_SECONDS)
            .await
            .map_err(|e| {
                warn!("재설정 코드 저장 실패 ({}): {}", email, e);
                Fail::unauthorized("Fail to save the auth code on database.")
            })?;
        Ok(code)
    }

    pub async fn check_reset_code(&self, email: &str, code: &str) -> Result<(), Fail> {
        let saved = self.kv.get(&reset_code_key(email)).await.map_err(|e| {
            warn!("재설정 코드 조회 실패 ({}): {}", email, e);
            Fail::unavailable(e.to_string())
        })?;

        match saved {
            Some(saved) if saved == code => Ok(()),
            _ => Err(Fail::unauthorized("The auth code is not found in database.")),
        }
    }

    /// 사용한 재설정 코드 삭제 (실패는 기록만)
    pub async fn clear_reset_code(&self, email: &str) {
        if let Err(e) = self.kv.delete(&reset_code_key(email)).await {
            warn!("재설정 코드 삭제 실패 ({}): {}", email, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Duration;

    use super::*;
    use crate::caching::{CacheError, MemoryKeyValueStore};
    use crate::domain::catalog::Role;

    fn session() -> (SessionService, Arc<MemoryKeyValueStore>) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let tokens = TokenService::new("test_secret", Duration::minutes(30), Duration::days(14));
        (SessionService::new(tokens, kv.clone()), kv)
    }

    fn expired(session: &SessionService, payload: &TokenPayload) -> String {
        session
            .tokens()
            .sign_with_ttl(payload, Duration::seconds(-10))
            .unwrap()
    }

    #[tokio::test]
    async fn test_issue_stores_refresh_token() {
        let (session, kv) = session();
        let pair = session.issue(&TokenPayload::account("a1")).await.unwrap();

        assert_eq!(
            kv.get("refresh_token:a1").await.unwrap().as_deref(),
            Some(pair.refresh_token.as_str())
        );
        assert!(session.tokens().verify(&pair.access_token, false));
    }

    #[tokio::test]
    async fn test_live_access_token_is_not_rotated() {
        let (session, _) = session();
        let pair = session.issue(&TokenPayload::account("a1")).await.unwrap();

        let fail = session
            .rotate(&pair.refresh_token, &pair.access_token, false)
            .await
            .unwrap_err();
        assert_eq!(fail, Fail::unauthorized("The access token is not expired."));
    }

    #[tokio::test]
    async fn test_expired_access_token_is_rotated() {
        let (session, _) = session();
        let payload = TokenPayload::account("a1");
        let pair = session.issue(&payload).await.unwrap();
        let stale = expired(&session, &payload);

        let rotated = session.rotate(&pair.refresh_token, &stale, false).await.unwrap();

        assert_eq!(rotated.refresh_token, pair.refresh_token);
        assert!(session.tokens().verify(&rotated.access_token, false));
        assert_eq!(session.tokens().decode(&rotated.access_token).unwrap(), payload);
    }

    #[tokio::test]
    async fn test_profile_rotation_keeps_role_and_name() {
        let (session, _) = session();
        let payload = TokenPayload::profile("p1", Role::Member, "trinity");
        let pair = session.issue(&payload).await.unwrap();

        // 계정 토큰은 strict 검증을 통과하지 못하므로 만료된 것으로 취급
        let account_access = session.tokens().sign_access(&TokenPayload::account("a1")).unwrap();
        let rotated = session
            .rotate(&pair.refresh_token, &account_access, true)
            .await
            .unwrap();

        assert_eq!(session.tokens().decode(&rotated.access_token).unwrap(), payload);
    }

    #[tokio::test]
    async fn test_rotation_failures_in_order() {
        let (session, kv) = session();
        let payload = TokenPayload::account("a1");
        let pair = session.issue(&payload).await.unwrap();
        let stale = expired(&session, &payload);

        let fail = session.rotate("garbage", &stale, false).await.unwrap_err();
        assert_eq!(fail.message, "The refresh token is invalid for refreshVerify.");

        let expired_refresh = expired(&session, &payload);
        let fail = session.rotate(&expired_refresh, &stale, false).await.unwrap_err();
        assert_eq!(fail.message, "The refresh token is invalid for refreshVerify.");

        kv.set("refresh_token:a1", "something else").await.unwrap();
        let fail = session.rotate(&pair.refresh_token, &stale, false).await.unwrap_err();
        assert_eq!(fail, Fail::unauthorized("The refresh token is not found in database."));
    }

    #[tokio::test]
    async fn test_second_login_invalidates_first_refresh_token() {
        let (session, _) = session();
        let payload = TokenPayload::account("a1");
        let first = session.issue(&payload).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        let second = session.issue(&payload).await.unwrap();
        let stale = expired(&session, &payload);

        assert!(session.rotate(&first.refresh_token, &stale, false).await.is_err());
        assert!(session.rotate(&second.refresh_token, &stale, false).await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_code_round() {
        let (session, _) = session();
        let code = session.save_reset_code("neo@matrix.io").await.unwrap();

        assert_eq!(
            session.check_reset_code("neo@matrix.io", "wrong").await.unwrap_err(),
            Fail::unauthorized("The auth code is not found in database.")
        );
        assert!(session.check_reset_code("neo@matrix.io", &code).await.is_ok());

        session.clear_reset_code("neo@matrix.io").await;
        assert!(session.check_reset_code("neo@matrix.io", &code).await.is_err());
    }

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn set(&self, _key: &str, _value: &str) -> Result<(), CacheError> {
            Err(CacheError::Connection("refused".into()))
        }

        async fn set_with_expiry(&self, _key: &str, _value: &str, _ttl: u64) -> Result<(), CacheError> {
            Err(CacheError::Connection("refused".into()))
        }

        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Connection("refused".into()))
        }

        async fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Connection("refused".into()))
        }
    }

    #[tokio::test]
    async fn test_unreachable_store_fails_issue_with_401() {
        let tokens = TokenService::new("test_secret", Duration::minutes(30), Duration::days(14));
        let session = SessionService::new(tokens, Arc::new(BrokenStore));

        let fail = session.issue(&TokenPayload::account("a1")).await.unwrap_err();
        assert_eq!(fail, Fail::unauthorized("Fail to save refresh token on database."));
    }

    #[tokio::test]
    async fn test_unreachable_store_fails_lookups_with_503() {
        let (healthy, _) = session();
        let payload = TokenPayload::account("a1");
        let pair = healthy.issue(&payload).await.unwrap();
        let stale = expired(&healthy, &payload);

        let tokens = TokenService::new("test_secret", Duration::minutes(30), Duration::days(14));
        let session = SessionService::new(tokens, Arc::new(BrokenStore));

        let fail = session.rotate(&pair.refresh_token, &stale, false).await.unwrap_err();
        assert_eq!(fail.status, 503);
        assert!(fail.message.contains("refused"));

        let fail = session.check_reset_code("neo@matrix.io", "abc").await.unwrap_err();
        assert_eq!(fail.status, 503);
        assert!(fail.message.contains("refused"));
    }
}
