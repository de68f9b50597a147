//! JWT 토큰 서비스
//!
//! HS256 으로 서명된 액세스 토큰(기본 30분)과 리프레시 토큰(기본 14일)을 발급하고
//! 검증합니다. 페이로드는 [`TokenPayload`] 이며 계정 토큰은 `id` 만,
//! 프로필 토큰은 `id`, `role`, `name` 을 모두 담습니다.
//!
//! 검증은 만료 여유(leeway) 없이 서명과 `exp` 를 확인합니다.
//! [`TokenService::decode`] 는 서명과 만료를 확인하지 않고 페이로드만 읽습니다.
//!
//! ```rust,ignore
//! let tokens = TokenService::from_config();
//! let access = tokens.sign_access(&TokenPayload::account(id))?;
//! assert!(tokens.verify(&access, false));
//! ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::JwtConfig;
use crate::core::errors::{Fail, FailContext};
use crate::domain::models::token::{TokenClaims, TokenPayload};

#[derive(Clone)]
pub struct TokenService {
    secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config() -> Self {
        Self::new(
            JwtConfig::secret(),
            Duration::minutes(JwtConfig::access_minutes()),
            Duration::days(JwtConfig::refresh_days()),
        )
    }

    /// 임의 유효기간으로 서명
    ///
    /// 음수 `ttl` 은 이미 만료된 토큰을 만듭니다.
    pub fn sign_with_ttl(&self, payload: &TokenPayload, ttl: Duration) -> Result<String, Fail> {
        let now = Utc::now();
        let claims = TokenClaims {
            id: payload.id.clone(),
            role: payload.role,
            name: payload.name.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")
    }

    pub fn sign_access(&self, payload: &TokenPayload) -> Result<String, Fail> {
        self.sign_with_ttl(payload, self.access_ttl)
    }

    pub fn sign_refresh(&self, payload: &TokenPayload) -> Result<String, Fail> {
        self.sign_with_ttl(payload, self.refresh_ttl)
    }

    /// 서명과 만료를 확인한 클레임
    pub fn claims(&self, token: &str) -> Option<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .ok()
    }

    /// 유효한 토큰이면서 `id` 가 있으면 참
    ///
    /// `strict` 이면 `role` 과 `name` 도 있어야 합니다.
    pub fn verify(&self, token: &str, strict: bool) -> bool {
        match self.claims(token) {
            Some(claims) if !claims.id.is_empty() => !strict || claims.payload().is_profile(),
            _ => false,
        }
    }

    /// 서명/만료 확인 없이 페이로드 읽기
    pub fn decode(&self, token: &str) -> Option<TokenPayload> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims.payload())
            .ok()
    }

    /// `"Bearer {token}"` 에서 토큰 부분 추출
    pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
        auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}
