//! # 소셜 OAuth 2.0 인증 서비스
//!
//! KAKAO, NAVER, GOOGLE, FACEBOOK 의 Authorization Code 플로우를 처리합니다.
//!
//! ```text
//! GET /api/accounts/auth/{provider}         → 302 프로바이더 인증 페이지 (state 포함)
//! GET /api/accounts/auth/{provider}_oauth   ← code, state
//!     1. state 검증 (서명 + 유효시간)
//!     2. code → 프로바이더 access_token 교환
//!     3. access_token 으로 사용자 정보 조회
//!     4. 외부 사용자 id (+ 이메일) → SocialLogin 입력
//! ```
//!
//! ## State
//!
//! `"{unix_ts}.{hex(hmac_sha256(OAUTH_STATE_SECRET, unix_ts))}"` 형태이며 저장소를 쓰지 않습니다.
//! 콜백 시 MAC 을 상수 시간으로 비교하고 `OAUTH_SESSION_TIMEOUT_MINUTES` 이내인지 확인합니다.
//!
//! ## 설정
//!
//! ```bash
//! KAKAO_CLIENT_ID=...
//! KAKAO_CLIENT_SECRET=...
//! KAKAO_CALLBACK_URL=https://api.example.com/api/accounts/auth/kakao_oauth
//! OAUTH_STATE_SECRET=...
//! OAUTH_REDIRECT_URL=https://www.example.com
//! ```
//!
//! client id 가 없는 프로바이더는 비활성으로 취급되어 400 을 돌려줍니다.

use std::collections::HashMap;

use chrono::Utc;
use hmac::{Hmac, Mac};
use log::{info, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::Sha256;

use crate::config::{OAuthConfig, OAuthProviderConfig};
use crate::core::errors::{Fail, FailContext};
use crate::domain::catalog::AuthKind;

type StateMac = Hmac<Sha256>;

/// 프로바이더가 확인해 준 외부 신원
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialIdentity {
    pub kind: AuthKind,
    pub user_id: String,
    pub email: Option<String>,
}

impl SocialIdentity {
    /// `SocialLogin` usecase 입력
    pub fn login_input(&self) -> Value {
        let marketing = match &self.email {
            Some(email) => json!({ "email": email }),
            None => json!({}),
        };

        json!({
            "user_id": self.user_id,
            "auth_kind": self.kind.as_str(),
            "marketing": marketing,
        })
    }

    /// 프로바이더별 사용자 정보 응답에서 id 와 이메일을 꺼냄
    pub fn from_userinfo(kind: AuthKind, body: &Value) -> Option<Self> {
        let (id, email) = match kind {
            AuthKind::Kakao => (&body["id"], &body["kakao_account"]["email"]),
            AuthKind::Naver => (&body["response"]["id"], &body["response"]["email"]),
            AuthKind::Google | AuthKind::Facebook => (&body["id"], &body["email"]),
            AuthKind::Email => return None,
        };

        let user_id = match id {
            Value::String(id) if !id.is_empty() => id.clone(),
            Value::Number(id) => id.to_string(),
            _ => return None,
        };

        Some(Self {
            kind,
            user_id,
            email: email.as_str().filter(|email| !email.is_empty()).map(str::to_string),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ProviderToken {
    access_token: String,
}

pub struct OAuthService {
    providers: HashMap<AuthKind, OAuthProviderConfig>,
    state_secret: String,
    state_ttl_seconds: i64,
    http: reqwest::Client,
}

impl OAuthService {
    pub fn new(providers: Vec<OAuthProviderConfig>, state_secret: impl Into<String>, state_ttl_minutes: i64) -> Self {
        Self {
            providers: providers
                .into_iter()
                .map(|provider| (provider.kind, provider))
                .collect(),
            state_secret: state_secret.into(),
            state_ttl_seconds: state_ttl_minutes * 60,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config() -> Self {
        let providers: Vec<_> = AuthKind::SOCIAL
            .into_iter()
            .filter_map(OAuthProviderConfig::load)
            .collect();

        info!(
            "OAuth 프로바이더 {}개 활성: {:?}",
            providers.len(),
            providers.iter().map(|p| p.kind.as_str()).collect::<Vec<_>>()
        );

        Self::new(
            providers,
            OAuthConfig::state_secret(),
            OAuthConfig::session_timeout_minutes(),
        )
    }

    fn provider(&self, kind: AuthKind) -> Result<&OAuthProviderConfig, Fail> {
        self.providers
            .get(&kind)
            .ok_or_else(|| Fail::invalid_input(format!("'{}' login is not configured.", kind)))
    }

    /// 프로바이더 인증 페이지 주소
    pub fn login_url(&self, kind: AuthKind) -> Result<String, Fail> {
        let provider = self.provider(kind)?;
        let state = self.generate_state(Utc::now().timestamp())?;

        let mut params = vec![
            ("client_id", provider.client_id.as_str()),
            ("redirect_uri", provider.callback_url.as_str()),
            ("response_type", "code"),
            ("state", state.as_str()),
        ];
        if !provider.scope.is_empty() {
            params.push(("scope", provider.scope));
        }

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        Ok(format!("{}?{}", provider.auth_uri, query))
    }

    fn state_mac(&self, timestamp: i64) -> Result<StateMac, Fail> {
        let mut mac = StateMac::new_from_slice(self.state_secret.as_bytes()).context("Invalid oauth state secret")?;
        mac.update(timestamp.to_string().as_bytes());
        Ok(mac)
    }

    fn generate_state(&self, timestamp: i64) -> Result<String, Fail> {
        let signature = self.state_mac(timestamp)?.finalize().into_bytes();
        Ok(format!("{}.{}", timestamp, hex::encode(signature)))
    }

    fn verify_state(&self, state: &str, now: i64) -> Result<(), Fail> {
        let invalid = || Fail::unauthorized("The oauth state is invalid.");

        let (timestamp, signature) = state.split_once('.').ok_or_else(invalid)?;
        let timestamp: i64 = timestamp.parse().map_err(|_| invalid())?;

        let signature = hex::decode(signature).map_err(|_| invalid())?;
        self.state_mac(timestamp)?
            .verify_slice(&signature)
            .map_err(|_| invalid())?;
        if now < timestamp || now - timestamp > self.state_ttl_seconds {
            return Err(invalid());
        }
        Ok(())
    }

    /// 콜백의 code/state 로 외부 신원 확인
    pub async fn authenticate(&self, kind: AuthKind, code: &str, state: &str) -> Result<SocialIdentity, Fail> {
        let provider = self.provider(kind)?;
        self.verify_state(state, Utc::now().timestamp())?;

        let token = self.exchange_code(provider, code, state).await?;
        let body = self.fetch_userinfo(provider, &token.access_token).await?;

        SocialIdentity::from_userinfo(kind, &body).ok_or_else(|| {
            warn!("{} 사용자 정보에 id 가 없습니다", kind);
            Fail::unauthorized(format!("{} user info has no id.", kind))
        })
    }

    async fn exchange_code(&self, provider: &OAuthProviderConfig, code: &str, state: &str) -> Result<ProviderToken, Fail> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", provider.client_id.as_str()),
            ("client_secret", provider.client_secret.as_str()),
            ("redirect_uri", provider.callback_url.as_str()),
            ("code", code),
            ("state", state),
        ];

        let response = self
            .http
            .post(provider.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| provider_fail(provider.kind, "token request", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("{} 토큰 교환 실패 ({}): {}", provider.kind, status, body);
            return Err(Fail::unauthorized(format!("{} token exchange failed.", provider.kind)));
        }

        response
            .json::<ProviderToken>()
            .await
            .map_err(|e| provider_fail(provider.kind, "token response", e))
    }

    async fn fetch_userinfo(&self, provider: &OAuthProviderConfig, access_token: &str) -> Result<Value, Fail> {
        let response = self
            .http
            .get(provider.userinfo_uri)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| provider_fail(provider.kind, "user info request", e))?;

        if !response.status().is_success() {
            warn!("{} 사용자 정보 조회 실패: {}", provider.kind, response.status());
            return Err(Fail::unauthorized(format!("{} user info request failed.", provider.kind)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| provider_fail(provider.kind, "user info response", e))
    }
}

fn provider_fail(kind: AuthKind, step: &str, error: reqwest::Error) -> Fail {
    warn!("{} {} 실패: {}", kind, step, error);
    Fail::unauthorized(format!("{} {} failed.", kind, step))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> OAuthService {
        let kakao = OAuthProviderConfig::with_credentials(
            AuthKind::Kakao,
            "kakao-client".into(),
            "kakao-secret".into(),
            "http://localhost:3000/api/accounts/auth/kakao_oauth".into(),
        );
        OAuthService::new(vec![kakao], "state_secret", 10)
    }

    #[test]
    fn test_login_url_carries_client_and_state() {
        let url = service().login_url(AuthKind::Kakao).unwrap();

        assert!(url.starts_with("https://kauth.kakao.com/oauth/authorize?"));
        assert!(url.contains("client_id=kakao-client"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("state="));
        assert!(url.contains(&*urlencoding::encode("http://localhost:3000/api/accounts/auth/kakao_oauth")));
    }

    #[test]
    fn test_unconfigured_provider_is_rejected() {
        let fail = service().login_url(AuthKind::Google).unwrap_err();
        assert_eq!(fail, Fail::invalid_input("'GOOGLE' login is not configured."));
    }

    #[test]
    fn test_state_round_trip_and_expiry() {
        let oauth = service();
        let state = oauth.generate_state(1_000).unwrap();

        assert!(oauth.verify_state(&state, 1_000).is_ok());
        assert!(oauth.verify_state(&state, 1_600).is_ok());
        assert!(oauth.verify_state(&state, 1_601).is_err());
        assert!(oauth.verify_state(&state, 999).is_err());
    }

    #[test]
    fn test_tampered_state_is_rejected() {
        let oauth = service();
        let state = oauth.generate_state(1_000).unwrap().replacen("1000", "1001", 1);

        assert_eq!(
            oauth.verify_state(&state, 1_001).unwrap_err(),
            Fail::unauthorized("The oauth state is invalid.")
        );
        assert!(oauth.verify_state("no-dot", 1_000).is_err());
        assert!(oauth.verify_state("abc.def", 1_000).is_err());

        let other = OAuthService::new(Vec::new(), "another_secret", 10);
        let forged = other.generate_state(1_000).unwrap();
        assert!(oauth.verify_state(&forged, 1_000).is_err());

        let state = oauth.generate_state(1_000).unwrap();
        let truncated = &state[..state.len() - 2];
        assert!(oauth.verify_state(truncated, 1_000).is_err());
    }

    #[test]
    fn test_identity_from_provider_payloads() {
        let kakao = json!({ "id": 12345, "kakao_account": { "email": "neo@matrix.io" } });
        assert_eq!(
            SocialIdentity::from_userinfo(AuthKind::Kakao, &kakao).unwrap(),
            SocialIdentity {
                kind: AuthKind::Kakao,
                user_id: "12345".into(),
                email: Some("neo@matrix.io".into()),
            }
        );

        let naver = json!({ "resultcode": "00", "response": { "id": "nv-1", "email": "" } });
        let identity = SocialIdentity::from_userinfo(AuthKind::Naver, &naver).unwrap();
        assert_eq!(identity.user_id, "nv-1");
        assert_eq!(identity.email, None);

        assert!(SocialIdentity::from_userinfo(AuthKind::Google, &json!({ "email": "x@y.z" })).is_none());
    }

    #[test]
    fn test_login_input_shape() {
        let identity = SocialIdentity {
            kind: AuthKind::Google,
            user_id: "g-1".into(),
            email: None,
        };
        assert_eq!(
            identity.login_input(),
            json!({ "user_id": "g-1", "auth_kind": "GOOGLE", "marketing": {} })
        );
    }
}
