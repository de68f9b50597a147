//! # Authentication Configuration Module
//!
//! JWT 토큰과 소셜 로그인(OAuth 2.0 authorization code) 설정을 관리합니다.
//!
//! ## 필수 환경 변수 설정
//!
//! ### JWT 토큰 설정
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_ACCESS_MINUTES="30"
//! export JWT_REFRESH_DAYS="14"
//! ```
//!
//! ### OAuth 프로바이더 설정
//!
//! 프로바이더마다 `<P>_CLIENT_ID`, `<P>_CLIENT_SECRET`, `<P>_CALLBACK_URL` 을 읽습니다.
//! (`P` = `KAKAO` | `NAVER` | `GOOGLE` | `FACEBOOK`)
//!
//! ```bash
//! export KAKAO_CLIENT_ID="kakao-rest-api-key"
//! export KAKAO_CALLBACK_URL="http://localhost:3000/api/accounts/auth/kakao_oauth"
//! export OAUTH_REDIRECT_URL="http://localhost:8080"
//! ```
//!
//! `<P>_CLIENT_ID` 가 없는 프로바이더는 비활성 상태로 취급됩니다.

use std::env;

use crate::domain::catalog::AuthKind;

/// JWT 토큰 설정
pub struct JwtConfig;

impl JwtConfig {
    /// HS256 서명 키
    ///
    /// 설정되지 않으면 개발용 기본값을 사용하고 경고를 남깁니다.
    pub fn secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            "secret_dev".to_string()
        })
    }

    /// 액세스 토큰 유효 시간 (분, 기본 30)
    pub fn access_minutes() -> i64 {
        env::var("JWT_ACCESS_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30)
    }

    /// 리프레시 토큰 유효 기간 (일, 기본 14)
    pub fn refresh_days() -> i64 {
        env::var("JWT_REFRESH_DAYS")
            .unwrap_or_else(|_| "14".to_string())
            .parse()
            .unwrap_or(14)
    }
}

/// OAuth 공통 설정
///
/// state 매개변수 서명과 로그인 완료 후 프론트엔드 리디렉션 주소를 관리합니다.
pub struct OAuthConfig;

impl OAuthConfig {
    pub fn state_secret() -> String {
        env::var("OAUTH_STATE_SECRET").unwrap_or_else(|_| {
            log::warn!("OAUTH_STATE_SECRET not set, using default (not secure for production!)");
            "oauth-state-secret".to_string()
        })
    }

    pub fn session_timeout_minutes() -> i64 {
        env::var("OAUTH_SESSION_TIMEOUT_MINUTES")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10)
    }

    /// 소셜 로그인 성공 후 토큰을 전달받을 프론트엔드 주소
    pub fn redirect_url() -> String {
        env::var("OAUTH_REDIRECT_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
    }
}

/// 프로바이더별 OAuth 클라이언트 설정
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthProviderConfig {
    pub kind: AuthKind,
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
    pub auth_uri: &'static str,
    pub token_uri: &'static str,
    pub userinfo_uri: &'static str,
    pub scope: &'static str,
}

impl OAuthProviderConfig {
    /// 환경 변수에서 프로바이더 설정을 읽습니다. client id 가 없으면 `None`.
    pub fn load(kind: AuthKind) -> Option<Self> {
        let prefix = kind.as_str();
        let client_id = env::var(format!("{}_CLIENT_ID", prefix))
            .ok()
            .filter(|id| !id.is_empty())?;

        Some(Self::with_credentials(
            kind,
            client_id,
            env::var(format!("{}_CLIENT_SECRET", prefix)).unwrap_or_default(),
            env::var(format!("{}_CALLBACK_URL", prefix)).unwrap_or_default(),
        ))
    }

    /// EMAIL 은 OAuth 프로바이더가 아니므로 `None`
    pub fn endpoints(kind: AuthKind) -> Option<(&'static str, &'static str, &'static str, &'static str)> {
        match kind {
            AuthKind::Kakao => Some((
                "https://kauth.kakao.com/oauth/authorize",
                "https://kauth.kakao.com/oauth/token",
                "https://kapi.kakao.com/v2/user/me",
                "account_email",
            )),
            AuthKind::Naver => Some((
                "https://nid.naver.com/oauth2.0/authorize",
                "https://nid.naver.com/oauth2.0/token",
                "https://openapi.naver.com/v1/nid/me",
                "",
            )),
            AuthKind::Google => Some((
                "https://accounts.google.com/o/oauth2/v2/auth",
                "https://oauth2.googleapis.com/token",
                "https://www.googleapis.com/oauth2/v2/userinfo",
                "openid email profile",
            )),
            AuthKind::Facebook => Some((
                "https://www.facebook.com/v18.0/dialog/oauth",
                "https://graph.facebook.com/v18.0/oauth/access_token",
                "https://graph.facebook.com/me?fields=id,email",
                "email",
            )),
            AuthKind::Email => None,
        }
    }

    pub fn with_credentials(
        kind: AuthKind,
        client_id: String,
        client_secret: String,
        callback_url: String,
    ) -> Self {
        let (auth_uri, token_uri, userinfo_uri, scope) =
            Self::endpoints(kind).unwrap_or(("", "", "", ""));
        Self {
            kind,
            client_id,
            client_secret,
            callback_url,
            auth_uri,
            token_uri,
            userinfo_uri,
            scope,
        }
    }

    /// 경로 세그먼트(`kakao`, `google` ...)를 소셜 로그인 종류로 변환
    pub fn provider_from_path(segment: &str) -> Option<AuthKind> {
        segment
            .to_uppercase()
            .parse::<AuthKind>()
            .ok()
            .filter(AuthKind::is_social)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_path() {
        assert_eq!(OAuthProviderConfig::provider_from_path("kakao"), Some(AuthKind::Kakao));
        assert_eq!(OAuthProviderConfig::provider_from_path("GOOGLE"), Some(AuthKind::Google));
        assert_eq!(OAuthProviderConfig::provider_from_path("email"), None);
        assert_eq!(OAuthProviderConfig::provider_from_path("twitter"), None);
    }

    #[test]
    fn test_every_social_kind_has_endpoints() {
        for kind in AuthKind::SOCIAL {
            let config = OAuthProviderConfig::with_credentials(
                kind,
                "id".to_string(),
                "secret".to_string(),
                "http://localhost/callback".to_string(),
            );
            assert!(config.auth_uri.starts_with("https://"));
            assert!(config.token_uri.starts_with("https://"));
        }
        assert!(OAuthProviderConfig::endpoints(AuthKind::Email).is_none());
    }

    #[test]
    fn test_jwt_defaults() {
        if env::var("JWT_ACCESS_MINUTES").is_err() {
            assert_eq!(JwtConfig::access_minutes(), 30);
        }
        if env::var("JWT_REFRESH_DAYS").is_err() {
            assert_eq!(JwtConfig::refresh_days(), 14);
        }
    }
}
