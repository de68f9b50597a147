//! 인증 서비스 모듈
//!
//! - [`token_service`] - HS256 액세스/리프레시 토큰 서명과 검증
//! - [`session_service`] - 로그인 시 토큰 발급, 리프레시 토큰 저장과 교체, 비밀번호 재설정 코드
//! - [`oauth_service`] - KAKAO, NAVER, GOOGLE, FACEBOOK Authorization Code 플로우
//!
//! ```rust,ignore
//! use crate::services::auth::{SessionService, TokenService};
//!
//! let session = SessionService::new(TokenService::from_config(), kv);
//! let pair = session.issue(&TokenPayload::account(id)).await?;
//! ```

pub mod oauth_service;
pub mod session_service;
pub mod token_service;

pub use oauth_service::*;
pub use session_service::*;
pub use token_service::*;
