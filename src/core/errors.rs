//! # Fail: 통합 실패 값
//!
//! 서비스 전역에서 사용하는 단일 에러 표현입니다. 모든 usecase, 컨트롤러,
//! 핸들러는 실패를 `{message, status}` 형태의 값으로 반환하며,
//! 프로세스를 중단시키는 패닉이나 예외로 흐름을 제어하지 않습니다.
//!
//! ## 상태 코드 규약
//!
//! | 분류 | status | 사용 시나리오 |
//! |------|--------|---------------|
//! | InvalidInput | 400 | 입력 형태/타입/열거형 검증 실패, 중복 nickname/email |
//! | Unauthorized | 401 | 토큰 누락, 위조, 만료, refresh 토큰 불일치 |
//! | Forbidden | 403 | 실행자와 소유자 불일치, 존재하지 않는 id로 수정 시도 |
//! | NotFound | 404 | id/email/nickname 으로 조회 실패 |
//! | Unavailable | 503 | 저장소 연결/쿼리 실패 (원본 메시지 보존) |
//!
//! ## HTTP 응답 변환
//!
//! `actix_web::ResponseError` 를 구현하므로 핸들러는 `Result<HttpResponse, Fail>` 을
//! 그대로 반환할 수 있습니다. 응답 본문은 항상 다음 형식입니다.
//!
//! ```json
//! { "message": "'a@b.c' already exists.", "status": 400 }
//! ```
//!
//! ```rust,ignore
//! use crate::core::errors::Fail;
//!
//! async fn find(id: &str) -> Result<Account, Fail> {
//!     repo.find_active(id).await?
//!         .ok_or_else(|| Fail::not_found(format!("'{}' is not found in Accounts.", id)))
//! }
//! ```

use std::fmt::Display;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 실패 값
///
/// `status` 는 HTTP 상태 코드와 같은 의미를 가집니다.
/// 알 수 없는 코드가 들어오면 응답 시 400 으로 처리됩니다.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct Fail {
    pub message: String,
    pub status: u16,
}

impl Fail {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    /// 400 - 입력 검증 실패
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(message, 400)
    }

    /// 401 - 인증 실패
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(message, 401)
    }

    /// 403 - 권한 없음
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(message, 403)
    }

    /// 404 - 리소스 없음
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, 404)
    }

    /// 503 - 저장소/외부 시스템 사용 불가
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(message, 503)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn http_status(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_REQUEST)
    }
}

impl ResponseError for Fail {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.http_status()).json(self)
    }
}

/// `Result<T, Fail>` 별칭
pub type FailResult<T> = Result<T, Fail>;

/// 외부 라이브러리 에러를 503 `Fail` 로 변환하는 확장 trait
///
/// 원본 에러 메시지는 `"{context}: {error}"` 형태로 보존됩니다.
///
/// ```rust,ignore
/// let hash = bcrypt::hash(password, cost).context("Failed to hash password")?;
/// ```
pub trait FailContext<T> {
    fn context(self, msg: &str) -> FailResult<T>;

    fn with_context<F>(self, f: F) -> FailResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> FailContext<T> for Result<T, E>
where
    E: Display,
{
    fn context(self, msg: &str) -> FailResult<T> {
        self.map_err(|e| Fail::unavailable(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> FailResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| Fail::unavailable(format!("{}: {}", f(), e)))
    }
}
