//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 usecase 입력(`serde_json::Value`)으로 옮기고 컨트롤러 결과를
//! 상태 코드와 함께 응답합니다. 실패는 항상 `{message, status}` 본문입니다.
//!
//! ```text
//! Client ─► routes ─► AuthMiddleware ─► handlers ─► services ─► usecases ─► Store
//! ```
//!
//! 인증이 필요한 핸들러는 [`Executor`](crate::domain::models::Executor) 인자로
//! 토큰 페이로드를 받고, 그 `id` 를 입력의 실행자 필드에 넣습니다.
//!
//! | 도메인 | 실행자 필드 |
//! |--------|-------------|
//! | 계정 | `idByToken` |
//! | 프로필 | `accountId`, `accountIdByToken` |
//! | 게시글 | `created_by` |

pub mod accounts;
pub mod boards;
pub mod health;
pub mod profiles;

use actix_web::HttpRequest;
use serde_json::{Map, Value};

use crate::core::errors::Fail;
use crate::services::auth::TokenService;

/// 요청 본문에 필드를 덮어씀 (객체가 아니면 빈 객체에서 시작)
pub(crate) fn with_fields<I>(body: Value, fields: I) -> Value
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    let mut object = match body {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in fields {
        object.insert(key.to_string(), value);
    }
    Value::Object(object)
}

/// 값이 있는 쿼리 매개변수만 모아 입력 객체로 만듦
pub(crate) fn query_input(pairs: &[(&'static str, &Option<String>)]) -> Value {
    let object = pairs
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|value| (key.to_string(), Value::String(value.clone())))
        })
        .collect::<Map<String, Value>>();
    Value::Object(object)
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}

/// 토큰 교체 요청의 `(refresh, access)` 쌍
///
/// `Authorization` 에 Bearer 접두사가 없으면 access 는 빈 문자열이 됩니다.
pub(crate) fn refresh_pair(req: &HttpRequest) -> Result<(String, String), Fail> {
    match (header(req, "Authorization"), header(req, "refresh")) {
        (Some(authorization), Some(refresh)) => {
            let access = TokenService::extract_bearer_token(authorization).unwrap_or_default();
            Ok((refresh.to_string(), access.to_string()))
        }
        _ => {
            log::error!("Tokens are needed for refresh! - {}", req.path());
            Err(Fail::unauthorized("Both tokens should not be empty."))
        }
    }
}
