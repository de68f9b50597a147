//! 요청 실행자 추출기
//!
//! JWT 미들웨어가 검증한 페이로드를 Request Extensions 에 저장하면
//! 핸들러는 `Executor` / `OptionalExecutor` 인자로 꺼내 씁니다.

use std::future::{ready, Ready};

use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::core::errors::Fail;
use crate::domain::models::token::TokenPayload;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Executor(pub TokenPayload);

impl Executor {
    pub fn id(&self) -> &str {
        &self.0.id
    }
}

impl FromRequest for Executor {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Executor>() {
            Some(executor) => ready(Ok(executor.clone())),
            None => ready(Err(Fail::unauthorized("The access token should not be empty.").into())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptionalExecutor(pub Option<Executor>);

impl FromRequest for OptionalExecutor {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let executor = req.extensions().get::<Executor>().cloned();
        ready(Ok(OptionalExecutor(executor)))
    }
}
