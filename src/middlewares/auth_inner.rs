//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::core::errors::Fail;
use crate::domain::models::auth::{AuthMode, Executor, TokenScope};
use crate::services::auth::TokenService;

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
    pub scope: TokenScope,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode;
        let scope = self.scope;

        Box::pin(async move {
            match authenticate(&req, scope) {
                Ok(Some(executor)) => {
                    log::debug!("인증 성공: {} ({:?})", executor.id(), scope);
                    req.extensions_mut().insert(executor);
                }
                // 토큰 없음
                Ok(None) if mode == AuthMode::Optional => {
                    log::debug!("선택적 인증: 토큰 없음, 요청 진행");
                }
                Ok(None) => {
                    return Ok(reject(req, Fail::unauthorized("The access token should not be empty.")));
                }
                Err(fail) => {
                    log::warn!("인증 실패 ({}): {}", req.path(), fail.message);
                    return Ok(reject(req, fail));
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn reject<B>(req: ServiceRequest, fail: Fail) -> ServiceResponse<EitherBody<B>> {
    let response = fail.error_response();
    let (req, _) = req.into_parts();
    ServiceResponse::new(req, response).map_into_right_body()
}

/// 헤더가 없으면 `Ok(None)`, 있지만 검증에 실패하면 401
fn authenticate(req: &ServiceRequest, scope: TokenScope) -> Result<Option<Executor>, Fail> {
    let header = match req.headers().get("Authorization") {
        Some(value) => value.to_str().unwrap_or_default(),
        None => return Ok(None),
    };

    let tokens = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| Fail::new("Token service is not configured.", 500))?;

    let invalid = || Fail::unauthorized("The access token is invalid.");
    let token = TokenService::extract_bearer_token(header).ok_or_else(invalid)?;
    if !tokens.verify(token, scope.is_strict()) {
        return Err(invalid());
    }

    let payload = tokens.decode(token).ok_or_else(invalid)?;
    Ok(Some(Executor(payload)))
}
