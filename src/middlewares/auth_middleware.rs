//! JWT 인증 미들웨어
//!
//! `Authorization: Bearer {token}` 헤더를 검증하고 페이로드를
//! [`Executor`](crate::domain::models::Executor) 로 Request Extensions 에 넣습니다.
//!
//! | 생성자 | 토큰 없음 | 잘못된 토큰 | 통과 조건 |
//! |--------|-----------|-------------|-----------|
//! | [`AuthMiddleware::account`] | 401 | 401 | `id` |
//! | [`AuthMiddleware::profile`] | 401 | 401 | `id`, `role`, `name` |
//! | [`AuthMiddleware::optional_profile`] | 통과 | 401 | `id`, `role`, `name` |
//!
//! 검증에는 `web::Data<TokenService>` 앱 데이터를 사용합니다.
//!
//! ```rust,ignore
//! web::resource("/boards")
//!     .wrap(AuthMiddleware::profile())
//!     .route(web::post().to(boards::create_board))
//! ```

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::domain::models::auth::{AuthMode, TokenScope};
use crate::middlewares::auth_inner::AuthMiddlewareService;

pub struct AuthMiddleware {
    mode: AuthMode,
    scope: TokenScope,
}

impl AuthMiddleware {
    pub fn new(mode: AuthMode, scope: TokenScope) -> Self {
        Self { mode, scope }
    }

    /// 계정 토큰 필수
    pub fn account() -> Self {
        Self::new(AuthMode::Required, TokenScope::Account)
    }

    /// 프로필 토큰 필수
    pub fn profile() -> Self {
        Self::new(AuthMode::Required, TokenScope::Profile)
    }

    /// 프로필 토큰이 있으면 검증, 없으면 익명으로 통과
    pub fn optional_profile() -> Self {
        Self::new(AuthMode::Optional, TokenScope::Profile)
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode,
            scope: self.scope,
        }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};
    use chrono::Duration;
    use serde_json::Value;

    use super::*;
    use crate::domain::catalog::Role;
    use crate::domain::models::{Executor, OptionalExecutor, TokenPayload};
    use crate::services::auth::TokenService;
    use crate::services::testing::token_service;

    async fn whoami(executor: Executor) -> HttpResponse {
        HttpResponse::Ok().body(executor.id().to_string())
    }

    async fn maybe_whoami(executor: OptionalExecutor) -> HttpResponse {
        let id = executor.0.map(|e| e.id().to_string()).unwrap_or_else(|| "anonymous".into());
        HttpResponse::Ok().body(id)
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }

    macro_rules! app {
        ($middleware:expr, $handler:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(token_service()))
                    .service(web::resource("/").wrap($middleware).to($handler)),
            )
            .await
        };
    }

    async fn message(response: ServiceResponse<impl actix_web::body::MessageBody>) -> String {
        let body: Value = test::read_body_json(response).await;
        body["message"].as_str().unwrap_or_default().to_string()
    }

    #[actix_web::test]
    async fn test_account_token_passes_account_guard() {
        let app = app!(AuthMiddleware::account(), whoami);
        let token = token_service().sign_access(&TokenPayload::account("a1")).unwrap();

        let request = test::TestRequest::get().uri("/").insert_header(bearer(&token)).to_request();
        let body = test::call_and_read_body(&app, request).await;
        assert_eq!(body, "a1");
    }

    #[actix_web::test]
    async fn test_missing_header_is_rejected() {
        let app = app!(AuthMiddleware::account(), whoami);

        let response = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(message(response).await, "The access token should not be empty.");
    }

    #[actix_web::test]
    async fn test_expired_token_is_invalid() {
        let app = app!(AuthMiddleware::account(), whoami);
        let token = token_service()
            .sign_with_ttl(&TokenPayload::account("a1"), Duration::seconds(-5))
            .unwrap();

        let request = test::TestRequest::get().uri("/").insert_header(bearer(&token)).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(message(response).await, "The access token is invalid.");
    }

    #[actix_web::test]
    async fn test_profile_guard_rejects_account_token() {
        let app = app!(AuthMiddleware::profile(), whoami);
        let account = token_service().sign_access(&TokenPayload::account("a1")).unwrap();
        let profile = token_service()
            .sign_access(&TokenPayload::profile("p1", Role::Member, "neo"))
            .unwrap();

        let request = test::TestRequest::get().uri("/").insert_header(bearer(&account)).to_request();
        assert_eq!(test::call_service(&app, request).await.status(), StatusCode::UNAUTHORIZED);

        let request = test::TestRequest::get().uri("/").insert_header(bearer(&profile)).to_request();
        assert_eq!(test::call_and_read_body(&app, request).await, "p1");
    }

    #[actix_web::test]
    async fn test_optional_profile_allows_anonymous_but_not_forged() {
        let app = app!(AuthMiddleware::optional_profile(), maybe_whoami);

        let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(body, "anonymous");

        let forged = TokenService::new("other", Duration::minutes(1), Duration::days(1))
            .sign_access(&TokenPayload::profile("p1", Role::Member, "neo"))
            .unwrap();
        let request = test::TestRequest::get().uri("/").insert_header(bearer(&forged)).to_request();
        assert_eq!(test::call_service(&app, request).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_header_without_bearer_prefix_is_invalid() {
        let app = app!(AuthMiddleware::account(), whoami);
        let token = token_service().sign_access(&TokenPayload::account("a1")).unwrap();

        let request = test::TestRequest::get()
            .uri("/")
            .insert_header(("Authorization", token))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(message(response).await, "The access token is invalid.");
    }
}
