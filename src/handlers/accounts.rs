//! 계정 HTTP 핸들러
//!
//! | 메서드 | 경로 | 인증 | 성공 |
//! |--------|------|------|------|
//! | `POST` | `/accounts/register` | - | 201 `{id}` |
//! | `POST` | `/accounts/login` | - | 201 `{token}` |
//! | `PUT` | `/accounts/reset-password` | - | 201 `{id}` |
//! | `GET` | `/accounts/find/{email}` | - | 200 `{result}` |
//! | `GET` | `/accounts/forget-password/{email}` | - | 200 `{message}` |
//! | `GET` | `/accounts/auth/{segment}` | - | 302 또는 200 `{authCode}` |
//! | `GET` | `/accounts/refresh` | `Authorization`, `refresh` 헤더 | 200 `{token}` |
//! | `GET` | `/accounts` | 계정 토큰 | 200 `{accounts, count}` |
//! | `GET` | `/accounts/{id}` | 계정 토큰 | 200 `{account}` |
//! | `PUT` | `/accounts/{id}` | 계정 토큰 | 201 `{id}` |
//! | `DELETE` | `/accounts` | 계정 토큰 | 201 `{message}` |
//!
//! `/accounts/auth/{segment}` 는 세그먼트에 따라 세 가지로 나뉩니다.
//!
//! ```text
//! kakao | naver | google | facebook  ─► 프로바이더 로그인 페이지로 302
//! kakao_oauth ...                     ─► 콜백: 로그인 후 OAUTH_REDIRECT_URL/login/mid 로 302
//! 그 외                               ─► 이메일로 보고 6자리 인증 코드 발송
//! ```

use actix_web::http::header;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde_json::{json, Value};
use validator::Validate;

use crate::config::{OAuthConfig, OAuthProviderConfig};
use crate::core::errors::Fail;
use crate::core::registry::AppServices;
use crate::domain::catalog::AuthKind;
use crate::domain::dto::{AccountListQuery, LoginRequest, OAuthCallbackQuery, ResetPasswordRequest, TokenResponse};
use crate::domain::models::Executor;
use crate::handlers::{query_input, refresh_pair, with_fields};
use crate::middlewares::AuthMiddleware;
use crate::services::accounts::LoginMethod;
use crate::usecases::guard::first_violation;

#[post("/register")]
pub async fn register(
    services: web::Data<AppServices>,
    body: web::Json<Value>,
) -> Result<HttpResponse, Fail> {
    let output = services.accounts.register(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(output))
}

#[post("/login")]
pub async fn login(
    services: web::Data<AppServices>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, Fail> {
    body.validate()
        .map_err(|errors| Fail::invalid_input(first_violation(&errors)))?;

    let input = json!({ "email": body.email, "password": body.password });
    let token = services.accounts.login(input, LoginMethod::Email).await?;

    log::info!("이메일 로그인: {}", body.email);
    Ok(HttpResponse::Created().json(TokenResponse { token }))
}

#[put("/reset-password")]
pub async fn reset_password(
    services: web::Data<AppServices>,
    body: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, Fail> {
    body.validate()
        .map_err(|errors| Fail::unauthorized(first_violation(&errors)))?;

    let output = services
        .accounts
        .update_password(&body.auth_code, &body.email, &body.password)
        .await?;
    Ok(HttpResponse::Created().json(output))
}

#[get("/find/{email}")]
pub async fn find_email(
    services: web::Data<AppServices>,
    email: web::Path<String>,
) -> Result<HttpResponse, Fail> {
    let result = services.accounts.has_email(&email).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/forget-password/{email}")]
pub async fn forget_password(
    services: web::Data<AppServices>,
    email: web::Path<String>,
) -> Result<HttpResponse, Fail> {
    let message = services.accounts.password_auth_code(&email).await?;
    Ok(HttpResponse::Ok().json(message))
}

#[get("/auth/{segment}")]
pub async fn auth(
    services: web::Data<AppServices>,
    segment: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, Fail> {
    let segment = segment.into_inner();

    if let Some(kind) = OAuthProviderConfig::provider_from_path(&segment) {
        let url = services.oauth.login_url(kind)?;
        return Ok(redirect(&url));
    }

    let callback = segment
        .strip_suffix("_oauth")
        .and_then(OAuthProviderConfig::provider_from_path);
    if let Some(kind) = callback {
        return oauth_callback(&services, kind, query.into_inner()).await;
    }

    // 인증 코드 발급 실패는 항상 400
    let response = services
        .accounts
        .email_auth_code(&segment)
        .await
        .map_err(|fail| Fail::invalid_input(fail.message))?;
    Ok(HttpResponse::Ok().json(response))
}

async fn oauth_callback(
    services: &AppServices,
    kind: AuthKind,
    query: OAuthCallbackQuery,
) -> Result<HttpResponse, Fail> {
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or(error);
        log::warn!("{} OAuth 에러: {}", kind, description);
        return Err(Fail::unauthorized(description));
    }

    let (code, state) = match (query.code, query.state) {
        (Some(code), Some(state)) => (code, state),
        _ => return Err(Fail::unauthorized("The oauth code and state should not be empty.")),
    };

    let identity = services.oauth.authenticate(kind, &code, &state).await?;
    let token = services.accounts.social_login(&identity).await?;

    log::info!("{} 소셜 로그인: {}", kind, identity.user_id);
    Ok(redirect(&format!(
        "{}/login/mid?accessToken={}&refreshToken={}",
        OAuthConfig::redirect_url(),
        token.access_token,
        token.refresh_token
    )))
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[get("/refresh")]
pub async fn refresh(services: web::Data<AppServices>, req: HttpRequest) -> Result<HttpResponse, Fail> {
    let (refresh_token, access_token) = refresh_pair(&req)?;
    let token = services
        .accounts
        .replace_token(&refresh_token, &access_token)
        .await?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

#[get("", wrap = "AuthMiddleware::account()")]
pub async fn list_accounts(
    services: web::Data<AppServices>,
    query: web::Query<AccountListQuery>,
) -> Result<HttpResponse, Fail> {
    let input = query_input(&[
        ("email", &query.email),
        ("orderKey", &query.order_key),
        ("orderType", &query.order_type),
    ]);
    let accounts = services.accounts.query(input).await?;
    Ok(HttpResponse::Ok().json(accounts))
}

#[get("/{id}", wrap = "AuthMiddleware::account()")]
pub async fn get_account(
    services: web::Data<AppServices>,
    id: web::Path<String>,
    executor: Executor,
) -> Result<HttpResponse, Fail> {
    let input = json!({ "id": id.into_inner(), "idByToken": executor.id() });
    let account = services.accounts.find_one(input).await?;
    Ok(HttpResponse::Ok().json(account))
}

#[put("/{id}", wrap = "AuthMiddleware::account()")]
pub async fn update_account(
    services: web::Data<AppServices>,
    id: web::Path<String>,
    executor: Executor,
    body: web::Json<Value>,
) -> Result<HttpResponse, Fail> {
    let input = with_fields(
        body.into_inner(),
        [("id", json!(id.into_inner())), ("idByToken", json!(executor.id()))],
    );
    let output = services.accounts.update(input).await?;
    Ok(HttpResponse::Created().json(output))
}

#[delete("", wrap = "AuthMiddleware::account()")]
pub async fn delete_account(
    services: web::Data<AppServices>,
    executor: Executor,
    body: web::Json<Value>,
) -> Result<HttpResponse, Fail> {
    let input = with_fields(body.into_inner(), [("idByToken", json!(executor.id()))]);
    let message = services.accounts.delete(input).await?;
    Ok(HttpResponse::Created().json(message))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;

    use super::*;
    use crate::core::registry::testing::in_memory_services;
    use crate::routes::testing::app;

    const PASSWORD: &str = "matrix123!";

    fn register_request(email: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/accounts/register")
            .set_json(json!({ "email": email, "password": PASSWORD, "auth_kind": "EMAIL" }))
    }

    fn login_request(email: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/accounts/login")
            .set_json(json!({ "email": email, "password": PASSWORD }))
    }

    #[actix_web::test]
    async fn test_register_and_login() {
        let app = test::init_service(app(in_memory_services())).await;

        let response = test::call_service(&app, register_request("neo@matrix.io").to_request()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(response).await;
        assert!(body["id"].is_string());

        let response = test::call_service(&app, login_request("neo@matrix.io").to_request()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(response).await;
        assert!(body["token"]["accessToken"].is_string());
        assert!(body["token"]["refreshToken"].is_string());
    }

    #[actix_web::test]
    async fn test_duplicate_register_is_400() {
        let app = test::init_service(app(in_memory_services())).await;
        test::call_service(&app, register_request("neo@matrix.io").to_request()).await;

        let response = test::call_service(&app, register_request("neo@matrix.io").to_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["status"], 400);
    }

    #[actix_web::test]
    async fn test_login_with_empty_password_is_400() {
        let app = test::init_service(app(in_memory_services())).await;

        let request = test::TestRequest::post()
            .uri("/api/accounts/login")
            .set_json(json!({ "email": "neo@matrix.io" }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "Email and password should not be empty.");
    }

    #[actix_web::test]
    async fn test_reset_password_with_missing_field_is_401() {
        let app = test::init_service(app(in_memory_services())).await;

        let request = test::TestRequest::put()
            .uri("/api/accounts/reset-password")
            .set_json(json!({ "email": "neo@matrix.io", "password": PASSWORD }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "AuthCode, Email and New Password should not be empty.");
    }

    #[actix_web::test]
    async fn test_get_account_with_token() {
        let app = test::init_service(app(in_memory_services())).await;
        let response = test::call_service(&app, register_request("neo@matrix.io").to_request()).await;
        let id = test::read_body_json::<Value, _>(response).await["id"].as_str().unwrap().to_string();
        let token: Value = test::call_and_read_body_json(&app, login_request("neo@matrix.io").to_request()).await;
        let access = token["token"]["accessToken"].as_str().unwrap();

        let request = test::TestRequest::get()
            .uri(&format!("/api/accounts/{}", id))
            .insert_header(("Authorization", format!("Bearer {}", access)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["account"]["id"], id.as_str());

        let request = test::TestRequest::get().uri(&format!("/api/accounts/{}", id)).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_find_email_and_auth_code() {
        let app = test::init_service(app(in_memory_services())).await;
        test::call_service(&app, register_request("neo@matrix.io").to_request()).await;

        let request = test::TestRequest::get().uri("/api/accounts/find/neo@matrix.io").to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body, json!({ "result": true }));

        let request = test::TestRequest::get().uri("/api/accounts/auth/neo@matrix.io").to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["authCode"].as_str().unwrap().len(), 6);

        let request = test::TestRequest::get().uri("/api/accounts/auth/ghost@matrix.io").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_unconfigured_provider_is_400() {
        let app = test::init_service(app(in_memory_services())).await;

        let request = test::TestRequest::get().uri("/api/accounts/auth/kakao").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "'KAKAO' login is not configured.");
    }

    #[actix_web::test]
    async fn test_oauth_callback_with_provider_error_is_401() {
        let app = test::init_service(app(in_memory_services())).await;

        let request = test::TestRequest::get()
            .uri("/api/accounts/auth/google_oauth?error=access_denied")
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "access_denied");
    }

    #[actix_web::test]
    async fn test_refresh_without_headers_is_401() {
        let app = test::init_service(app(in_memory_services())).await;

        let request = test::TestRequest::get().uri("/api/accounts/refresh").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "Both tokens should not be empty.");
    }

    #[actix_web::test]
    async fn test_refresh_with_live_access_is_401() {
        let app = test::init_service(app(in_memory_services())).await;
        test::call_service(&app, register_request("neo@matrix.io").to_request()).await;
        let token: Value = test::call_and_read_body_json(&app, login_request("neo@matrix.io").to_request()).await;

        let request = test::TestRequest::get()
            .uri("/api/accounts/refresh")
            .insert_header((
                "Authorization",
                format!("Bearer {}", token["token"]["accessToken"].as_str().unwrap()),
            ))
            .insert_header(("refresh", token["token"]["refreshToken"].as_str().unwrap()))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "The access token is not expired.");
    }

    #[actix_web::test]
    async fn test_delete_account_then_login_fails() {
        let app = test::init_service(app(in_memory_services())).await;
        let response = test::call_service(&app, register_request("neo@matrix.io").to_request()).await;
        let id = test::read_body_json::<Value, _>(response).await["id"].as_str().unwrap().to_string();
        let token: Value = test::call_and_read_body_json(&app, login_request("neo@matrix.io").to_request()).await;
        let access = token["token"]["accessToken"].as_str().unwrap();

        let request = test::TestRequest::delete()
            .uri("/api/accounts")
            .insert_header(("Authorization", format!("Bearer {}", access)))
            .set_json(json!({ "id": id }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let request = test::TestRequest::get()
            .uri(&format!("/api/accounts/{}", id))
            .insert_header(("Authorization", format!("Bearer {}", access)))
            .to_request();
        assert_eq!(test::call_service(&app, request).await.status(), StatusCode::NOT_FOUND);
    }
}
