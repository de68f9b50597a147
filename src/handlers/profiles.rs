//! 프로필 HTTP 핸들러
//!
//! 프로필 생성/조회/삭제는 계정 토큰으로 호출하며, `/profiles/auth/{id}` 가
//! 게시판용 프로필 토큰을 발급합니다.
//!
//! | 메서드 | 경로 | 인증 | 성공 |
//! |--------|------|------|------|
//! | `POST` | `/profiles/upload` | - | 201 `{profileImageURI}` |
//! | `POST`, `PUT` | `/profiles` | 계정 토큰 | 201 `{id}` |
//! | `GET` | `/profiles/refresh` | `Authorization`, `refresh` 헤더 | 200 `{token}` |
//! | `GET` | `/profiles/auth/{id}` | 계정 토큰 | 201 `{token}` |
//! | `GET` | `/profiles/find/{nickname}` | 계정 토큰 | 200 `{result}` |
//! | `GET` | `/profiles/{id}` | - | 200 `{profile}` |
//! | `GET` | `/profiles` | 계정 토큰 | 200 `{profiles, count}` |
//! | `DELETE` | `/profiles` | 계정 토큰 | 201 `{message}` |

use actix_web::http::header;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde_json::{json, Value};

use crate::core::errors::Fail;
use crate::core::registry::AppServices;
use crate::domain::dto::{ProfileListQuery, TokenResponse};
use crate::domain::models::Executor;
use crate::handlers::{query_input, refresh_pair, with_fields};
use crate::middlewares::AuthMiddleware;

/// 업로드 본문 최대 크기
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// 요청 본문 전체를 이미지로 받아 저장소에 올림
#[post("/upload")]
pub async fn upload_image(
    services: web::Data<AppServices>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, Fail> {
    if body.is_empty() {
        log::error!("업로드 파일을 읽을 수 없습니다 - {}", req.path());
        return Err(Fail::invalid_input("Cannot read the file from req."));
    }

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream");

    let response = services.profiles.upload_image(body.to_vec(), content_type).await?;
    Ok(HttpResponse::Created().json(response))
}

async fn save_profile(services: &AppServices, executor: &Executor, body: Value) -> Result<HttpResponse, Fail> {
    let input = with_fields(body, [("accountId", json!(executor.id()))]);
    let output = services.profiles.create_or_update(input).await?;
    Ok(HttpResponse::Created().json(output))
}

#[post("", wrap = "AuthMiddleware::account()")]
pub async fn create_profile(
    services: web::Data<AppServices>,
    executor: Executor,
    body: web::Json<Value>,
) -> Result<HttpResponse, Fail> {
    save_profile(&services, &executor, body.into_inner()).await
}

#[put("", wrap = "AuthMiddleware::account()")]
pub async fn update_profile(
    services: web::Data<AppServices>,
    executor: Executor,
    body: web::Json<Value>,
) -> Result<HttpResponse, Fail> {
    save_profile(&services, &executor, body.into_inner()).await
}

#[get("/refresh")]
pub async fn refresh(services: web::Data<AppServices>, req: HttpRequest) -> Result<HttpResponse, Fail> {
    let (refresh_token, access_token) = refresh_pair(&req)?;
    let token = services
        .profiles
        .replace_token(&refresh_token, &access_token)
        .await?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

#[get("/auth/{id}", wrap = "AuthMiddleware::account()")]
pub async fn issue_token(
    services: web::Data<AppServices>,
    id: web::Path<String>,
    executor: Executor,
) -> Result<HttpResponse, Fail> {
    let input = json!({ "id": id.into_inner(), "accountId": executor.id() });
    let token = services.profiles.generate_token(input).await?;
    Ok(HttpResponse::Created().json(TokenResponse { token }))
}

#[get("/find/{nickname}", wrap = "AuthMiddleware::account()")]
pub async fn find_nickname(
    services: web::Data<AppServices>,
    nickname: web::Path<String>,
) -> Result<HttpResponse, Fail> {
    let result = services.profiles.has_nickname(&nickname).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/{id}")]
pub async fn get_profile(services: web::Data<AppServices>, id: web::Path<String>) -> Result<HttpResponse, Fail> {
    let profile = services
        .profiles
        .find_one(json!({ "id": id.into_inner() }))
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[get("", wrap = "AuthMiddleware::account()")]
pub async fn list_profiles(
    services: web::Data<AppServices>,
    executor: Executor,
    query: web::Query<ProfileListQuery>,
) -> Result<HttpResponse, Fail> {
    let input = with_fields(
        query_input(&[
            ("accountId", &query.account_id),
            ("orderKey", &query.order_key),
            ("orderType", &query.order_type),
        ]),
        [("accountIdByToken", json!(executor.id()))],
    );
    let profiles = services.profiles.query(input).await?;
    Ok(HttpResponse::Ok().json(profiles))
}

#[delete("", wrap = "AuthMiddleware::account()")]
pub async fn delete_profile(
    services: web::Data<AppServices>,
    executor: Executor,
    body: web::Json<Value>,
) -> Result<HttpResponse, Fail> {
    let input = with_fields(body.into_inner(), [("accountId", json!(executor.id()))]);
    let message = services.profiles.delete(input).await?;
    Ok(HttpResponse::Created().json(message))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;

    use super::*;
    use crate::core::registry::testing::in_memory_services;
    use crate::routes::testing::app;

    /// 가입 후 로그인한 계정의 액세스 토큰
    macro_rules! account_token {
        ($app:expr, $email:expr) => {{
            let register = test::TestRequest::post()
                .uri("/api/accounts/register")
                .set_json(json!({ "email": $email, "password": "matrix123!", "auth_kind": "EMAIL" }))
                .to_request();
            test::call_service($app, register).await;

            let login = test::TestRequest::post()
                .uri("/api/accounts/login")
                .set_json(json!({ "email": $email, "password": "matrix123!" }))
                .to_request();
            let body: Value = test::call_and_read_body_json($app, login).await;
            body["token"]["accessToken"].as_str().unwrap().to_string()
        }};
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }

    #[actix_web::test]
    async fn test_profile_flow_issues_profile_token() {
        let services = in_memory_services();
        let tokens = services.tokens.clone();
        let app = test::init_service(app(services)).await;
        let access = account_token!(&app, "neo@matrix.io");

        let request = test::TestRequest::post()
            .uri("/api/profiles")
            .insert_header(bearer(&access))
            .set_json(json!({ "role": "MEMBER", "nickname": "neo" }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = test::read_body_json::<Value, _>(response).await["id"]
            .as_str()
            .unwrap()
            .to_string();

        let request = test::TestRequest::get()
            .uri(&format!("/api/profiles/auth/{}", id))
            .insert_header(bearer(&access))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(response).await;
        assert!(tokens.verify(body["token"]["accessToken"].as_str().unwrap(), true));

        let request = test::TestRequest::get().uri(&format!("/api/profiles/{}", id)).to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["profile"]["nickname"], "neo");
    }

    #[actix_web::test]
    async fn test_list_profiles_of_other_account_is_403() {
        let app = test::init_service(app(in_memory_services())).await;
        let neo = account_token!(&app, "neo@matrix.io");
        let smith = account_token!(&app, "smith@matrix.io");

        let request = test::TestRequest::post()
            .uri("/api/profiles")
            .insert_header(bearer(&neo))
            .set_json(json!({ "role": "MEMBER", "nickname": "neo" }))
            .to_request();
        test::call_service(&app, request).await;

        let request = test::TestRequest::get()
            .uri("/api/profiles?accountId=someone-else")
            .insert_header(bearer(&smith))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_find_nickname_requires_account_token() {
        let app = test::init_service(app(in_memory_services())).await;

        let request = test::TestRequest::get().uri("/api/profiles/find/neo").to_request();
        assert_eq!(test::call_service(&app, request).await.status(), StatusCode::UNAUTHORIZED);

        let access = account_token!(&app, "neo@matrix.io");
        let request = test::TestRequest::get()
            .uri("/api/profiles/find/neo")
            .insert_header(bearer(&access))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body, json!({ "result": false }));
    }

    #[actix_web::test]
    async fn test_upload_image() {
        let app = test::init_service(app(in_memory_services())).await;

        let request = test::TestRequest::post()
            .uri("/api/profiles/upload")
            .insert_header((header::CONTENT_TYPE, "image/png"))
            .set_payload(vec![0x89, 0x50, 0x4e, 0x47])
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(response).await;
        assert!(body["profileImageURI"]
            .as_str()
            .unwrap()
            .contains("profile-images/profile_"));

        let request = test::TestRequest::post().uri("/api/profiles/upload").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
