//! API 라우트 설정 모듈
//!
//! 모든 엔드포인트는 `/api` 아래에 등록됩니다. 인증 수준은 핸들러 매크로의
//! `wrap` 인자로 라우트마다 지정합니다.
//!
//! | 미들웨어 | 적용 대상 |
//! |----------|-----------|
//! | 없음 | 가입, 로그인, 토큰 교체, 인증 코드, 단건 프로필/게시글 조회, 게시글 목록 |
//! | `AuthMiddleware::account()` | 계정 조회/수정/삭제, 프로필 관리, 프로필 토큰 발급 |
//! | `AuthMiddleware::profile()` | 게시글 작성/수정/삭제 |
//!
//! 같은 스코프 안에서는 등록 순서대로 매칭되므로 `/refresh` 같은 고정 경로를
//! `/{id}` 보다 먼저 등록합니다.
//!
//! ```rust,ignore
//! let app = App::new()
//!     .app_data(web::Data::new(services.tokens.clone()))
//!     .app_data(web::Data::new(services))
//!     .configure(configure_all_routes);
//! ```

use actix_web::web;

use crate::core::errors::Fail;
use crate::handlers::{accounts, boards, health, profiles};

/// 모든 라우트와 추출기 설정을 등록합니다
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(web::PayloadConfig::new(profiles::MAX_IMAGE_BYTES));

    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .service(account_routes())
            .service(profile_routes())
            .service(board_routes()),
    );
}

/// 본문 파싱 실패도 `{message, status}` 400 으로 응답
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| Fail::invalid_input(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| Fail::invalid_input(err.to_string()).into())
}

fn account_routes() -> actix_web::Scope {
    web::scope("/accounts")
        .service(accounts::register)
        .service(accounts::login)
        .service(accounts::reset_password)
        .service(accounts::find_email)
        .service(accounts::forget_password)
        .service(accounts::auth)
        .service(accounts::refresh)
        .service(accounts::list_accounts)
        .service(accounts::get_account)
        .service(accounts::update_account)
        .service(accounts::delete_account)
}

fn profile_routes() -> actix_web::Scope {
    web::scope("/profiles")
        .service(profiles::upload_image)
        .service(profiles::create_profile)
        .service(profiles::update_profile)
        .service(profiles::refresh)
        .service(profiles::issue_token)
        .service(profiles::find_nickname)
        .service(profiles::get_profile)
        .service(profiles::list_profiles)
        .service(profiles::delete_profile)
}

fn board_routes() -> actix_web::Scope {
    web::scope("/boards")
        .service(boards::create_board)
        .service(boards::update_board)
        .service(boards::get_board)
        .service(boards::list_boards)
        .service(boards::delete_board)
}
