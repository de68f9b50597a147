//! 미들웨어 모듈
//!
//! 요청 처리 파이프라인의 횡단 관심사를 담당합니다.
//!
//! # 제공 미들웨어
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - `Authorization: Bearer {token}` 헤더 추출 및 JWT 검증
//! - 계정 토큰(`id`) / 프로필 토큰(`id`, `role`, `name`) 구분
//! - 검증된 페이로드를 `Executor` 로 request extension 에 저장
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! App::new()
//!     .app_data(web::Data::new(services.tokens.clone()))
//!     .service(
//!         web::resource("/accounts/{id}")
//!             .wrap(AuthMiddleware::account())
//!             .route(web::patch().to(accounts::update_account)),
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
