//! 로그인 & 게시판 백엔드
//!
//! 이메일/소셜 로그인 계정, 계정별 프로필(역할 할당량), 커서 페이지네이션
//! 게시판을 제공하는 Actix-web 서비스입니다. 모든 비즈니스 동작은
//! `validate → connect → authorize → execute` usecase 파이프라인으로 실행되며
//! 실패는 `{message, status}` 값으로 돌아옵니다.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← /api 엔드포인트, JWT 미들웨어
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청 → usecase 입력
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 컨트롤러, 토큰 세션, 메일, 오브젝트 저장소
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Usecases     │ ← 검증/권한/실행 파이프라인
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← Store trait (MongoDB | 메모리)
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use login_board_backend::core::registry::AppServices;
//!
//! let services = AppServices::from_config().await?;
//! let id = services.accounts.register(json!({
//!     "email": "neo@matrix.io",
//!     "password": "matrix123!",
//!     "auth_kind": "EMAIL",
//! })).await?;
//! ```

pub mod caching;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod usecases;
pub mod utils;
