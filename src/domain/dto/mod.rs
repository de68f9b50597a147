//! # Data Transfer Objects (DTO) Module
//!
//! HTTP 계층에서만 쓰이는 요청 쿼리/본문과 응답 형태입니다.
//! usecase 입력은 검증 게이트가 `serde_json::Value` 에서 직접 좁히므로 여기에 없습니다.

pub mod accounts;
pub mod boards;
pub mod common;
pub mod profiles;

pub use accounts::*;
pub use boards::*;
pub use common::*;
pub use profiles::*;
