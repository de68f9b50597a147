//! # Domain Models Module
//!
//! 저장되지 않는 도메인 값(토큰 페이로드, 요청 실행자)을 정의합니다.

pub mod auth;
pub mod token;

pub use auth::*;
pub use token::*;
