//! # Domain Module
//!
//! 카탈로그 열거형, 저장 엔티티, DTO, 토큰/실행자 모델을 모읍니다.

pub mod catalog;
pub mod dto;
pub mod entities;
pub mod models;

pub use catalog::*;
pub use dto::*;
pub use entities::*;
pub use models::*;
