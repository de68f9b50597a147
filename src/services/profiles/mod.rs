//! 프로필 서비스 모듈

pub mod profile_service;

pub use profile_service::*;
