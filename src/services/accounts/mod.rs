//! 계정 서비스 모듈
//!
//! 가입, 로그인(이메일/소셜), 계정 조회/수정/삭제, 인증 메일,
//! 비밀번호 재설정과 계정 토큰 교체를 묶습니다.

pub mod account_service;

pub use account_service::*;
