//! 공통 유틸리티 함수 모듈
//!
//! - [`codes`] - 인증 코드, 재설정 코드, 오브젝트 키 생성
//! - [`display_terminal`] - 시작 과정 터미널 출력
//!
//! ```rust,ignore
//! use crate::utils::codes::register_code;
//! use crate::utils::display_terminal::print_boxed_title;
//!
//! let code = register_code(); // "482913"
//! print_boxed_title("LOGIN & BOARD BACKEND");
//! ```

pub mod codes;
pub mod display_terminal;
