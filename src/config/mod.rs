//! # Configuration Module
//!
//! 환경 변수 기반 설정값을 중앙에서 관리합니다. 모든 설정은 unit struct 의
//! 정적 함수로 노출되며, 값이 없거나 잘못된 경우 기본값을 사용합니다.
//!
//! - [`data_config`] - 서버, 저장소, 키-값 저장소, 메일, 스토리지, Rate Limit 설정
//! - [`auth_config`] - JWT, OAuth 설정
//!
//! `PROFILE=dev|prod` 에 따라 `.env.dev` / `.env.prod` 파일이 먼저 로드됩니다.
//!
//! ```rust,ignore
//! use crate::config::{ServerConfig, JwtConfig};
//!
//! let addr = (ServerConfig::host(), ServerConfig::port());
//! let access_ttl = JwtConfig::access_minutes();
//! ```

pub mod auth_config;
pub mod data_config;

pub use auth_config::*;
pub use data_config::*;
