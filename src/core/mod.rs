//! # Core Framework Module
//!
//! ## 모듈 구성
//!
//! ### [`errors`] - 통합 실패 값
//! - **Fail**: `{message, status}` 형태의 실패 값, `actix_web::ResponseError` 구현
//! - **FailContext**: 외부 라이브러리 에러를 503 `Fail` 로 변환
//!
//! ### [`usecase`] - usecase 파이프라인
//! - **Usecase**: validate → authorize → execute 단계를 정의하는 trait
//! - **UsecaseExecutor**: 저장소 연결을 얻어 단계를 순서대로 실행하고 첫 실패에서 멈춤
//! - **PipelineLogger**: 단계 진입/실패 기록 (주입 가능)
//!
//! ### [`registry`] - 서비스 조립
//! - **Infrastructure**: 저장소, 키-값 저장소, 메일, 오브젝트 저장소 구현 선택
//! - **AppServices**: 핸들러에 전달되는 서비스 컨테이너
//!
//! ```rust,ignore
//! use crate::core::registry::AppServices;
//!
//! let services = AppServices::from_config().await?;
//! HttpServer::new(move || App::new().app_data(web::Data::new(services.clone())))
//! ```

pub mod errors;
pub mod registry;
pub mod usecase;

pub use errors::*;
pub use registry::*;
pub use usecase::*;
