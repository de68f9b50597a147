//! # Usecase 파이프라인
//!
//! 모든 도메인 동작은 같은 순서로 실행됩니다.
//!
//! ```text
//! Validating ─▶ Connecting ─▶ Authorizing ─▶ Executing ─▶ Done
//!     │             │              │              │
//!     └─────────────┴──────────────┴──────────────┴──▶ Failed(Fail)
//! ```
//!
//! | 단계 | 실패 시 |
//! |------|---------|
//! | validate | `"Invalid Usecase Input, {첫 위반 규칙}"`, 400 |
//! | connect | `"Failed to connect to database."`, 503 (원인은 로그) |
//! | authorize | `"Failed to Authorize, {사유}"`, 사유의 status |
//! | execute | usecase 가 반환한 `Fail` 그대로 |
//!
//! validate 는 순수 함수이고 authorize 는 읽기만 합니다. 쓰기는 execute 에서만 일어납니다.
//!
//! ```rust,ignore
//! let executor = UsecaseExecutor::new(store.clone());
//! let output = executor.run(&GetBoard, json!({ "id": board_id })).await?;
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, warn};
use serde_json::Value;

use super::errors::Fail;
use crate::repositories::{Connection, Store};

/// 파이프라인 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Connecting,
    Authorizing,
    Executing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Connecting => "connecting",
            Stage::Authorizing => "authorizing",
            Stage::Executing => "executing",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// 파이프라인 로거
///
/// 단계 진입과 실패를 기록합니다. 기본 구현은 [`LogPipelineLogger`] 입니다.
pub trait PipelineLogger: Send + Sync {
    fn enter(&self, usecase: &str, stage: Stage);

    fn failed(&self, usecase: &str, stage: Stage, detail: &str);
}

/// `log` 파사드로 기록하는 로거
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPipelineLogger;

impl PipelineLogger for LogPipelineLogger {
    fn enter(&self, usecase: &str, stage: Stage) {
        debug!("[{}] {}", usecase, stage);
    }

    fn failed(&self, usecase: &str, stage: Stage, detail: &str) {
        match stage {
            Stage::Connecting => error!("[{}] {} failed: {}", usecase, stage, detail),
            _ => warn!("[{}] {} failed: {}", usecase, stage, detail),
        }
    }
}

/// 하나의 도메인 동작
///
/// 입력은 타입이 정해지지 않은 JSON 으로 들어오며 [`Usecase::validate`] 가
/// 필수 필드와 타입을 확인한 뒤 `Input` 으로 좁힙니다.
#[async_trait]
pub trait Usecase: Send + Sync {
    type Input: Send + Sync;
    type Output: Send;

    fn name(&self) -> &'static str;

    /// 실패 시 첫 번째로 위반한 규칙의 메시지를 반환
    fn validate(&self, input: &Value) -> Result<Self::Input, String>;

    /// 거부 사유를 `Fail` 로 반환 (status 는 보통 403)
    async fn authorize(&self, _conn: &dyn Connection, _input: &Self::Input) -> Result<(), Fail> {
        Ok(())
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail>;
}

/// 파이프라인 실행기
#[derive(Clone)]
pub struct UsecaseExecutor {
    store: Arc<dyn Store>,
    logger: Arc<dyn PipelineLogger>,
}

impl UsecaseExecutor {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_logger(store, Arc::new(LogPipelineLogger))
    }

    pub fn with_logger(store: Arc<dyn Store>, logger: Arc<dyn PipelineLogger>) -> Self {
        Self { store, logger }
    }

    pub async fn run<U: Usecase>(&self, usecase: &U, input: Value) -> Result<U::Output, Fail> {
        let name = usecase.name();

        self.logger.enter(name, Stage::Validating);
        let input = usecase.validate(&input).map_err(|message| {
            self.logger.failed(name, Stage::Validating, &message);
            Fail::invalid_input(format!("Invalid Usecase Input, {}", message))
        })?;

        self.logger.enter(name, Stage::Connecting);
        let conn = self.store.connect().await.map_err(|e| {
            self.logger.failed(name, Stage::Connecting, &e.to_string());
            Fail::unavailable("Failed to connect to database.")
        })?;

        self.logger.enter(name, Stage::Authorizing);
        usecase.authorize(conn.as_ref(), &input).await.map_err(|denied| {
            self.logger.failed(name, Stage::Authorizing, &denied.message);
            Fail::new(format!("Failed to Authorize, {}", denied.message), denied.status)
        })?;

        self.logger.enter(name, Stage::Executing);
        let output = usecase.execute(conn.as_ref(), input).await.inspect_err(|fail| {
            self.logger.failed(name, Stage::Executing, &fail.message);
        })?;

        self.logger.enter(name, Stage::Done);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::repositories::MemoryStore;

    #[derive(Default)]
    struct RecordingLogger {
        entries: Mutex<Vec<(Stage, Option<String>)>>,
    }

    impl RecordingLogger {
        fn stages(&self) -> Vec<Stage> {
            self.entries.lock().unwrap().iter().map(|(stage, _)| *stage).collect()
        }

        fn failures(&self) -> Vec<String> {
            self.entries
                .lock()
                .unwrap()
                .iter()
                .filter_map(|(_, detail)| detail.clone())
                .collect()
        }
    }

    impl PipelineLogger for RecordingLogger {
        fn enter(&self, _usecase: &str, stage: Stage) {
            self.entries.lock().unwrap().push((stage, None));
        }

        fn failed(&self, _usecase: &str, stage: Stage, detail: &str) {
            self.entries.lock().unwrap().push((stage, Some(detail.to_string())));
        }
    }

    /// `name` 을 요구하고 `deny` 가 true 면 401 로 거부하는 테스트용 usecase
    struct Echo;

    #[async_trait]
    impl Usecase for Echo {
        type Input = (String, bool);
        type Output = String;

        fn name(&self) -> &'static str {
            "Echo"
        }

        fn validate(&self, input: &Value) -> Result<Self::Input, String> {
            let name = input
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| "`name` is required.".to_string())?;
            let deny = input.get("deny").and_then(Value::as_bool).unwrap_or(false);
            Ok((name.to_string(), deny))
        }

        async fn authorize(&self, _conn: &dyn Connection, input: &Self::Input) -> Result<(), Fail> {
            if input.1 {
                return Err(Fail::unauthorized("not you"));
            }
            Ok(())
        }

        async fn execute(&self, _conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
            Ok(format!("hello {}", input.0))
        }
    }

    fn executor(store: &MemoryStore) -> (UsecaseExecutor, Arc<RecordingLogger>) {
        let logger = Arc::new(RecordingLogger::default());
        let executor = UsecaseExecutor::with_logger(Arc::new(store.clone()), logger.clone());
        (executor, logger)
    }

    #[tokio::test]
    async fn test_pipeline_runs_every_stage_in_order() {
        let store = MemoryStore::new();
        let (executor, logger) = executor(&store);

        let output = executor.run(&Echo, json!({ "name": "neo" })).await.unwrap();

        assert_eq!(output, "hello neo");
        assert_eq!(
            logger.stages(),
            vec![
                Stage::Validating,
                Stage::Connecting,
                Stage::Authorizing,
                Stage::Executing,
                Stage::Done
            ]
        );
    }

    #[tokio::test]
    async fn test_validation_failure_is_bad_request() {
        let store = MemoryStore::new();
        let (executor, _) = executor(&store);

        let fail = executor.run(&Echo, json!({})).await.unwrap_err();

        assert_eq!(fail.message, "Invalid Usecase Input, `name` is required.");
        assert_eq!(fail.status, 400);
    }

    #[tokio::test]
    async fn test_connect_failure_hides_diagnostic() {
        let store = MemoryStore::new();
        store.set_available(false);
        let (executor, logger) = executor(&store);

        let fail = executor.run(&Echo, json!({ "name": "neo" })).await.unwrap_err();

        assert_eq!(fail, Fail::unavailable("Failed to connect to database."));
        assert_eq!(logger.failures(), vec!["memory store is offline".to_string()]);
    }

    #[tokio::test]
    async fn test_authorize_failure_keeps_status() {
        let store = MemoryStore::new();
        let (executor, logger) = executor(&store);

        let fail = executor
            .run(&Echo, json!({ "name": "neo", "deny": true }))
            .await
            .unwrap_err();

        assert_eq!(fail.message, "Failed to Authorize, not you");
        assert_eq!(fail.status, 401);
        assert!(!logger.stages().contains(&Stage::Executing));
    }
}
