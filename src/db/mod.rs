//! MongoDB 연결 관리
//!
//! [`DatabaseConfig`] 의 URI 로 클라이언트를 만들고 `ping` 으로 연결을 확인합니다.
//! 연결 실패는 [`StoreError::Unavailable`] 로 반환되어 usecase 파이프라인에서
//! `"Failed to connect to database."` 로 변환됩니다.

use std::time::Duration;

use log::info;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;

use crate::config::DatabaseConfig;
use crate::repositories::StoreError;

#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 환경 설정으로 연결
    pub async fn connect() -> Result<Self, StoreError> {
        let database_name = DatabaseConfig::name();
        let mut client_options = ClientOptions::parse(DatabaseConfig::uri())
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        client_options.app_name = Some(DatabaseConfig::app_name());
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        client
            .database(&database_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name,
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
