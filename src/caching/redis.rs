//! # Redis 키-값 클라이언트
//!
//! 멀티플렉싱 연결을 사용하여 단일 TCP 연결에서 동시 요청을 처리합니다.
//! 서버가 내려가 있어도 클라이언트 생성은 성공하며, 실패는 명령 시점에
//! [`CacheError`] 로 반환됩니다.

use async_trait::async_trait;
use log::info;
use redis::{AsyncCommands, Client, RedisError};

use super::{CacheError, KeyValueStore};
use crate::config::RedisConfig;

fn connection_error(error: RedisError) -> CacheError {
    CacheError::Connection(error.to_string())
}

fn command_error(error: RedisError) -> CacheError {
    CacheError::Command(error.to_string())
}

#[derive(Clone)]
pub struct RedisClient {
    client: Client,
}

impl RedisClient {
    /// `REDIS_URL` 로 클라이언트 생성
    pub fn new() -> Result<Self, CacheError> {
        Self::open(&RedisConfig::url())
    }

    pub fn open(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url).map_err(connection_error)?;
        Ok(Self { client })
    }

    /// PING 으로 서버 가용성 확인
    pub async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(connection_error)?;
        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(command_error)?;

        info!("✅ Redis 연결 성공");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for RedisClient {
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(connection_error)?;
        conn.set::<_, _, ()>(key, value).await.map_err(command_error)
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(connection_error)?;
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
            .map_err(command_error)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(connection_error)?;
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(command_error)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(connection_error)?;
        conn.del::<_, ()>(key).await.map_err(command_error)
    }
}
