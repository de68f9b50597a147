//! 키-값 저장소 계층
//!
//! 리프레시 토큰(`refresh_token:{id}`)과 비밀번호 재설정 코드(`reset_code:{email}`)를
//! 보관합니다. 같은 키에 대한 쓰기는 마지막 쓰기가 이깁니다.
//!
//! ```rust,ignore
//! use crate::caching::{KeyValueStore, RedisClient};
//!
//! let kv = RedisClient::new()?;
//! kv.set("refresh_token:abc", token).await?;
//! kv.set_with_expiry("reset_code:neo@matrix.io", code, 300).await?;
//! ```
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! KV_BACKEND=memory                 # 로컬 실행 시 인메모리 사용
//! ```

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryKeyValueStore;
pub use redis::RedisClient;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Key-value store connection failed: {0}")]
    Connection(String),

    #[error("Key-value store command failed: {0}")]
    Command(String),
}

/// 문자열 키-값 저장소
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError>;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

pub fn refresh_token_key(id: &str) -> String {
    format!("refresh_token:{}", id)
}

pub fn reset_code_key(email: &str) -> String {
    format!("reset_code:{}", email)
}
