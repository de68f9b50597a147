//! 오브젝트 저장소 (프로필 이미지)
//!
//! [`HttpObjectStorage`] 는 `PUT {endpoint}/{bucket}/{key}` 로 업로드하고
//! 공개 주소 `{public_url}/{key}` 를 돌려줍니다. `STORAGE_TOKEN` 이 있으면
//! Bearer 인증 헤더를 붙입니다. `STORAGE_ENDPOINT` 가 없으면
//! [`MemoryObjectStorage`] 가 대신 쓰입니다.

use std::collections::HashMap;

use async_trait::async_trait;
use log::{info, warn};
use tokio::sync::RwLock;

use crate::config::StorageConfig;
use crate::core::errors::Fail;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// 업로드 후 공개 URI 반환
    async fn upload(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String, Fail>;
}

fn upload_fail() -> Fail {
    Fail::new("Failed to upload object.", 500)
}

pub struct HttpObjectStorage {
    http: reqwest::Client,
    endpoint: String,
    bucket: String,
    public_url: String,
    token: Option<String>,
}

impl HttpObjectStorage {
    pub fn new(endpoint: &str, bucket: &str, public_url: Option<String>, token: Option<String>) -> Self {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        let public_url = public_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("{}/{}", endpoint, bucket));

        Self {
            http: reqwest::Client::new(),
            endpoint,
            bucket: bucket.to_string(),
            public_url,
            token,
        }
    }

    /// `STORAGE_ENDPOINT` 가 없으면 `None`
    pub fn from_config() -> Option<Self> {
        StorageConfig::endpoint().map(|endpoint| {
            Self::new(
                &endpoint,
                &StorageConfig::bucket(),
                StorageConfig::public_url(),
                StorageConfig::token(),
            )
        })
    }

    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }

    pub fn public_uri(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn upload(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String, Fail> {
        let mut request = self
            .http
            .put(self.object_url(key))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            warn!("오브젝트 업로드 요청 실패 ({}): {}", key, e);
            upload_fail()
        })?;

        if !response.status().is_success() {
            warn!("오브젝트 업로드 거부 ({}): {}", key, response.status());
            return Err(upload_fail());
        }

        info!("오브젝트 업로드 완료: {}", key);
        Ok(self.public_uri(key))
    }
}

/// 프로세스 메모리에 보관하는 저장소
pub struct MemoryObjectStorage {
    base_url: String,
    objects: RwLock<HashMap<String, (Vec<u8>, String)>>,
}

impl MemoryObjectStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects.read().await.get(key).cloned()
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn upload(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String, Fail> {
        if body.is_empty() {
            return Err(upload_fail());
        }
        self.objects
            .write()
            .await
            .insert(key.to_string(), (body, content_type.to_string()));
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_storage_urls() {
        let storage = HttpObjectStorage::new("https://objects.example.com/", "bucket", None, None);
        assert_eq!(
            storage.object_url("profile-images/a.png"),
            "https://objects.example.com/bucket/profile-images/a.png"
        );
        assert_eq!(
            storage.public_uri("profile-images/a.png"),
            "https://objects.example.com/bucket/profile-images/a.png"
        );

        let cdn = HttpObjectStorage::new(
            "https://objects.example.com",
            "bucket",
            Some("https://cdn.example.com/".into()),
            Some("token".into()),
        );
        assert_eq!(cdn.public_uri("k"), "https://cdn.example.com/k");
    }

    #[tokio::test]
    async fn test_memory_storage_keeps_object() {
        let storage = MemoryObjectStorage::new("memory://objects");
        let uri = storage
            .upload("profile-images/profile_1", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert_eq!(uri, "memory://objects/profile-images/profile_1");
        assert_eq!(
            storage.get("profile-images/profile_1").await,
            Some((vec![1, 2, 3], "image/png".to_string()))
        );
    }

    #[tokio::test]
    async fn test_empty_body_is_rejected() {
        let storage = MemoryObjectStorage::new("memory://objects");
        let fail = storage.upload("k", Vec::new(), "image/png").await.unwrap_err();
        assert_eq!(fail.status, 500);
    }
}
