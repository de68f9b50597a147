//! # 프로필 서비스 구현
//!
//! 프로필 토큰은 `{id, role, name}` 페이로드로 발급되며 게시판 API 의 실행자 신원이 됩니다.
//! 프로필 토큰 교체는 액세스 토큰을 strict 모드로 검증합니다.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::core::errors::Fail;
use crate::core::usecase::UsecaseExecutor;
use crate::domain::dto::{ExistsResponse, OutputId, OutputMessage, ProfileImageResponse};
use crate::domain::models::token::{TokenPair, TokenPayload};
use crate::services::auth::SessionService;
use crate::services::storage::ObjectStorage;
use crate::usecases::{
    CreateOrUpdateProfile, DeleteProfile, GetProfile, GetProfileByNickname, ProfileOutput,
    ProfilesOutput, QueryProfile,
};
use crate::utils::codes::profile_image_key;

pub struct ProfileService {
    executor: UsecaseExecutor,
    session: Arc<SessionService>,
    storage: Arc<dyn ObjectStorage>,
}

impl ProfileService {
    pub fn new(executor: UsecaseExecutor, session: Arc<SessionService>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            executor,
            session,
            storage,
        }
    }

    /// `id` 가 있으면 수정, 없으면 생성
    pub async fn create_or_update(&self, input: Value) -> Result<OutputId, Fail> {
        self.executor.run(&CreateOrUpdateProfile, input).await
    }

    pub async fn find_one(&self, input: Value) -> Result<ProfileOutput, Fail> {
        self.executor.run(&GetProfile, input).await
    }

    pub async fn query(&self, input: Value) -> Result<ProfilesOutput, Fail> {
        self.executor.run(&QueryProfile, input).await
    }

    pub async fn delete(&self, input: Value) -> Result<OutputMessage, Fail> {
        self.executor.run(&DeleteProfile, input).await
    }

    /// 계정 소유 프로필의 토큰 발급 (`{id, accountId}`)
    pub async fn generate_token(&self, input: Value) -> Result<TokenPair, Fail> {
        let ProfileOutput { profile } = self.executor.run(&GetProfile, input).await?;
        let payload = TokenPayload::profile(profile.id, profile.role, profile.nickname);
        self.session.issue(&payload).await
    }

    pub async fn replace_token(&self, refresh_token: &str, access_token: &str) -> Result<TokenPair, Fail> {
        self.session.rotate(refresh_token, access_token, true).await
    }

    pub async fn upload_image(&self, body: Vec<u8>, content_type: &str) -> Result<ProfileImageResponse, Fail> {
        let key = profile_image_key();
        let profile_image_uri = self.storage.upload(&key, body, content_type).await?;
        Ok(ProfileImageResponse { profile_image_uri })
    }

    pub async fn has_nickname(&self, nickname: &str) -> Result<ExistsResponse, Fail> {
        match self
            .executor
            .run(&GetProfileByNickname, json!({ "nickname": nickname }))
            .await
        {
            Ok(_) => Ok(ExistsResponse { result: true }),
            Err(fail) if fail.is_not_found() => Ok(ExistsResponse { result: false }),
            Err(fail) => Err(fail),
        }
    }
}
