//! 프로필 usecase
//!
//! 프로필 생성은 계정당 역할별 개수 제한(MEMBER 2, STAFF 1, MANAGER 1)을 따르며
//! 활성 프로필만 셉니다. nickname 은 비활성 프로필을 포함해 전체에서 유일합니다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::guard::Guard;
use super::{ensure_owner, OWNER_MISMATCH};
use crate::core::errors::Fail;
use crate::core::usecase::Usecase;
use crate::domain::catalog::{OrderType, Role};
use crate::domain::dto::{OutputId, OutputMessage};
use crate::domain::entities::{new_id, now, PreparedExam, Profile};
use crate::repositories::Connection;

pub struct ProfileInput {
    pub id: Option<String>,
    pub role: Role,
    pub nickname: String,
    pub profile_image_uri: Option<String>,
    pub determination: Option<String>,
    pub prepared_exam: Option<PreparedExam>,
    pub account_id: Option<String>,
}

/// `id` 가 있으면 수정, 없으면 생성
pub struct CreateOrUpdateProfile;

impl CreateOrUpdateProfile {
    async fn ensure_nickname_free(conn: &dyn Connection, nickname: &str) -> Result<(), Fail> {
        if conn.profiles().find_by_nickname(nickname).await?.is_some() {
            return Err(Fail::invalid_input(format!("Nickname '{}' already exists.", nickname)));
        }
        Ok(())
    }
}

#[async_trait]
impl Usecase for CreateOrUpdateProfile {
    type Input = ProfileInput;
    type Output = OutputId;

    fn name(&self) -> &'static str {
        "CreateOrUpdateProfile"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        let guard = Guard::object(input)?;
        Ok(ProfileInput {
            role: guard.enumeration("role")?,
            nickname: guard.string("nickname")?,
            account_id: guard.optional_string("accountId")?,
            id: guard.optional_string("id")?,
            profile_image_uri: guard.optional_string("profile_image_uri")?,
            determination: guard.optional_string("determination")?,
            prepared_exam: guard.optional_object("prepared_exam")?,
        })
    }

    async fn authorize(&self, conn: &dyn Connection, input: &Self::Input) -> Result<(), Fail> {
        let account_id = input.account_id.as_deref().unwrap_or_default();
        if conn.accounts().find_active(account_id).await?.is_none() {
            return Err(Fail::not_found(format!("'{}' is not found in Accounts.", account_id)));
        }

        let existing = match &input.id {
            Some(id) => Some(
                conn.profiles()
                    .find_active(id)
                    .await?
                    .ok_or_else(|| Fail::forbidden(format!("'{}' dose not exist for update.", id)))?,
            ),
            None => None,
        };

        match existing {
            None => {
                Self::ensure_nickname_free(conn, &input.nickname).await?;

                let quota = input.role.quota();
                let taken = conn
                    .profiles()
                    .find_active_by_account(account_id)
                    .await?
                    .iter()
                    .filter(|profile| profile.role == input.role)
                    .count();
                if taken >= quota {
                    return Err(Fail::invalid_input(format!(
                        "Cannot create role of '{}' in profile more than {}.",
                        input.role, quota
                    )));
                }
                Ok(())
            }
            Some(profile) => {
                if profile.account_id != account_id {
                    return Err(Fail::forbidden(OWNER_MISMATCH));
                }
                if profile.role != input.role {
                    return Err(Fail::invalid_input("Cannot change Role of a profile."));
                }
                if profile.nickname != input.nickname {
                    Self::ensure_nickname_free(conn, &input.nickname).await?;
                }
                Ok(())
            }
        }
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
        if let Some(id) = &input.id {
            let mut profile = conn
                .profiles()
                .find_active(id)
                .await?
                .ok_or_else(|| Fail::forbidden(format!("'{}' dose not exist for update.", id)))?;

            profile.nickname = input.nickname;
            profile.profile_image_uri = input.profile_image_uri;
            profile.determination = input.determination;
            profile.prepared_exam = input.prepared_exam;
            profile.updated_at = now();
            conn.profiles().save(&profile).await?;

            return Ok(OutputId::new(profile.id));
        }

        let created_at = now();
        let profile = Profile {
            id: new_id(),
            is_active: true,
            role: input.role,
            nickname: input.nickname,
            profile_image_uri: input.profile_image_uri,
            determination: input.determination,
            prepared_exam: input.prepared_exam,
            account_id: input.account_id.unwrap_or_default(),
            created_at,
            updated_at: created_at,
        };
        conn.profiles().create(&profile).await?;

        Ok(OutputId::new(profile.id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileOutput {
    pub profile: Profile,
}

pub struct ProfileLookup {
    pub id: String,
    pub account_id: Option<String>,
}

/// 활성 프로필 조회. `accountId` 가 주어지면 소유자여야 합니다.
pub struct GetProfile;

#[async_trait]
impl Usecase for GetProfile {
    type Input = ProfileLookup;
    type Output = ProfileOutput;

    fn name(&self) -> &'static str {
        "GetProfile"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        let guard = Guard::object(input)?;
        Ok(ProfileLookup {
            id: guard.string("id")?,
            account_id: guard.optional_string("accountId")?,
        })
    }

    async fn authorize(&self, conn: &dyn Connection, input: &Self::Input) -> Result<(), Fail> {
        match conn.profiles().find_active(&input.id).await? {
            Some(profile) => ensure_owner(input.account_id.as_deref(), &profile.account_id),
            None => Ok(()),
        }
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
        let profile = conn
            .profiles()
            .find_active(&input.id)
            .await?
            .ok_or_else(|| Fail::not_found(format!("'{}' is not found in Profiles.", input.id)))?;
        Ok(ProfileOutput { profile })
    }
}

pub struct GetProfileByNickname;

#[async_trait]
impl Usecase for GetProfileByNickname {
    type Input = String;
    type Output = ProfileOutput;

    fn name(&self) -> &'static str {
        "GetProfileByNickname"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        Guard::object(input)?.string("nickname")
    }

    async fn execute(&self, conn: &dyn Connection, nickname: Self::Input) -> Result<Self::Output, Fail> {
        conn.profiles()
            .find_by_nickname(&nickname)
            .await?
            .filter(|profile| profile.is_active)
            .map(|profile| ProfileOutput { profile })
            .ok_or_else(|| Fail::not_found(format!("'{}' is not found in Profiles.", nickname)))
    }
}

/// 프로필 비활성화
pub struct DeleteProfile;

#[async_trait]
impl Usecase for DeleteProfile {
    type Input = ProfileLookup;
    type Output = OutputMessage;

    fn name(&self) -> &'static str {
        "DeleteProfile"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        let guard = Guard::object(input)?;
        Ok(ProfileLookup {
            id: guard.string("id")?,
            account_id: guard.optional_string("accountId")?,
        })
    }

    async fn authorize(&self, conn: &dyn Connection, input: &Self::Input) -> Result<(), Fail> {
        match conn.profiles().find_active(&input.id).await? {
            Some(profile) if input.account_id.as_deref() != Some(profile.account_id.as_str()) => {
                Err(Fail::forbidden(OWNER_MISMATCH))
            }
            _ => Ok(()),
        }
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
        let mut profile = conn
            .profiles()
            .find_active(&input.id)
            .await?
            .ok_or_else(|| Fail::not_found(format!("'{}' does not exist", input.id)))?;

        profile.is_active = false;
        profile.updated_at = now();
        conn.profiles().save(&profile).await?;

        Ok(OutputMessage::new(format!("Deleted Raw On {}", input.id)))
    }
}

pub struct QueryProfileInput {
    pub account_id: String,
    pub account_id_by_token: Option<String>,
    pub order_type: OrderType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesOutput {
    pub profiles: Vec<Profile>,
    pub count: u64,
}

/// 계정의 활성 프로필 목록 (역할 순 정렬, 기본 DESC)
pub struct QueryProfile;

#[async_trait]
impl Usecase for QueryProfile {
    type Input = QueryProfileInput;
    type Output = ProfilesOutput;

    fn name(&self) -> &'static str {
        "QueryProfile"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        let guard = Guard::object(input)?;
        let account_id = guard.string("accountId")?;
        let account_id_by_token = guard.optional_string("accountIdByToken")?;
        guard.one_of("orderKey", &["role"], "`orderKey` should be `role`.")?;

        Ok(QueryProfileInput {
            account_id,
            account_id_by_token,
            order_type: guard.order_type()?,
        })
    }

    async fn authorize(&self, _conn: &dyn Connection, input: &Self::Input) -> Result<(), Fail> {
        ensure_owner(input.account_id_by_token.as_deref(), &input.account_id)
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
        let mut profiles = conn.profiles().find_active_by_account(&input.account_id).await?;
        profiles.sort_by(|a, b| a.role.cmp(&b.role).then(a.created_at.cmp(&b.created_at)));
        if input.order_type == OrderType::Desc {
            profiles.reverse();
        }

        let count = profiles.len() as u64;
        Ok(ProfilesOutput { profiles, count })
    }
}
