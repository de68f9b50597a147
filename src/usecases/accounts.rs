//! 계정과 로그인 자격 증명 usecase
//!
//! | usecase | 입력 | 출력 |
//! |---------|------|------|
//! | [`RegisterAccount`] | `email`, `password`, `auth_kind`, `marketing?` | `{id}` |
//! | [`EmailLogin`] | `email`, `password` | `{id}` |
//! | [`SocialLogin`] | `user_id`, `auth_kind`, `marketing?` | `{id}` |
//! | [`GetAuth`] | `email` | 비밀번호를 제거한 `Auth` |
//! | [`GetAccount`] | `id`, `idByToken?` | `{account}` |
//! | [`UpdateAccount`] | `id`, `idByToken?`, `marketing?` | `{id}` |
//! | [`DeleteAccount`] | `id`, `idByToken?` | `{message}` |
//! | [`UpdatePassword`] | `email`, `password` | `{id}` |
//! | [`QueryAccount`] | `email`, `orderKey?`, `orderType?` | `{accounts, count}` |

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::ValidateEmail;

use super::guard::{check_password, Guard};
use super::ensure_owner;
use crate::core::errors::{Fail, FailContext};
use crate::core::usecase::Usecase;
use crate::domain::catalog::{AuthKind, OrderType};
use crate::domain::dto::{OutputId, OutputMessage};
use crate::domain::entities::{Account, Auth, Marketing};
use crate::repositories::{AccountOrderKey, Connection};

fn email_field(guard: &Guard<'_>) -> Result<String, String> {
    let email = guard.string("email")?;
    if !email.validate_email() {
        return Err("`email` is invalid.".to_string());
    }
    Ok(email)
}

fn hash_password(password: &str, cost: u32) -> Result<String, Fail> {
    bcrypt::hash(password, cost).context("Failed to hash password")
}

pub struct RegisterAccountInput {
    pub email: String,
    pub password: String,
    pub marketing: Marketing,
}

/// 이메일 계정 가입
pub struct RegisterAccount {
    bcrypt_cost: u32,
}

impl RegisterAccount {
    pub fn new(bcrypt_cost: u32) -> Self {
        Self { bcrypt_cost }
    }
}

#[async_trait]
impl Usecase for RegisterAccount {
    type Input = RegisterAccountInput;
    type Output = OutputId;

    fn name(&self) -> &'static str {
        "RegisterAccount"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        let guard = Guard::object(input)?;
        let email = email_field(&guard)?;
        let password = guard.string("password")?;
        check_password(&password)?;

        let auth_kind: AuthKind = guard.enumeration("auth_kind")?;
        if auth_kind != AuthKind::Email {
            return Err("`auth_kind` is invalid.".to_string());
        }

        Ok(RegisterAccountInput {
            email,
            password,
            marketing: guard.optional_object("marketing")?.unwrap_or_default(),
        })
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
        if conn.auths().find_by_email(&input.email).await?.is_some() {
            return Err(Fail::invalid_input(format!("'{}' already exists.", input.email)));
        }

        let password = hash_password(&input.password, self.bcrypt_cost)?;
        let account = Account::new(input.marketing);
        let auth = Auth::email(&account.id, &input.email, password);
        conn.accounts().create_with_auth(&account, &auth).await?;

        Ok(OutputId::new(account.id))
    }
}

pub struct EmailLoginInput {
    pub email: String,
    pub password: String,
}

/// 이메일과 비밀번호로 로그인하여 계정 id 를 얻음
pub struct EmailLogin;

#[async_trait]
impl Usecase for EmailLogin {
    type Input = EmailLoginInput;
    type Output = OutputId;

    fn name(&self) -> &'static str {
        "EmailLogin"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        let guard = Guard::object(input)?;
        Ok(EmailLoginInput {
            email: guard.string("email")?,
            password: guard.string("password")?,
        })
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
        let missing = || Fail::not_found(format!("'{}' does not exist", input.email));

        let auth = conn.auths().find_by_email(&input.email).await?.ok_or_else(missing)?;
        conn.accounts().find_active(&auth.account_id).await?.ok_or_else(missing)?;

        let hash = auth.loginfo.password.as_deref().unwrap_or_default();
        let matched = !hash.is_empty()
            && bcrypt::verify(&input.password, hash).context("Failed to verify password")?;
        if !matched {
            return Err(Fail::invalid_input("Wrong password"));
        }

        Ok(OutputId::new(auth.account_id))
    }
}

pub struct SocialLoginInput {
    pub user_id: String,
    pub auth_kind: AuthKind,
    pub marketing: Marketing,
}

/// 소셜 로그인. 처음 보는 외부 사용자면 계정과 자격 증명을 만듭니다.
pub struct SocialLogin;

#[async_trait]
impl Usecase for SocialLogin {
    type Input = SocialLoginInput;
    type Output = OutputId;

    fn name(&self) -> &'static str {
        "SocialLogin"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        let guard = Guard::object(input)?;
        let user_id = guard.string("user_id")?;
        let auth_kind: AuthKind = guard.enumeration("auth_kind")?;
        if !auth_kind.is_social() {
            return Err("`auth_kind` is invalid.".to_string());
        }

        Ok(SocialLoginInput {
            user_id,
            auth_kind,
            marketing: guard.optional_object("marketing")?.unwrap_or_default(),
        })
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
        if let Some(auth) = conn.auths().find_social(input.auth_kind, &input.user_id).await? {
            return Ok(OutputId::new(auth.account_id));
        }

        let account = Account::new(input.marketing);
        let auth = Auth::social(&account.id, input.auth_kind, &input.user_id);
        conn.accounts().create_with_auth(&account, &auth).await?;

        Ok(OutputId::new(account.id))
    }
}

/// 이메일 자격 증명 조회 (비밀번호 제외)
pub struct GetAuth;

#[async_trait]
impl Usecase for GetAuth {
    type Input = String;
    type Output = Auth;

    fn name(&self) -> &'static str {
        "GetAuth"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        Guard::object(input)?.string("email")
    }

    async fn execute(&self, conn: &dyn Connection, email: Self::Input) -> Result<Self::Output, Fail> {
        conn.auths()
            .find_by_email(&email)
            .await?
            .map(Auth::without_password)
            .ok_or_else(|| Fail::not_found(format!("'{}' is not found in Auths.", email)))
    }
}

/// 본인 확인이 필요한 계정 입력 (`id`, `idByToken?`)
pub struct OwnedAccountInput {
    pub id: String,
    pub id_by_token: Option<String>,
    pub marketing: Option<Marketing>,
}

fn owned_account(input: &Value, with_marketing: bool) -> Result<OwnedAccountInput, String> {
    let guard = Guard::object(input)?;
    Ok(OwnedAccountInput {
        id: guard.string("id")?,
        id_by_token: guard.optional_string("idByToken")?,
        marketing: if with_marketing {
            guard.optional_object("marketing")?
        } else {
            None
        },
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountOutput {
    pub account: Account,
}

pub struct GetAccount;

#[async_trait]
impl Usecase for GetAccount {
    type Input = OwnedAccountInput;
    type Output = AccountOutput;

    fn name(&self) -> &'static str {
        "GetAccount"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        owned_account(input, false)
    }

    async fn authorize(&self, _conn: &dyn Connection, input: &Self::Input) -> Result<(), Fail> {
        ensure_owner(input.id_by_token.as_deref(), &input.id)
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
        let account = conn
            .accounts()
            .find_active(&input.id)
            .await?
            .ok_or_else(|| Fail::not_found(format!("'{}' is not found in Accounts.", input.id)))?;
        Ok(AccountOutput { account })
    }
}

/// 마케팅 수신 정보 수정. `marketing` 이 없으면 기존 값을 유지합니다.
pub struct UpdateAccount;

#[async_trait]
impl Usecase for UpdateAccount {
    type Input = OwnedAccountInput;
    type Output = OutputId;

    fn name(&self) -> &'static str {
        "UpdateAccount"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        owned_account(input, true)
    }

    async fn authorize(&self, _conn: &dyn Connection, input: &Self::Input) -> Result<(), Fail> {
        ensure_owner(input.id_by_token.as_deref(), &input.id)
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
        let mut account = conn
            .accounts()
            .find_active(&input.id)
            .await?
            .ok_or_else(|| Fail::not_found(format!("'{}' does not exist", input.id)))?;

        if let Some(marketing) = input.marketing {
            account.marketing = marketing;
        }
        account.touch();
        conn.accounts().save(&account).await?;

        Ok(OutputId::new(account.id))
    }
}

/// 계정과 소속 프로필을 비활성화
pub struct DeleteAccount;

#[async_trait]
impl Usecase for DeleteAccount {
    type Input = OwnedAccountInput;
    type Output = OutputMessage;

    fn name(&self) -> &'static str {
        "DeleteAccount"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        owned_account(input, false)
    }

    async fn authorize(&self, _conn: &dyn Connection, input: &Self::Input) -> Result<(), Fail> {
        ensure_owner(input.id_by_token.as_deref(), &input.id)
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
        let mut account = conn
            .accounts()
            .find_active(&input.id)
            .await?
            .ok_or_else(|| Fail::not_found(format!("'{}' does not exist", input.id)))?;

        account.is_active = false;
        account.touch();
        conn.accounts().save(&account).await?;
        let profiles = conn.profiles().deactivate_by_account(&account.id).await?;
        log::info!("계정 비활성화: {} (프로필 {}개)", account.id, profiles);

        Ok(OutputMessage::new(format!("Deleted Raw On {}", input.id)))
    }
}

pub struct UpdatePasswordInput {
    pub email: String,
    pub password: String,
}

/// 이메일 자격 증명의 비밀번호 교체
pub struct UpdatePassword {
    bcrypt_cost: u32,
}

impl UpdatePassword {
    pub fn new(bcrypt_cost: u32) -> Self {
        Self { bcrypt_cost }
    }
}

#[async_trait]
impl Usecase for UpdatePassword {
    type Input = UpdatePasswordInput;
    type Output = OutputId;

    fn name(&self) -> &'static str {
        "UpdatePassword"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        let guard = Guard::object(input)?;
        let email = guard.string("email")?;
        let password = guard.string("password")?;
        check_password(&password)?;
        Ok(UpdatePasswordInput { email, password })
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
        let missing = || Fail::not_found(format!("'{}' does not exist", input.email));

        let mut auth = conn.auths().find_by_email(&input.email).await?.ok_or_else(missing)?;
        conn.accounts().find_active(&auth.account_id).await?.ok_or_else(missing)?;

        auth.loginfo.password = Some(hash_password(&input.password, self.bcrypt_cost)?);
        conn.auths().save(&auth).await?;

        Ok(OutputId::new(auth.account_id))
    }
}

pub struct QueryAccountInput {
    pub email: String,
    pub order_key: AccountOrderKey,
    pub order_type: OrderType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsOutput {
    pub accounts: Vec<Account>,
    pub count: u64,
}

/// 이메일 자격 증명을 가진 활성 계정 목록
pub struct QueryAccount;

#[async_trait]
impl Usecase for QueryAccount {
    type Input = QueryAccountInput;
    type Output = AccountsOutput;

    fn name(&self) -> &'static str {
        "QueryAccount"
    }

    fn validate(&self, input: &Value) -> Result<Self::Input, String> {
        let guard = Guard::object(input)?;
        let order_key = match guard
            .one_of(
                "orderKey",
                &["created_at", "updated_at"],
                "`orderKey` should be `created_at` or `updated_at`.",
            )?
            .as_deref()
        {
            Some("updated_at") => AccountOrderKey::UpdatedAt,
            _ => AccountOrderKey::CreatedAt,
        };
        let order_type = guard.order_type()?;

        Ok(QueryAccountInput {
            email: guard.string("email")?,
            order_key,
            order_type,
        })
    }

    async fn execute(&self, conn: &dyn Connection, input: Self::Input) -> Result<Self::Output, Fail> {
        let ids: Vec<String> = conn
            .auths()
            .find_by_email(&input.email)
            .await?
            .map(|auth| auth.account_id)
            .into_iter()
            .collect();

        let accounts = conn
            .accounts()
            .find_active_by_ids(&ids, input.order_key, input.order_type)
            .await?;
        let count = accounts.len() as u64;

        Ok(AccountsOutput { accounts, count })
    }
}
