//! # 계정 서비스 구현
//!
//! HTTP 핸들러와 usecase 사이의 컨트롤러입니다. 각 메서드는 usecase 하나를
//! [`UsecaseExecutor`] 로 실행하고, 필요하면 세션 토큰 발급이나 메일 발송을 덧붙입니다.
//!
//! ```text
//! login ─► EmailLogin | SocialLogin ─► {id} ─► SessionService::issue ─► {accessToken, refreshToken}
//! password_auth_code ─► GetAuth ─► reset code 저장(300s) ─► 메일
//! update_password ─► reset code 확인 ─► UpdatePassword ─► reset code 삭제
//! ```

use std::sync::Arc;

use log::info;
use serde_json::{json, Value};

use crate::core::errors::Fail;
use crate::core::usecase::UsecaseExecutor;
use crate::domain::dto::{AuthCodeResponse, ExistsResponse, OutputId, OutputMessage};
use crate::domain::models::token::{TokenPair, TokenPayload};
use crate::services::auth::{SessionService, SocialIdentity};
use crate::services::mail::{send_auth_code, Mailer};
use crate::usecases::{
    AccountOutput, AccountsOutput, DeleteAccount, EmailLogin, GetAccount, GetAuth, QueryAccount,
    RegisterAccount, SocialLogin, UpdateAccount, UpdatePassword,
};

/// 로그인 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMethod {
    Email,
    Social,
}

pub struct AccountService {
    executor: UsecaseExecutor,
    session: Arc<SessionService>,
    mailer: Arc<dyn Mailer>,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(
        executor: UsecaseExecutor,
        session: Arc<SessionService>,
        mailer: Arc<dyn Mailer>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            executor,
            session,
            mailer,
            bcrypt_cost,
        }
    }

    pub async fn register(&self, input: Value) -> Result<OutputId, Fail> {
        let output = self
            .executor
            .run(&RegisterAccount::new(self.bcrypt_cost), input)
            .await?;
        info!("계정 생성: {}", output.id);
        Ok(output)
    }

    pub async fn login(&self, input: Value, method: LoginMethod) -> Result<TokenPair, Fail> {
        let output = match method {
            LoginMethod::Email => self.executor.run(&EmailLogin, input).await?,
            LoginMethod::Social => self.executor.run(&SocialLogin, input).await?,
        };

        self.session.issue(&TokenPayload::account(output.id)).await
    }

    /// OAuth 콜백으로 확인된 신원으로 로그인 (없으면 가입)
    pub async fn social_login(&self, identity: &SocialIdentity) -> Result<TokenPair, Fail> {
        self.login(identity.login_input(), LoginMethod::Social).await
    }

    pub async fn update(&self, input: Value) -> Result<OutputId, Fail> {
        self.executor.run(&UpdateAccount, input).await
    }

    pub async fn find_one(&self, input: Value) -> Result<AccountOutput, Fail> {
        self.executor.run(&GetAccount, input).await
    }

    pub async fn query(&self, input: Value) -> Result<AccountsOutput, Fail> {
        self.executor.run(&QueryAccount, input).await
    }

    pub async fn delete(&self, input: Value) -> Result<OutputMessage, Fail> {
        self.executor.run(&DeleteAccount, input).await
    }

    /// 이메일 자격 증명 존재 여부 (404 는 `false`)
    pub async fn has_email(&self, email: &str) -> Result<ExistsResponse, Fail> {
        match self.executor.run(&GetAuth, json!({ "email": email })).await {
            Ok(_) => Ok(ExistsResponse { result: true }),
            Err(fail) if fail.is_not_found() => Ok(ExistsResponse { result: false }),
            Err(fail) => Err(fail),
        }
    }

    /// 6자리 인증 코드를 메일로 보내고 응답에도 담음
    pub async fn email_auth_code(&self, email: &str) -> Result<AuthCodeResponse, Fail> {
        self.executor.run(&GetAuth, json!({ "email": email })).await?;
        let auth_code = send_auth_code(self.mailer.as_ref(), email, None).await?;
        Ok(AuthCodeResponse { auth_code })
    }

    pub async fn password_auth_code(&self, email: &str) -> Result<OutputMessage, Fail> {
        self.executor.run(&GetAuth, json!({ "email": email })).await?;

        let code = self.session.save_reset_code(email).await?;
        send_auth_code(self.mailer.as_ref(), email, Some(&code)).await?;

        Ok(OutputMessage::new(format!("mailing to '{}' succeeded.", email)))
    }

    pub async fn update_password(&self, auth_code: &str, email: &str, password: &str) -> Result<OutputId, Fail> {
        self.session.check_reset_code(email, auth_code).await?;

        let output = self
            .executor
            .run(
                &UpdatePassword::new(self.bcrypt_cost),
                json!({ "email": email, "password": password }),
            )
            .await?;

        self.session.clear_reset_code(email).await;
        Ok(output)
    }

    pub async fn replace_token(&self, refresh_token: &str, access_token: &str) -> Result<TokenPair, Fail> {
        self.session.rotate(refresh_token, access_token, false).await
    }
}
