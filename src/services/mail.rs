//! 인증 메일 발송
//!
//! 가입 인증 코드(6자리)와 비밀번호 재설정 코드를 메일로 보냅니다.
//! `EMAIL_HOST` 가 설정되어 있으면 [`SmtpMailer`] (STARTTLS, 기본 587 포트),
//! 없으면 코드를 로그로만 남기는 [`ConsoleMailer`] 를 사용합니다.
//!
//! ```rust,ignore
//! let mailer: Arc<dyn Mailer> = match SmtpMailer::from_config()? {
//!     Some(smtp) => Arc::new(smtp),
//!     None => Arc::new(ConsoleMailer),
//! };
//! let code = send_auth_code(mailer.as_ref(), "neo@matrix.io", None).await?;
//! ```

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::info;

use crate::config::MailConfig;
use crate::core::errors::{Fail, FailContext};
use crate::utils::codes::register_code;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailKind {
    Register,
    ResetPassword,
}

/// 인증 코드가 담긴 메일 한 통
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthMail {
    pub kind: MailKind,
    pub to: String,
    pub code: String,
}

impl AuthMail {
    pub fn subject(&self) -> &'static str {
        match self.kind {
            MailKind::Register => "회원가입을 위한 인증번호를 입력해주세요.",
            MailKind::ResetPassword => "비밀번호 재설정 안내입니다.",
        }
    }

    fn heading(&self) -> &'static str {
        match self.kind {
            MailKind::Register => "회원가입을 위한 인증번호 입니다.",
            MailKind::ResetPassword => "비밀번호 변경을 위한 인증메일 입니다. 인증코드는 5분간 유효합니다.",
        }
    }

    pub fn text(&self) -> String {
        format!(
            "{}\n\n이메일: {}\n인증번호: {}\n\n본 메일은 발신전용 입니다.",
            self.heading(),
            self.to,
            self.code
        )
    }

    pub fn html(&self) -> String {
        format!(
            concat!(
                "<!DOCTYPE html><html lang=\"ko\"><head><meta charset=\"UTF-8\"></head>",
                "<body style=\"font-family:sans-serif;color:#333\">",
                "<h3 style=\"margin-bottom:16px\">{}</h3>",
                "<p><span style=\"font-weight:bold\">이메일</span> {}</p>",
                "<p><span style=\"font-weight:bold\">인증번호</span> ",
                "<span style=\"font-size:20px;letter-spacing:2px\">{}</span></p>",
                "<p style=\"font-size:12px;color:#999\">본 메일은 발신전용 입니다.</p>",
                "</body></html>"
            ),
            self.heading(),
            self.to,
            self.code
        )
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, mail: &AuthMail) -> Result<(), Fail>;
}

/// 코드가 없으면 가입 인증 코드를 만들어 보내고, 있으면 재설정 메일로 보냄
///
/// 발송한 코드를 돌려줍니다.
pub async fn send_auth_code(mailer: &dyn Mailer, email: &str, code: Option<&str>) -> Result<String, Fail> {
    let mail = match code {
        None => AuthMail {
            kind: MailKind::Register,
            to: email.to_string(),
            code: register_code(),
        },
        Some(code) => AuthMail {
            kind: MailKind::ResetPassword,
            to: email.to_string(),
            code: code.to_string(),
        },
    };

    mailer.deliver(&mail).await?;
    Ok(mail.code)
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16, username: String, password: String, from: &str) -> Result<Self, Fail> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .context("Failed to build SMTP transport")?
            .port(port)
            .credentials(Credentials::new(username, password))
            .build();

        let from = from.parse::<Mailbox>().context("Invalid sender address")?;

        Ok(Self { transport, from })
    }

    /// `EMAIL_HOST` 가 없으면 `None`
    pub fn from_config() -> Result<Option<Self>, Fail> {
        match MailConfig::host() {
            None => Ok(None),
            Some(host) => Self::new(
                &host,
                MailConfig::port(),
                MailConfig::username(),
                MailConfig::password(),
                &MailConfig::from_address(),
            )
            .map(Some),
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn deliver(&self, mail: &AuthMail) -> Result<(), Fail> {
        let to = mail
            .to
            .parse::<Mailbox>()
            .map_err(|_| Fail::invalid_input("`email` is invalid."))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject())
            .multipart(MultiPart::alternative_plain_html(mail.text(), mail.html()))
            .context("Failed to build mail")?;

        self.transport
            .send(message)
            .await
            .with_context(|| format!("Failed to send mail to '{}'", mail.to))?;

        info!("메일 발송 완료: {:?} → {}", mail.kind, mail.to);
        Ok(())
    }
}

/// 발송 대신 로그 출력
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn deliver(&self, mail: &AuthMail) -> Result<(), Fail> {
        info!("[mail:{:?}] {} 인증번호 {}", mail.kind, mail.to, mail.code);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<AuthMail>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn deliver(&self, mail: &AuthMail) -> Result<(), Fail> {
            self.sent.lock().await.push(mail.clone());
            Ok(())
        }
    }
}
