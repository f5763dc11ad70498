//! SMTP 配送実装
//!
//! lettre の `AsyncSmtpConnection` で 1 通ごとにセッションを張ってメールを送信する。
//! 暗号化方式は `smtp_encryption` 設定に従う:
//!
//! | 設定値 | 接続方式 |
//! |--------|---------|
//! | なし | 平文 |
//! | `ssl` | implicit TLS |
//! | `tls` | STARTTLS |
//!
//! ## 失敗の分類
//!
//! セッション確立（接続、グリーティング、STARTTLS、AUTH）で起きたエラーは
//! 配送基盤の障害として `Err` を返す。確立後の MAIL / RCPT / DATA に対する
//! 4xx / 5xx 応答だけを、そのメッセージの宛先の配送失敗として扱う。

use std::time::Duration;

use async_trait::async_trait;
use cimail_domain::{
    mail_config::{SmtpEncryption, SmtpSettings},
    notification::EmailMessage,
};
use lettre::{
    message::{Mailbox, Message, header::ContentType},
    transport::smtp::{
        authentication::{Credentials, DEFAULT_MECHANISMS},
        client::{AsyncSmtpConnection, TlsParameters},
        extension::ClientId,
    },
};

use super::MailTransport;
use crate::InfraError;

const SMTP_TIMEOUT: Duration = Duration::from_secs(60);

enum TlsMode {
    Plain,
    Wrapper(TlsParameters),
    Starttls(TlsParameters),
}

/// SMTP 配送
///
/// 接続パラメータだけを保持し、送信のたびに `AsyncSmtpConnection` を張る。
/// 通知 1 回につき 1 インスタンスを作り、全宛先の送信で使い回す。
pub struct SmtpMailTransport {
    host:        String,
    port:        u16,
    tls:         TlsMode,
    credentials: Option<Credentials>,
    hello_name:  ClientId,
}

impl SmtpMailTransport {
    /// 新しい SMTP 配送インスタンスを作成
    ///
    /// サーバーへの接続は最初の送信時に行われるため、ここでは TLS パラメータの
    /// 構築失敗以外はエラーにならない。
    pub fn new(settings: &SmtpSettings) -> Result<Self, InfraError> {
        let tls = match settings.encryption {
            Some(SmtpEncryption::Ssl) => {
                TlsMode::Wrapper(TlsParameters::new(settings.host.clone())?)
            }
            Some(SmtpEncryption::Tls) => {
                TlsMode::Starttls(TlsParameters::new(settings.host.clone())?)
            }
            None => TlsMode::Plain,
        };

        let credentials = settings.credentials.as_ref().map(|credentials| {
            Credentials::new(credentials.username.clone(), credentials.password.clone())
        });

        tracing::debug!(
            host = %settings.host,
            port = settings.port,
            encryption = ?settings.encryption,
            authenticated = credentials.is_some(),
            "SMTP 配送を初期化"
        );

        Ok(Self {
            host: settings.host.clone(),
            port: settings.port,
            tls,
            credentials,
            hello_name: ClientId::default(),
        })
    }

    /// 接続から認証までを済ませたセッションを開く
    async fn open_session(&self) -> Result<AsyncSmtpConnection, InfraError> {
        let wrapper = match &self.tls {
            TlsMode::Wrapper(parameters) => Some(parameters.clone()),
            TlsMode::Plain | TlsMode::Starttls(_) => None,
        };

        let mut connection = AsyncSmtpConnection::connect_tokio1(
            (self.host.as_str(), self.port),
            Some(SMTP_TIMEOUT),
            &self.hello_name,
            wrapper,
            None,
        )
        .await?;

        if let TlsMode::Starttls(parameters) = &self.tls {
            connection
                .starttls(parameters.clone(), &self.hello_name)
                .await?;
        }

        if let Some(credentials) = &self.credentials {
            let authenticated = connection.auth(DEFAULT_MECHANISMS, credentials).await;
            if let Err(e) = authenticated {
                connection.abort().await;
                return Err(e.into());
            }
        }

        Ok(connection)
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    #[tracing::instrument(skip_all, level = "debug", fields(recipients = message.to.len()))]
    async fn send(&self, message: &EmailMessage) -> Result<Vec<String>, InfraError> {
        let from: Mailbox = message
            .from
            .parse()
            .map_err(|e| InfraError::address(&message.from, e))?;

        let mut builder = Message::builder()
            .from(from)
            .subject(&message.subject)
            .header(ContentType::TEXT_HTML);

        let mut invalid = Vec::new();
        let mut deliverable = 0;
        for address in &message.to {
            match address.parse::<Mailbox>() {
                Ok(mailbox) => {
                    builder = builder.to(mailbox);
                    deliverable += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        recipient = %address,
                        error = %e,
                        "宛先アドレスが不正なため送信対象から除外"
                    );
                    invalid.push(address.clone());
                }
            }
        }

        if deliverable == 0 {
            return Ok(invalid);
        }

        let email = builder.body(message.html_body.clone())?;

        let mut connection = self.open_session().await?;
        let result = connection.send(email.envelope(), &email.formatted()).await;
        connection.abort().await;

        match result {
            Ok(_) => Ok(invalid),
            // セッション確立後の 4xx / 5xx 応答はサーバーが宛先またはメッセージを拒否したことを表す
            Err(e) if e.is_permanent() || e.is_transient() => {
                tracing::warn!(
                    to = ?message.to,
                    error = %e,
                    "SMTP サーバーが配送を拒否"
                );
                Ok(message.to.clone())
            }
            Err(e) => Err(e.into()),
        }
    }
}
