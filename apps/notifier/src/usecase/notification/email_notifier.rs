//! # ビルド結果メール通知
//!
//! 完了したビルドの結果を、コミッターや設定済みの宛先にメールで通知する。
//!
//! ## 処理の流れ
//!
//! ```text
//! 宛先決定 → 件名・本文生成 → 宛先ごとに個別送信 → 失敗宛先を集計 → ホストにログ出力
//! ```
//!
//! ## 設計方針
//!
//! - **個別送信**: 1 通に全宛先を載せず、宛先ごとに独立したメールを送る。
//!   1 件の拒否が他の宛先の配送を妨げない
//! - **逐次送信**: 送信は 1 件ずつ完了を待ってから次に進む。並列化もリトライもしない
//! - **失敗の扱い**: 宛先単位の失敗は `Ok(false)` として返し、配送基盤の障害
//!   （接続失敗など）は `Err` で呼び出し元に伝播させる
//! - **依存性注入**: `BuildHost` と `MailTransport` は trait で抽象化

use std::sync::Arc;

use cimail_domain::{
    build::BuildResult,
    mail_config::{EMAIL_SETTINGS_SECTION, MailConfig, MailConfigKey},
    notification::{DeliveryReport, EmailMessage, PRODUCT_NAME},
    plugin_options::PluginOptions,
};
use cimail_infra::transport::{MailTransport, SmtpMailTransport};
use cimail_shared::{event_log::event, log_business_event};

use super::{BuildReport, TemplateRenderer};
use crate::{error::NotifierError, host::BuildHost};

/// ビルド結果メール通知
///
/// 1 回のビルドにつき 1 インスタンスを作り、[`execute`](EmailNotifier::execute) を
/// 呼んだら破棄する。
pub struct EmailNotifier {
    host:              Arc<dyn BuildHost>,
    build:             BuildResult,
    options:           PluginOptions,
    mail_config:       MailConfig,
    transport:         Arc<dyn MailTransport>,
    template_renderer: TemplateRenderer,
}

impl EmailNotifier {
    /// SMTP で配送する通知を作成する
    ///
    /// ホストの `email_settings` セクションから SMTP 接続パラメータを解決し、
    /// 配送インスタンスを 1 つ作る。サーバーへの接続は最初の送信時に行われる。
    pub fn new(
        host: Arc<dyn BuildHost>,
        build: BuildResult,
        options: PluginOptions,
    ) -> Result<Self, NotifierError> {
        let mail_config = load_mail_config(host.as_ref());
        let transport = SmtpMailTransport::new(&mail_config.smtp_settings()?)?;

        Self::assemble(host, build, options, mail_config, Arc::new(transport))
    }

    /// 任意の配送実装で通知を作成する
    pub fn with_transport(
        host: Arc<dyn BuildHost>,
        build: BuildResult,
        options: PluginOptions,
        transport: Arc<dyn MailTransport>,
    ) -> Result<Self, NotifierError> {
        let mail_config = load_mail_config(host.as_ref());

        Self::assemble(host, build, options, mail_config, transport)
    }

    fn assemble(
        host: Arc<dyn BuildHost>,
        build: BuildResult,
        options: PluginOptions,
        mail_config: MailConfig,
        transport: Arc<dyn MailTransport>,
    ) -> Result<Self, NotifierError> {
        Ok(Self {
            host,
            build,
            options,
            mail_config,
            transport,
            template_renderer: TemplateRenderer::new()?,
        })
    }

    /// 通知を実行する
    ///
    /// 全宛先に送信できた場合に `true` を返す。宛先が 1 件もない場合は何も送らずに
    /// `false` を返す。
    #[tracing::instrument(skip_all, fields(successful = self.build.is_successful()))]
    pub async fn execute(&self) -> Result<bool, NotifierError> {
        let addresses = self.email_addresses();

        if addresses.is_empty() {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SKIPPED,
                event.result = event::result::FAILURE,
                "宛先が設定されていないため通知をスキップ"
            );
            return Ok(false);
        }

        let project_title = self.host.build_project_title();
        let report = self.template_renderer.render(&BuildReport {
            product_name:  PRODUCT_NAME,
            project_title: &project_title,
            outcome:       self.build.outcome(),
            log:           self.build.log(),
        })?;

        let failures = self
            .send_separate_emails(&addresses, &report.subject, &report.html_body)
            .await?;
        let delivery = DeliveryReport::new(addresses.len(), failures);

        self.host.log(&format!("{} emails sent", delivery.sent_count()));
        self.host.log(&format!("{} emails failed to send", delivery.failed_count()));

        if delivery.is_success() {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SENT,
                event.result = event::result::SUCCESS,
                notification.project = %project_title,
                notification.sent_count = delivery.sent_count(),
                "ビルド結果メール送信成功"
            );
        } else {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_FAILED,
                event.result = event::result::FAILURE,
                notification.project = %project_title,
                notification.sent_count = delivery.sent_count(),
                notification.failed_count = delivery.failed_count(),
                notification.failed = ?delivery.failed(),
                "ビルド結果メールの一部が送信できなかった"
            );
        }

        Ok(delivery.is_success())
    }

    /// 1 通のメールを送信し、配送できなかった宛先を返す
    ///
    /// `to` に複数の宛先を渡すと 1 通のメールに全員を載せる。
    pub async fn send_email(
        &self,
        to: &[String],
        subject: &str,
        html_body: &str,
    ) -> Result<Vec<String>, NotifierError> {
        let message = EmailMessage {
            from:      self.mail_config.from_address().to_string(),
            to:        to.to_vec(),
            subject:   subject.to_string(),
            html_body: html_body.to_string(),
        };

        Ok(self.transport.send(&message).await?)
    }

    /// 宛先ごとに個別のメールを送信し、配送できなかった宛先を送信順に返す
    pub async fn send_separate_emails(
        &self,
        addresses: &[String],
        subject: &str,
        html_body: &str,
    ) -> Result<Vec<String>, NotifierError> {
        let mut failures = Vec::new();

        for address in addresses {
            let failed = self
                .send_email(std::slice::from_ref(address), subject, html_body)
                .await?;
            failures.extend(failed);
        }

        Ok(failures)
    }

    /// 通知先のメールアドレス
    pub fn email_addresses(&self) -> Vec<String> {
        self.options.recipients(&self.build)
    }

    /// メール設定値（未設定・空文字列ならデフォルト値）
    pub fn mail_config(&self, key: MailConfigKey) -> Option<&str> {
        self.mail_config.get(key)
    }
}

fn load_mail_config(host: &dyn BuildHost) -> MailConfig {
    MailConfig::from_pairs(host.system_config(EMAIL_SETTINGS_SECTION))
}
