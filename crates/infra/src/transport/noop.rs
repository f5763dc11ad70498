//! Noop 配送実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! 通知無効化時や設定の動作確認に使用する。

use async_trait::async_trait;
use cimail_domain::notification::EmailMessage;

use super::MailTransport;
use crate::InfraError;

/// Noop 配送（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopMailTransport;

#[async_trait]
impl MailTransport for NoopMailTransport {
    async fn send(&self, message: &EmailMessage) -> Result<Vec<String>, InfraError> {
        tracing::info!(
            to = ?message.to,
            subject = %message.subject,
            "Noop: メール送信をスキップ"
        );
        Ok(Vec::new())
    }
}
