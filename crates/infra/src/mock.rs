//! # テスト用モック配送
//!
//! ユースケーステストで使用するインメモリのメール配送。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! cimail-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use cimail_domain::notification::EmailMessage;

use crate::{error::InfraError, transport::MailTransport};

// ===== MockMailTransport =====

/// 送信したメッセージを記録するモック配送
///
/// `reject()` で登録した宛先は配送失敗として返す。
/// `fail_with()` を設定すると、以降の送信は配送基盤の障害として `Err` を返す。
#[derive(Clone, Default)]
pub struct MockMailTransport {
    sent:      Arc<Mutex<Vec<EmailMessage>>>,
    rejected:  Arc<Mutex<HashSet<String>>>,
    fail_with: Arc<Mutex<Option<String>>>,
}

impl MockMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した宛先を配送失敗として扱う
    pub fn reject(&self, address: impl Into<String>) {
        self.rejected.lock().unwrap().insert(address.into());
    }

    /// 以降の送信を配送基盤の障害として失敗させる
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.fail_with.lock().unwrap() = Some(message.into());
    }

    /// 送信されたメッセージ（送信順）
    pub fn sent_messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn send(&self, message: &EmailMessage) -> Result<Vec<String>, InfraError> {
        if let Some(reason) = self.fail_with.lock().unwrap().clone() {
            return Err(InfraError::simulated(reason));
        }

        self.sent.lock().unwrap().push(message.clone());

        let rejected = self.rejected.lock().unwrap();
        Ok(message
            .to
            .iter()
            .filter(|address| rejected.contains(*address))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn message(to: &[&str]) -> EmailMessage {
        EmailMessage {
            from:      "ci@example.com".to_string(),
            to:        to.iter().map(|a| a.to_string()).collect(),
            subject:   "件名".to_string(),
            html_body: "本文".to_string(),
        }
    }

    #[tokio::test]
    async fn 拒否した宛先だけを失敗として返す() {
        let transport = MockMailTransport::new();
        transport.reject("b@x.com");

        let failed = transport
            .send(&message(&["a@x.com", "b@x.com"]))
            .await
            .unwrap();

        assert_eq!(failed, vec!["b@x.com".to_string()]);
        assert_eq!(transport.sent_messages().len(), 1);
    }

    #[tokio::test]
    async fn fail_with設定後は送信を記録せずエラーを返す() {
        let transport = MockMailTransport::new();
        transport.fail_with("接続拒否");

        let result = transport.send(&message(&["a@x.com"])).await;

        assert!(result.is_err());
        assert!(transport.sent_messages().is_empty());
    }
}
