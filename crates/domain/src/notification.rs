//! # 通知
//!
//! ビルド結果メールに関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 |
//! |---|------------|
//! | [`EmailMessage`] | 1 回の送信で送るメール |
//! | [`DeliveryReport`] | 宛先ごとの個別送信をまとめた配信結果 |
//!
//! ## 設計方針
//!
//! - **個別送信**: 宛先ごとに独立したメールを送り、1 件の失敗が他に波及しない
//! - **失敗は値で返す**: 宛先単位の配信失敗はエラーではなく [`DeliveryReport`] の
//!   失敗リストに積む

use thiserror::Error;

/// 件名の先頭に付く製品名
pub const PRODUCT_NAME: &str = "PHPCI";

/// 通知エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// メールメッセージ
///
/// 本文は常に `text/html` として送信する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信元メールアドレス
    pub from:      String,
    /// 送信先メールアドレス（1 件以上）
    pub to:        Vec<String>,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
}

/// 配信結果
///
/// 送信を試みた宛先数と、配信できなかった宛先（送信順）を保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    attempted: usize,
    failed:    Vec<String>,
}

impl DeliveryReport {
    pub fn new(attempted: usize, failed: Vec<String>) -> Self {
        Self { attempted, failed }
    }

    /// 送信できた件数
    pub fn sent_count(&self) -> usize {
        self.attempted.saturating_sub(self.failed.len())
    }

    /// 送信に失敗した件数
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// 配信できなかった宛先
    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    /// 1 件も失敗していなければ成功
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
