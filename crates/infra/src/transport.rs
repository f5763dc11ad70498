//! # メール配送
//!
//! メールの配送を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `MailTransport` trait でメール配送を抽象化
//! - **2 つの実装**: SMTP（lettre）、Noop（配送無効化・動作確認用）
//! - **宛先単位の失敗は値で返す**: サーバーに拒否された宛先は `Ok` の失敗リストで返し、
//!   接続断などの配送基盤の障害だけを `Err` にする

mod noop;
mod smtp;

use async_trait::async_trait;
use cimail_domain::notification::EmailMessage;
pub use noop::NoopMailTransport;
pub use smtp::SmtpMailTransport;

use crate::InfraError;

/// メール配送トレイト
///
/// 1 通のメールを配送し、配送できなかった宛先を返す。
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// メールを送信する
    ///
    /// 戻り値は配送できなかった宛先（`message.to` の順序を保つ）。
    /// 空なら全宛先に配送できたことを表す。
    async fn send(&self, message: &EmailMessage) -> Result<Vec<String>, InfraError>;
}
