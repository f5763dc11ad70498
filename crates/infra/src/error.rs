//! # インフラ層エラー定義
//!
//! メール配送基盤との通信で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **エラーの変換**: lettre の SMTP エラー、メッセージ構築エラーなどをラップ
//! - **宛先単位の失敗は含めない**: サーバーに拒否された宛先は `MailTransport::send` の
//!   戻り値で返し、ここには配送基盤そのものの障害だけを載せる
//! - **SpanTrace 自動捕捉**: `From` 実装や convenience constructor で
//!   エラー生成時の呼び出し経路を自動記録する
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（Smtp, Address, MessageBuild）

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別（[`InfraErrorKind`]）と [`SpanTrace`]（呼び出し経路）を保持する。
///
/// ## パターンマッチ
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する:
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::Smtp(e) if e.is_timeout() => { /* タイムアウト */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// SMTP エラー
    ///
    /// 接続失敗、TLS ハンドシェイク失敗、認証失敗など、
    /// 宛先の拒否として扱えない配送基盤の障害。
    #[error("SMTP エラー: {0}")]
    Smtp(#[source] lettre::transport::smtp::Error),

    /// メールアドレスの解釈に失敗
    #[error("メールアドレスが不正です: {address}")]
    Address {
        /// 解釈できなかったアドレス
        address: String,
        #[source]
        source:  lettre::address::AddressError,
    },

    /// メッセージ構築エラー
    #[error("メッセージ構築に失敗: {0}")]
    MessageBuild(#[source] lettre::error::Error),

    /// 模擬した配送基盤の障害
    ///
    /// テスト用モック（`test-utils` feature）だけが生成する。
    #[cfg(any(test, feature = "test-utils"))]
    #[error("配送基盤の障害（模擬）: {0}")]
    Simulated(String),
}

// ===== InfraError のメソッド =====

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// InfraError を分解して InfraErrorKind と SpanTrace を取り出す
    pub fn into_parts(self) -> (InfraErrorKind, SpanTrace) {
        (self.kind, self.span_trace)
    }

    // ===== Convenience constructors =====

    /// アドレス解釈エラーを生成する
    pub fn address(address: impl Into<String>, source: lettre::address::AddressError) -> Self {
        Self {
            kind:       InfraErrorKind::Address {
                address: address.into(),
                source,
            },
            span_trace: SpanTrace::capture(),
        }
    }

    /// 模擬した配送基盤の障害を生成する
    #[cfg(any(test, feature = "test-utils"))]
    pub fn simulated(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Simulated(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<lettre::transport::smtp::Error> for InfraError {
    fn from(source: lettre::transport::smtp::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Smtp(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<lettre::error::Error> for InfraError {
    fn from(source: lettre::error::Error) -> Self {
        Self {
            kind:       InfraErrorKind::MessageBuild(source),
            span_trace: SpanTrace::capture(),
        }
    }
}
