//! # Notifier エラー定義
//!
//! 通知処理を中断させるエラーを集約する。
//!
//! 宛先単位の配送失敗はここには含まれない（`EmailNotifier::execute` の戻り値
//! `Ok(false)` とログで表現する）。ここに来るのは設定不備と配送基盤の障害だけで、
//! どちらも呼び出し元（CI ホスト）にそのまま伝播させる。

use std::path::PathBuf;

use cimail_domain::{DomainError, notification::NotificationError};
use cimail_infra::InfraError;
use thiserror::Error;

/// 通知処理のエラー
#[derive(Debug, Error)]
pub enum NotifierError {
    /// 設定値・プラグインオプションの不正
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// メール本文の生成に失敗
    #[error(transparent)]
    Notification(#[from] NotificationError),

    /// 配送基盤の障害（接続失敗、TLS エラー、送信元アドレス不正など）
    #[error(transparent)]
    Infra(#[from] InfraError),

    /// ビルドログファイルの読み込みに失敗
    #[error("ビルドログの読み込みに失敗: {}", path.display())]
    BuildLog {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },
}
