//! # ドメイン層エラー定義
//!
//! 設定値の不正など、通知処理に入る前に検出できる問題を表現するエラー型。
//!
//! ## 設計方針
//!
//! - **型による分類**: エラーの種類を列挙型で明示し、パターンマッチで処理可能に
//! - **thiserror 活用**: `#[error(...)]` マクロでエラーメッセージを自動生成
//!
//! ## 使用例
//!
//! ```rust
//! use cimail_domain::DomainError;
//!
//! fn parse_port(value: &str) -> Result<u16, DomainError> {
//!     value.parse().map_err(|_| DomainError::InvalidConfig {
//!         key:   "smtp_port",
//!         value: value.to_string(),
//!     })
//! }
//!
//! assert!(parse_port("abc").is_err());
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// 設定値が解釈できない
    ///
    /// ポート番号が数値でない、未知の暗号化方式が指定された等。
    #[error("設定値が不正です: {key}={value:?}")]
    InvalidConfig {
        /// 設定キー（"smtp_port" など）
        key:   &'static str,
        /// 解釈できなかった値
        value: String,
    },

    /// プラグインオプションが解釈できない
    #[error("プラグインオプションが不正です: {0}")]
    InvalidOptions(String),
}
