//! # cimail ドメイン層
//!
//! ビルド完了通知メールの判断ロジックを担うドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **純粋性**: SMTP や環境変数などの外部システムには一切依存しない
//! - **型付き設定**: 文字列マップの ad-hoc な `isset` 判定を型付き構造体に置き換え、
//!   構築時に一度だけ正規化する
//! - **デフォルト表の一元化**: 設定キーごとのデフォルト値は [`mail_config::MailConfigKey`]
//!   に集約する
//!
//! ## 依存関係の方向
//!
//! ```text
//! notifier → infra → domain
//!     ↘        ↓
//!       shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`build`] - ビルド結果とその成否
//! - [`mail_config`] - システム全体のメール設定とデフォルト値
//! - [`plugin_options`] - ジョブごとのプラグインオプションと宛先リストの組み立て
//! - [`notification`] - メールメッセージと配信結果
//! - [`error`] - ドメイン層エラー
//!
//! ## 使用例
//!
//! ```rust
//! use cimail_domain::{build::BuildResult, plugin_options::PluginOptions};
//!
//! let build = BuildResult::new(true, "OK", Some("dev@example.com".to_string()));
//! let options = PluginOptions {
//!     committer: true,
//!     ..Default::default()
//! };
//!
//! assert_eq!(options.recipients(&build), vec!["dev@example.com".to_string()]);
//! ```

pub mod build;
pub mod error;
pub mod mail_config;
pub mod notification;
pub mod plugin_options;

pub use error::DomainError;
