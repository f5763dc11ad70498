//! # cimail インフラ層
//!
//! メール配送など外部システムとの通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートはドメイン層のメッセージ型を受け取り、実際の配送手段の詳細を
//! カプセル化する。ユースケース層は [`transport::MailTransport`] トレイトだけに依存する。
//!
//! ## 依存関係
//!
//! ```text
//! notifier → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`transport`] - メール配送トレイトと SMTP / Noop 実装
//! - [`error`] - インフラ層エラー定義
//! - `mock` - テスト用のインメモリ配送（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use cimail_domain::mail_config::MailConfig;
//! use cimail_infra::transport::{MailTransport, SmtpMailTransport};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = MailConfig::default().smtp_settings()?;
//!     let transport = SmtpMailTransport::new(&settings)?;
//!     Ok(())
//! }
//! ```

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod transport;

pub use error::InfraError;
