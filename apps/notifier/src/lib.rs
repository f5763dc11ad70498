//! # cimail Notifier ライブラリ
//!
//! ビルド完了後のメール通知ユースケースと、その実行に必要な設定・ホスト抽象を公開する。
//! 実行バイナリと統合テストの両方から利用する。

pub mod config;
pub mod error;
pub mod host;
pub mod usecase;

pub use error::NotifierError;
pub use host::{BuildHost, RunnerBuildHost};
pub use usecase::notification::EmailNotifier;
