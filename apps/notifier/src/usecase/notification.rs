//! # 通知ユースケース
//!
//! ビルド完了時のメール通知の宛先決定・本文生成・送信を統合する。
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - tera テンプレートエンジンによる件名・本文生成
//! - [`email_notifier`] - 宛先決定 + 本文生成 + 個別送信 + 結果集計

pub mod email_notifier;
pub mod template_renderer;

pub use email_notifier::EmailNotifier;
pub use template_renderer::{BuildReport, RenderedReport, TemplateRenderer};
