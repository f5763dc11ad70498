//! # ユースケース層
//!
//! - [`notification`] - ビルド結果メール通知

pub mod notification;
