//! # Notifier 設定
//!
//! 環境変数から 1 回分の通知に必要な入力（ビルド結果、プラグインオプション、
//! メール設定）を読み込む。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `BUILD_PROJECT_TITLE` | No | プロジェクト表示名（デフォルト: 空文字列） |
//! | `BUILD_SUCCESSFUL` | No | `true` / `1` / `yes` で成功扱い。それ以外は失敗 |
//! | `BUILD_LOG_FILE` | No | ビルドログのファイルパス（`BUILD_LOG` より優先） |
//! | `BUILD_LOG` | No | ビルドログ本文 |
//! | `BUILD_COMMITTER_EMAIL` | No | コミッターのメールアドレス |
//! | `EMAIL_PLUGIN_OPTIONS` | No | プラグインオプション（JSON、デフォルト: `{}`） |
//! | `EMAIL_TRANSPORT` | No | `smtp`（デフォルト）または `noop` |
//! | `SMTP_ADDRESS` 等 | No | メール設定。キー名を大文字にした変数で指定する |

use std::{collections::HashMap, env, fs, path::PathBuf};

use cimail_domain::{
    DomainError,
    build::BuildResult,
    mail_config::MailConfigKey,
    plugin_options::PluginOptions,
};
use strum::{EnumString, IntoEnumIterator};

use crate::error::NotifierError;

/// 配送バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TransportBackend {
    /// SMTP サーバー経由で送信
    #[default]
    Smtp,
    /// 送信しない（ログ出力のみ）
    Noop,
}

/// 未設定・空文字列なら SMTP
fn parse_transport(value: Option<String>) -> Result<TransportBackend, DomainError> {
    match value.filter(|value| !value.trim().is_empty()) {
        Some(value) => value.trim().parse().map_err(|_| DomainError::InvalidConfig {
            key: "EMAIL_TRANSPORT",
            value,
        }),
        None => Ok(TransportBackend::default()),
    }
}

/// 1 回分の通知の入力
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// プロジェクト表示名
    pub project_title:  String,
    /// 完了したビルドの結果
    pub build:          BuildResult,
    /// プラグインオプション
    pub options:        PluginOptions,
    /// システム設定の `email_settings` セクション
    pub email_settings: HashMap<String, String>,
    /// 配送バックエンド
    pub transport:      TransportBackend,
}

impl NotifierConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, NotifierError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, NotifierError> {
        let log = match lookup("BUILD_LOG_FILE").filter(|path| !path.is_empty()) {
            Some(path) => {
                let path = PathBuf::from(path);
                fs::read_to_string(&path)
                    .map_err(|source| NotifierError::BuildLog { path, source })?
            }
            None => lookup("BUILD_LOG").unwrap_or_default(),
        };

        let successful = lookup("BUILD_SUCCESSFUL").is_some_and(|value| is_truthy(&value));
        let build = BuildResult::new(successful, log, lookup("BUILD_COMMITTER_EMAIL"));

        let options = match lookup("EMAIL_PLUGIN_OPTIONS").filter(|json| !json.trim().is_empty()) {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| DomainError::InvalidOptions(e.to_string()))?,
            None => PluginOptions::default(),
        };

        let email_settings = MailConfigKey::iter()
            .filter_map(|key| {
                let name: &'static str = key.into();
                lookup(&name.to_ascii_uppercase()).map(|value| (name.to_string(), value))
            })
            .collect();

        let transport = parse_transport(lookup("EMAIL_TRANSPORT"))?;

        Ok(Self {
            project_title: lookup("BUILD_PROJECT_TITLE").unwrap_or_default(),
            build,
            options,
            email_settings,
            transport,
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}
