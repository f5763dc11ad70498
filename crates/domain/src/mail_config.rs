//! # メール設定
//!
//! システム全体のメール設定（ホストの `email_settings` セクション）を型付きで保持する。
//!
//! ## 設計方針
//!
//! - **デフォルト表の一元化**: 未設定・空文字列のときに使う値は
//!   [`MailConfigKey::default_value`] だけが知っている
//! - **空文字列は未設定**: `""` が設定されていてもデフォルト値にフォールバックする
//! - **構築時の解決**: SMTP 接続パラメータは [`MailConfig::smtp_settings`] で一度だけ
//!   解釈し、不正値はその時点で [`DomainError::InvalidConfig`] とする
//!
//! ## デフォルト値
//!
//! | キー | デフォルト |
//! |------|-----------|
//! | `smtp_address` | `localhost` |
//! | `smtp_port` | `25` |
//! | `smtp_encryption` | なし |
//! | `smtp_username` | 空文字列 |
//! | `smtp_password` | 空文字列 |
//! | `from_address` | `notifications-ci@phptesting.org` |
//! | `default_mailto_address` | なし |

use std::{fmt, str::FromStr};

use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::DomainError;

/// メール設定を格納するシステム設定のセクション名
pub const EMAIL_SETTINGS_SECTION: &str = "email_settings";

/// 送信元アドレスのデフォルト
pub const DEFAULT_FROM_ADDRESS: &str = "notifications-ci@phptesting.org";

/// 認識するメール設定キー
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    IntoStaticStr,
    strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum MailConfigKey {
    SmtpAddress,
    SmtpPort,
    SmtpEncryption,
    SmtpUsername,
    SmtpPassword,
    FromAddress,
    DefaultMailtoAddress,
}

impl MailConfigKey {
    /// 未設定または空文字列のときに使う値
    pub fn default_value(self) -> Option<&'static str> {
        match self {
            Self::SmtpAddress => Some("localhost"),
            Self::SmtpPort => Some("25"),
            Self::SmtpEncryption | Self::DefaultMailtoAddress => None,
            Self::SmtpUsername | Self::SmtpPassword => Some(""),
            Self::FromAddress => Some(DEFAULT_FROM_ADDRESS),
        }
    }
}

/// SMTP の暗号化方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SmtpEncryption {
    /// 接続直後から TLS（implicit TLS）
    Ssl,
    /// 平文で接続し STARTTLS で昇格
    Tls,
}

/// SMTP 認証情報
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// 解決済みの SMTP 接続パラメータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host:        String,
    pub port:        u16,
    pub encryption:  Option<SmtpEncryption>,
    /// ユーザー名が空の場合は `None`（認証なし）
    pub credentials: Option<SmtpCredentials>,
}

/// システム全体のメール設定
///
/// 各フィールドは設定ファイル・環境変数に書かれた生の値。
/// 値の解決（空文字列のフォールバック）は [`get`](MailConfig::get) で行う。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailConfig {
    pub smtp_address:           Option<String>,
    pub smtp_port:              Option<String>,
    pub smtp_encryption:        Option<String>,
    pub smtp_username:          Option<String>,
    pub smtp_password:          Option<String>,
    pub from_address:           Option<String>,
    pub default_mailto_address: Option<String>,
}

impl MailConfig {
    /// キーと値の組から設定を作成する
    ///
    /// 認識しないキーは無視する。
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            if let Ok(key) = MailConfigKey::from_str(key.as_ref()) {
                *config.slot_mut(key) = Some(value.into());
            }
        }
        config
    }

    /// 設定値を取得する
    ///
    /// 値が設定されていて空でなければその値を、そうでなければ
    /// [`MailConfigKey::default_value`] を返す。
    pub fn get(&self, key: MailConfigKey) -> Option<&str> {
        self.slot(key)
            .as_deref()
            .filter(|value| !value.is_empty())
            .or_else(|| key.default_value())
    }

    /// 文字列キーで設定値を取得する
    ///
    /// 認識しないキーは空文字列を返す。
    pub fn lookup(&self, name: &str) -> Option<&str> {
        match MailConfigKey::from_str(name) {
            Ok(key) => self.get(key),
            Err(_) => Some(""),
        }
    }

    /// 送信元アドレス
    pub fn from_address(&self) -> &str {
        self.get(MailConfigKey::FromAddress)
            .unwrap_or(DEFAULT_FROM_ADDRESS)
    }

    /// SMTP 接続パラメータを解決する
    pub fn smtp_settings(&self) -> Result<SmtpSettings, DomainError> {
        let host = self
            .get(MailConfigKey::SmtpAddress)
            .unwrap_or_default()
            .to_string();

        let port_value = self.get(MailConfigKey::SmtpPort).unwrap_or_default();
        let port = port_value
            .trim()
            .parse::<u16>()
            .map_err(|_| DomainError::InvalidConfig {
                key:   MailConfigKey::SmtpPort.into(),
                value: port_value.to_string(),
            })?;

        let encryption = self
            .get(MailConfigKey::SmtpEncryption)
            .map(|value| {
                SmtpEncryption::from_str(value.trim()).map_err(|_| DomainError::InvalidConfig {
                    key:   MailConfigKey::SmtpEncryption.into(),
                    value: value.to_string(),
                })
            })
            .transpose()?;

        let username = self.get(MailConfigKey::SmtpUsername).unwrap_or_default();
        let credentials = (!username.is_empty()).then(|| SmtpCredentials {
            username: username.to_string(),
            password: self
                .get(MailConfigKey::SmtpPassword)
                .unwrap_or_default()
                .to_string(),
        });

        Ok(SmtpSettings {
            host,
            port,
            encryption,
            credentials,
        })
    }

    fn slot(&self, key: MailConfigKey) -> &Option<String> {
        match key {
            MailConfigKey::SmtpAddress => &self.smtp_address,
            MailConfigKey::SmtpPort => &self.smtp_port,
            MailConfigKey::SmtpEncryption => &self.smtp_encryption,
            MailConfigKey::SmtpUsername => &self.smtp_username,
            MailConfigKey::SmtpPassword => &self.smtp_password,
            MailConfigKey::FromAddress => &self.from_address,
            MailConfigKey::DefaultMailtoAddress => &self.default_mailto_address,
        }
    }

    fn slot_mut(&mut self, key: MailConfigKey) -> &mut Option<String> {
        match key {
            MailConfigKey::SmtpAddress => &mut self.smtp_address,
            MailConfigKey::SmtpPort => &mut self.smtp_port,
            MailConfigKey::SmtpEncryption => &mut self.smtp_encryption,
            MailConfigKey::SmtpUsername => &mut self.smtp_username,
            MailConfigKey::SmtpPassword => &mut self.smtp_password,
            MailConfigKey::FromAddress => &mut self.from_address,
            MailConfigKey::DefaultMailtoAddress => &mut self.default_mailto_address,
        }
    }
}
