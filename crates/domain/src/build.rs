//! # ビルド結果
//!
//! CI ホストから渡される、完了済みビルドの読み取り専用ビュー。
//!
//! プロジェクト表示名はホスト側（`BuildHost`）が提供するため、ここには含めない。

use strum::{Display, IntoStaticStr};

/// ビルドの成否
///
/// `Display` はメール件名の末尾にそのまま使われる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum BuildOutcome {
    #[strum(serialize = "Passing Build")]
    Passing,
    #[strum(serialize = "Failing Build")]
    Failing,
}

impl BuildOutcome {
    /// 成功フラグから成否を決める
    pub fn from_success(successful: bool) -> Self {
        if successful { Self::Passing } else { Self::Failing }
    }
}

/// 完了済みビルドの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    successful:      bool,
    log:             String,
    committer_email: Option<String>,
}

impl BuildResult {
    pub fn new(successful: bool, log: impl Into<String>, committer_email: Option<String>) -> Self {
        Self {
            successful,
            log: log.into(),
            committer_email,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.successful
    }

    pub fn outcome(&self) -> BuildOutcome {
        BuildOutcome::from_success(self.successful)
    }

    /// ビルドログ全文
    pub fn log(&self) -> &str {
        &self.log
    }

    /// コミッターのメールアドレス
    ///
    /// 空文字列は未設定として扱い `None` を返す。
    pub fn committer_email(&self) -> Option<&str> {
        self.committer_email.as_deref().filter(|email| !email.is_empty())
    }
}
