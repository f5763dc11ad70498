//! # CI ホスト
//!
//! 通知プラグインを呼び出す CI システム側のインターフェース。
//!
//! プラグインはホストからプロジェクト表示名とシステム設定を受け取り、
//! 送信結果をホストのビルドログに書き込む。

use std::collections::HashMap;

use cimail_domain::mail_config::EMAIL_SETTINGS_SECTION;

/// CI ホスト
pub trait BuildHost: Send + Sync {
    /// ビルド対象プロジェクトの表示名
    fn build_project_title(&self) -> String;

    /// システム設定の 1 セクションを取得する
    ///
    /// セクションが存在しない場合は空のマップを返す。
    fn system_config(&self, section: &str) -> HashMap<String, String>;

    /// ビルドログに 1 行書き込む
    fn log(&self, message: &str);
}

/// 実行バイナリ用のホスト
///
/// 起動時に読み込んだ設定を保持し、ログは tracing に流す。
#[derive(Debug, Clone)]
pub struct RunnerBuildHost {
    project_title:  String,
    email_settings: HashMap<String, String>,
}

impl RunnerBuildHost {
    pub fn new(project_title: impl Into<String>, email_settings: HashMap<String, String>) -> Self {
        Self {
            project_title: project_title.into(),
            email_settings,
        }
    }
}

impl BuildHost for RunnerBuildHost {
    fn build_project_title(&self) -> String {
        self.project_title.clone()
    }

    fn system_config(&self, section: &str) -> HashMap<String, String> {
        if section == EMAIL_SETTINGS_SECTION {
            self.email_settings.clone()
        } else {
            HashMap::new()
        }
    }

    fn log(&self, message: &str) {
        tracing::info!(target: "cimail::build", project = %self.project_title, "{message}");
    }
}
