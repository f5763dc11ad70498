//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンでビルド結果メールの件名と HTML 本文を生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名パターン**: `{製品名} - {プロジェクト名} - Passing Build | Failing Build`
//! - **本文パターン**: `Log Output: <br><pre>{ビルドログ}</pre>`
//! - **ログは無加工**: ビルドログは HTML エスケープせずにそのまま `<pre>` に入れる

use cimail_domain::{build::BuildOutcome, notification::NotificationError};
use tera::{Context, Tera};

const SUBJECT_TEMPLATE: &str = "subject.txt";
const BODY_TEMPLATE: &str = "body.html";

/// レンダリングの入力
#[derive(Debug, Clone, Copy)]
pub struct BuildReport<'a> {
    pub product_name:  &'a str,
    pub project_title: &'a str,
    pub outcome:       BuildOutcome,
    pub log:           &'a str,
}

/// レンダリング結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub subject:   String,
    pub html_body: String,
}

/// テンプレートレンダラー
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    SUBJECT_TEMPLATE,
                    include_str!("../../../templates/build_report/subject.txt"),
                ),
                (
                    BODY_TEMPLATE,
                    include_str!("../../../templates/build_report/body.html"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// ビルド結果から件名と本文を生成する
    pub fn render(&self, report: &BuildReport<'_>) -> Result<RenderedReport, NotificationError> {
        let mut context = Context::new();
        context.insert("product_name", report.product_name);
        context.insert("project_title", report.project_title);
        context.insert("outcome", &report.outcome.to_string());
        context.insert("log", report.log);

        let subject = self.render_template(SUBJECT_TEMPLATE, &context)?;
        let html_body = self.render_template(BODY_TEMPLATE, &context)?;

        Ok(RenderedReport { subject, html_body })
    }

    fn render_template(&self, name: &str, context: &Context) -> Result<String, NotificationError> {
        let rendered = self
            .engine
            .render(name, context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        // テンプレートファイル末尾の改行は出力に含めない
        Ok(rendered.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(outcome: BuildOutcome, log: &str) -> RenderedReport {
        TemplateRenderer::new()
            .unwrap()
            .render(&BuildReport {
                product_name: "PHPCI",
                project_title: "demo",
                outcome,
                log,
            })
            .unwrap()
    }

    #[test]
    fn 成功ビルドの件名と本文() {
        let report = render(BuildOutcome::Passing, "OK");

        assert_eq!(report.subject, "PHPCI - demo - Passing Build");
        assert_eq!(report.html_body, "Log Output: <br><pre>OK</pre>");
    }

    #[test]
    fn 失敗ビルドの件名() {
        let report = render(BuildOutcome::Failing, "");

        assert_eq!(report.subject, "PHPCI - demo - Failing Build");
        assert_eq!(report.html_body, "Log Output: <br><pre></pre>");
    }

    #[test]
    fn ログはエスケープせずそのまま埋め込む() {
        let log = "<b>warning</b> & \"quoted\"\nline 2\n";
        let report = render(BuildOutcome::Failing, log);

        assert_eq!(report.html_body, format!("Log Output: <br><pre>{log}</pre>"));
    }
}
