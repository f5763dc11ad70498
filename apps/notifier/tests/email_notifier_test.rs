//! EmailNotifier 統合テスト
//!
//! モック配送とログを記録するホストを使い、宛先決定から送信結果の集計・
//! ホストへのログ出力までを通しで検証する。SMTP サーバーは不要。
//!
//! 実行方法:
//! ```bash
//! cargo test -p cimail-notifier --test email_notifier_test
//! ```

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use cimail_domain::{build::BuildResult, plugin_options::PluginOptions};
use cimail_infra::mock::MockMailTransport;
use cimail_notifier::{BuildHost, EmailNotifier, NotifierError};
use pretty_assertions::assert_eq;
use rstest::rstest;

// =============================================================================
// テスト用ホスト
// =============================================================================

struct RecordingHost {
    project_title: String,
    logs:          Mutex<Vec<String>>,
}

impl RecordingHost {
    fn new(project_title: &str) -> Arc<Self> {
        Arc::new(Self {
            project_title: project_title.to_string(),
            logs:          Mutex::new(Vec::new()),
        })
    }

    fn logs(&self) -> Vec<String> {
        self.logs.lock().unwrap().clone()
    }
}

impl BuildHost for RecordingHost {
    fn build_project_title(&self) -> String {
        self.project_title.clone()
    }

    fn system_config(&self, _section: &str) -> HashMap<String, String> {
        HashMap::new()
    }

    fn log(&self, message: &str) {
        self.logs.lock().unwrap().push(message.to_string());
    }
}

fn addresses(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn options_for(recipients: &[&str]) -> PluginOptions {
    PluginOptions {
        addresses: addresses(recipients),
        ..Default::default()
    }
}

fn notifier(
    host: &Arc<RecordingHost>,
    build: BuildResult,
    options: PluginOptions,
    transport: &MockMailTransport,
) -> EmailNotifier {
    EmailNotifier::with_transport(
        host.clone(),
        build,
        options,
        Arc::new(transport.clone()),
    )
    .unwrap()
}

// =============================================================================
// シナリオ
// =============================================================================

#[tokio::test]
async fn test_成功ビルドを1件の宛先に送信する() {
    let host = RecordingHost::new("demo");
    let transport = MockMailTransport::new();
    let notifier = notifier(
        &host,
        BuildResult::new(true, "OK", None),
        options_for(&["dev@example.com"]),
        &transport,
    );

    let result = notifier.execute().await.unwrap();

    assert!(result);
    let sent = transport.sent_messages();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].subject.contains("demo - Passing Build"));
    assert_eq!(sent[0].subject, "PHPCI - demo - Passing Build");
    assert_eq!(sent[0].html_body, "Log Output: <br><pre>OK</pre>");
    assert_eq!(sent[0].from, "notifications-ci@phptesting.org");
    assert_eq!(
        host.logs(),
        vec!["1 emails sent".to_string(), "0 emails failed to send".to_string()]
    );
}

#[tokio::test]
async fn test_失敗ビルドで1件拒否されるとfalseを返す() {
    let host = RecordingHost::new("demo");
    let transport = MockMailTransport::new();
    transport.reject("b@example.com");
    let notifier = notifier(
        &host,
        BuildResult::new(false, "FAILED", None),
        options_for(&["a@example.com", "b@example.com"]),
        &transport,
    );

    let result = notifier.execute().await.unwrap();

    assert!(!result);
    let sent = transport.sent_messages();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|m| m.subject == "PHPCI - demo - Failing Build"));
    assert_eq!(
        host.logs(),
        vec!["1 emails sent".to_string(), "1 emails failed to send".to_string()]
    );
}

#[tokio::test]
async fn test_宛先がなければ送信せずfalseを返す() {
    let host = RecordingHost::new("demo");
    let transport = MockMailTransport::new();
    let notifier = notifier(
        &host,
        BuildResult::new(true, "OK", Some("dev@example.com".to_string())),
        PluginOptions::default(),
        &transport,
    );

    let result = notifier.execute().await.unwrap();

    assert!(!result);
    assert!(transport.sent_messages().is_empty());
    assert!(host.logs().is_empty());
}

#[rstest]
#[case::全件成功(&[], true, 3, 0)]
#[case::一部失敗(&["b@x.com"], false, 2, 1)]
#[case::全件失敗(&["a@x.com", "b@x.com", "c@x.com"], false, 0, 3)]
#[tokio::test]
async fn test_送信件数と失敗件数をログに出す(
    #[case] rejected: &[&str],
    #[case] expected_result: bool,
    #[case] expected_sent: usize,
    #[case] expected_failed: usize,
) {
    let host = RecordingHost::new("demo");
    let transport = MockMailTransport::new();
    for address in rejected {
        transport.reject(*address);
    }
    let notifier = notifier(
        &host,
        BuildResult::new(true, "OK", None),
        options_for(&["a@x.com", "b@x.com", "c@x.com"]),
        &transport,
    );

    let result = notifier.execute().await.unwrap();

    assert_eq!(result, expected_result);
    assert_eq!(transport.sent_messages().len(), 3);
    assert_eq!(
        host.logs(),
        vec![
            format!("{expected_sent} emails sent"),
            format!("{expected_failed} emails failed to send"),
        ]
    );
}

#[tokio::test]
async fn test_コミッターと設定済み宛先とフォールバックの順に送る() {
    let host = RecordingHost::new("demo");
    let transport = MockMailTransport::new();
    let options = PluginOptions {
        committer:              true,
        addresses:              addresses(&["b@x.com", "a@x.com"]),
        default_mailto_address: Some("admin@x.com".to_string()),
    };
    let notifier = notifier(
        &host,
        BuildResult::new(true, "OK", Some("a@x.com".to_string())),
        options,
        &transport,
    );

    assert!(notifier.execute().await.unwrap());

    let recipients: Vec<Vec<String>> = transport
        .sent_messages()
        .into_iter()
        .map(|m| m.to)
        .collect();
    assert_eq!(
        recipients,
        vec![
            addresses(&["a@x.com"]),
            addresses(&["b@x.com"]),
            addresses(&["a@x.com"]),
            addresses(&["admin@x.com"]),
        ]
    );
}

#[tokio::test]
async fn test_配送基盤の障害はエラーとして伝播する() {
    let host = RecordingHost::new("demo");
    let transport = MockMailTransport::new();
    transport.fail_with("connection refused");
    let notifier = notifier(
        &host,
        BuildResult::new(true, "OK", None),
        options_for(&["dev@example.com"]),
        &transport,
    );

    let result = notifier.execute().await;

    assert!(matches!(result, Err(NotifierError::Infra(_))));
    assert!(host.logs().is_empty());
}
