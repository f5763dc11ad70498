//! # cimail Notifier
//!
//! CI のビルド完了後に 1 回だけ起動され、ビルド結果をメールで通知する。
//!
//! ## 役割
//!
//! - 環境変数からビルド結果・プラグインオプション・メール設定を読み込む
//! - コミッター・設定済みの宛先に 1 通ずつメールを送る
//! - 結果を終了コードで CI に返す
//!
//! ## 終了コード
//!
//! | コード | 意味 |
//! |--------|------|
//! | 0 | 全宛先に送信できた |
//! | 1 | 宛先がない、または一部の宛先に送信できなかった |
//! | 2 | 設定不備・配送基盤の障害 |
//!
//! ## 起動方法
//!
//! ```bash
//! BUILD_PROJECT_TITLE=demo BUILD_SUCCESSFUL=true BUILD_LOG_FILE=build.log \
//! EMAIL_PLUGIN_OPTIONS='{"committer": true}' BUILD_COMMITTER_EMAIL=dev@example.com \
//! SMTP_ADDRESS=localhost SMTP_PORT=1025 \
//! cargo run -p cimail-notifier
//! ```

use std::{process::ExitCode, sync::Arc};

use anyhow::Context as _;
use cimail_infra::transport::NoopMailTransport;
use cimail_notifier::{
    EmailNotifier,
    RunnerBuildHost,
    config::{NotifierConfig, TransportBackend},
};
use cimail_shared::observability::{TracingConfig, init_tracing};
use tracing::Instrument as _;

const SERVICE_NAME: &str = "cimail-notifier";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env(SERVICE_NAME);
    init_tracing(&tracing_config);

    match run().instrument(tracing_config.root_span()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("ビルド結果の通知に失敗しました: {e:#}");
            ExitCode::from(2)
        }
    }
}

async fn run() -> anyhow::Result<bool> {
    let config = NotifierConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        project = %config.project_title,
        successful = config.build.is_successful(),
        transport = ?config.transport,
        "ビルド結果の通知を開始します"
    );

    let host = Arc::new(RunnerBuildHost::new(
        config.project_title,
        config.email_settings,
    ));

    let notifier = match config.transport {
        TransportBackend::Smtp => EmailNotifier::new(host, config.build, config.options),
        TransportBackend::Noop => EmailNotifier::with_transport(
            host,
            config.build,
            config.options,
            Arc::new(NoopMailTransport),
        ),
    }
    .context("通知の初期化に失敗しました")?;

    Ok(notifier.execute().await?)
}
