//! Application orchestrator. Wires the tailer, dispatcher and webhook client together.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use craftwatch_classifier::Classifier;
use craftwatch_dispatcher::Dispatcher;
use craftwatch_game_log::LogTailer;
use craftwatch_webhook::Client as WebhookClient;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;

/// Runs until the tailer stops or Ctrl-C is pressed.
pub async fn run(log_file: PathBuf, webhook_url: String, config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    // -- Startup: everything that can fail fails here --
    let classifier =
        Arc::new(Classifier::new(&config.rules).context("invalid classifier rules")?);

    let client = WebhookClient::new(&webhook_url, config.client_config())
        .context("can't create webhook client")?;
    tracing::info!(host = client.url().host_str().unwrap_or_default(), "webhook configured");

    let chat = Arc::clone(&classifier);
    let tailer = LogTailer::open(&log_file, config.tailer_config())
        .with_context(|| format!("can't read log file {}", log_file.display()))?
        .with_filter(Box::new(move |line: &str| !chat.is_chat(line)));

    banner(&mut std::io::stdout(), "Start");

    // -- Pipeline --
    let (tx, rx) = mpsc::channel(config.queue_capacity());

    let dispatcher = Dispatcher::new(classifier, client);
    let mut dispatch_task = tokio::spawn(dispatcher.run(rx, cancel.clone()));
    let mut tail_task = tokio::spawn(tailer.run(tx, cancel.clone()));

    let tail_result = tokio::select! {
        res = &mut tail_task => res.context("tailer task panicked")?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, shutting down");
            cancel.cancel();
            (&mut tail_task).await.context("tailer task panicked")?
        }
    };

    banner(&mut std::io::stdout(), "End");

    // The tailer dropped its sender; the dispatcher finishes what is queued.
    let stats = tokio::select! {
        res = &mut dispatch_task => res.context("dispatcher task panicked")?,
        _ = tokio::signal::ctrl_c(), if !cancel.is_cancelled() => {
            tracing::info!("SIGINT received, abandoning queued notifications");
            cancel.cancel();
            (&mut dispatch_task).await.context("dispatcher task panicked")?
        }
    };

    tracing::info!(
        lines = stats.lines,
        notified = stats.notified,
        failed = stats.failed,
        "pipeline stopped"
    );

    tail_result.context("log tailing stopped")?;
    Ok(())
}

/// Prints a lifecycle banner. Output errors are logged and otherwise ignored.
fn banner(out: &mut impl Write, text: &str) {
    if let Err(e) = writeln!(out, "{text}").and_then(|()| out.flush()) {
        tracing::warn!(banner = text, error = %e, "can't print banner");
    }
}
