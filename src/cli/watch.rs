//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 监视命令：源对象变更时重新加载整个文件。

use super::{config_lookup, WatchArgs};
use crate::config::Settings;
use crate::handler::UpdateCacheHandler;
use crate::source::{ChangeWatcher, FileSource};
use crate::store::RedisStore;
use crate::utils::redaction::RedactedConnection;
use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub async fn execute(args: &WatchArgs) -> Result<()> {
    let lookup = config_lookup(args.config.as_deref())?;
    let settings = Settings::from_lookup(&lookup).context("Invalid configuration")?;

    let target = RedactedConnection(settings.target.connection_string.expose_secret());
    tracing::info!(%target, batch_size = settings.batch_size.get(), "Starting watcher");

    let store = RedisStore::connect(&settings.target)
        .await
        .with_context(|| format!("Failed to connect to {}", target))?;
    tracing::info!(redis = store.target(), "Connected to target cache");
    let handler = UpdateCacheHandler::new(Arc::new(store), settings.batch_size);

    let source = Arc::new(FileSource::new(settings.source.path.clone()));
    let watcher = ChangeWatcher::new(source, Duration::from_millis(settings.source.poll_interval_ms))
        .trigger_on_start(settings.source.trigger_on_start);

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
        }
        signal.cancel();
    });

    watcher.run(&handler, shutdown).await;
    Ok(())
}
