//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 单次加载命令。

use super::{config_lookup, LoadArgs};
use crate::config::{
    resolve_batch_size, ConfigLookup, TargetConfig, BATCH_SIZE_KEY, SOURCE_BLOB_KEY,
};
use crate::handler::UpdateCacheHandler;
use crate::loader::LoadResult;
use crate::source::FileSource;
use crate::store::{InMemoryStore, KeyValueStore, RedisStore};
use crate::utils::redaction::RedactedConnection;
use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use std::sync::Arc;

pub async fn execute(args: &LoadArgs) -> Result<()> {
    let lookup = config_lookup(args.config.as_deref())?;

    let path = args
        .file
        .clone()
        .or_else(|| lookup.get(SOURCE_BLOB_KEY).map(Into::into))
        .with_context(|| format!("No source file given and {} is not set", SOURCE_BLOB_KEY))?;
    let batch_size = resolve_batch_size(
        args.batch_size
            .clone()
            .or_else(|| lookup.get(BATCH_SIZE_KEY))
            .as_deref(),
    );
    let source = FileSource::new(path);

    let result = if args.dry_run {
        let store = Arc::new(InMemoryStore::new());
        let result = run(store.clone(), batch_size, &source).await?;
        tracing::info!("Dry run: {} distinct keys held in memory", store.len());
        result
    } else {
        let target = TargetConfig::from_lookup(&lookup)?;
        let store = RedisStore::connect(&target)
            .await
            .with_context(|| {
                format!(
                    "Failed to connect to {}",
                    RedactedConnection(target.connection_string.expose_secret())
                )
            })?;
        tracing::info!(redis = store.target(), "Connected to target cache");
        run(Arc::new(store), batch_size, &source).await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{} keys written to cache", result.keys_written);
    }
    Ok(())
}

async fn run<S: KeyValueStore>(
    store: Arc<S>,
    batch_size: std::num::NonZeroUsize,
    source: &FileSource,
) -> Result<LoadResult> {
    let handler = UpdateCacheHandler::new(store, batch_size);
    handler
        .handle(source)
        .await
        .with_context(|| format!("Failed to load {}", source.path().display()))
}
