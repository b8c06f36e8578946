//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了一次缓存更新调用的边界层：打开源数据流、运行加载器，
//! 并负责记录开始、批次大小、完成数量和终止错误。

use crate::error::Result;
use crate::loader::{CacheBatchLoader, LoadResult};
use crate::source::{ChangeHandler, SourceObject};
use crate::store::KeyValueStore;
use async_trait::async_trait;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// 缓存更新处理器
///
/// 每次调用相互独立，只共享注入的存储客户端。
pub struct UpdateCacheHandler<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    loader: CacheBatchLoader,
}

impl<S: KeyValueStore + ?Sized> UpdateCacheHandler<S> {
    pub fn new(store: Arc<S>, batch_size: NonZeroUsize) -> Self {
        Self {
            store,
            loader: CacheBatchLoader::new(batch_size),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// 对源对象执行一次完整加载
    ///
    /// # 返回值
    ///
    /// 返回加载统计；失败时错误已被记录，同时返回给调用方
    pub async fn handle(&self, source: &dyn SourceObject) -> Result<LoadResult> {
        let invocation_id = Uuid::new_v4();
        let span = info_span!("update_cache", %invocation_id, source = source.name());

        async {
            let result = self.run(source).await;
            if let Err(e) = &result {
                error!(
                    "Error occurred while processing source changes. Error Info: {}",
                    e
                );
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, source: &dyn SourceObject) -> Result<LoadResult> {
        let stream = source.open().await?;
        match stream.size {
            Some(size) => info!("Data changed on source - {} \t Size: {} Bytes", source.name(), size),
            None => info!("Data changed on source - {}", source.name()),
        }
        info!("Processing batch size - {}", self.loader.batch_size());

        let started = Instant::now();
        let result = self
            .loader
            .load(stream.reader, &*self.store)
            .await?;

        info!(
            batches = result.batches_flushed,
            skipped_lines = result.lines_skipped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Process complete. {} keys written to cache",
            result.keys_written
        );
        Ok(result)
    }
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> ChangeHandler for UpdateCacheHandler<S> {
    async fn on_change(&self, source: &dyn SourceObject) {
        // 错误已在 handle 中记录，监视器继续等待下一次变更
        let _ = self.handle(source).await;
    }
}
