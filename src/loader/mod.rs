//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了流式批量加载器：逐行读取源数据流，解析键值对，
//! 按批次写入目标存储，并统计写入的键数量。
//!
//! 加载器本身不记录日志：它返回统计结果或抛出错误，由调用方负责上报。

pub mod accumulator;
pub mod parse;

pub use accumulator::{Batch, BatchAccumulator};

use crate::error::LoaderError;
use crate::store::KeyValueStore;
use serde::Serialize;
use std::num::NonZeroUsize;
use tokio::io::AsyncBufRead;

/// 默认批次大小
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(size) => size,
    None => unreachable!(),
};

/// 一次加载的统计结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadResult {
    /// 交给存储的键数量，按有效行计数
    pub keys_written: usize,
    /// 刷新（写入调用）次数
    pub batches_flushed: usize,
    /// 被跳过的行数（字段不足或无法解码）
    pub lines_skipped: usize,
}

/// 缓存批量加载器
///
/// 单任务顺序执行：一次处理一行，一次只有一个刷新在等待存储确认，
/// 内存中最多缓冲 `batch_size` 个键值对。
#[derive(Debug, Clone, Copy)]
pub struct CacheBatchLoader {
    batch_size: NonZeroUsize,
}

impl Default for CacheBatchLoader {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl CacheBatchLoader {
    pub fn new(batch_size: NonZeroUsize) -> Self {
        Self { batch_size }
    }

    pub fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    /// 读取整个数据流并写入存储
    ///
    /// # 参数
    ///
    /// * `source` - 源数据流
    /// * `store` - 目标存储客户端
    ///
    /// # 返回值
    ///
    /// 成功时返回加载统计；存储写入失败或读取失败时立即返回错误，
    /// 之前已刷新的批次保留在存储中。
    pub async fn load<R, S>(&self, mut source: R, store: &S) -> Result<LoadResult, LoaderError>
    where
        R: AsyncBufRead + Unpin,
        S: KeyValueStore + ?Sized,
    {
        let batch_size = self.batch_size.get();
        let mut accumulator = BatchAccumulator::with_capacity(batch_size);
        let mut result = LoadResult::default();
        let mut line = Vec::new();
        let mut first_line = true;

        while parse::read_line(&mut source, &mut line).await? {
            let raw = if first_line {
                first_line = false;
                parse::strip_bom(&line)
            } else {
                &line[..]
            };

            match parse::parse_raw_line(raw) {
                Some((key, value)) => accumulator.add(key, value),
                None => {
                    result.lines_skipped += 1;
                    continue;
                }
            }

            if accumulator.size() == batch_size {
                self.flush(&mut accumulator, store, &mut result).await?;
            }
        }

        if !accumulator.is_empty() {
            self.flush(&mut accumulator, store, &mut result).await?;
        }

        Ok(result)
    }

    async fn flush<S>(
        &self,
        accumulator: &mut BatchAccumulator,
        store: &S,
        result: &mut LoadResult,
    ) -> Result<(), LoaderError>
    where
        S: KeyValueStore + ?Sized,
    {
        let pairs = accumulator.size();
        let batch = accumulator.drain();

        if self.batch_size.get() == 1 {
            for (key, value) in &batch {
                store.write_one(key, value).await?;
            }
        } else {
            store.batch_write(batch).await?;
        }

        result.keys_written += pairs;
        result.batches_flushed += 1;
        Ok(())
    }
}
