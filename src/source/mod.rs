//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了源对象接口和变更检测。
//!
//! 加载器只需要“每次调用给我一个可读的数据流”，
//! 变更如何被发现（这里是轮询对象指纹）与加载逻辑无关。

pub mod file;
pub mod watcher;

pub use file::FileSource;
pub use watcher::{ChangeHandler, ChangeWatcher, WatchState};

use crate::error::SourceError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::SystemTime;
use tokio::io::AsyncBufRead;

/// 源对象指纹，大小或修改时间不同即视为发生变更
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl Fingerprint {
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified.map(DateTime::<Utc>::from)
    }
}

/// 已打开的源数据流
pub struct SourceStream {
    pub reader: Box<dyn AsyncBufRead + Send + Unpin>,
    /// 字节数（已知时）
    pub size: Option<u64>,
}

impl std::fmt::Debug for SourceStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceStream")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// 源对象
#[async_trait]
pub trait SourceObject: Send + Sync {
    /// 对象名称，用于日志
    fn name(&self) -> &str;

    /// 当前指纹，对象不存在时返回 `None`
    async fn fingerprint(&self) -> Result<Option<Fingerprint>, SourceError>;

    /// 打开一个新的读取流
    async fn open(&self) -> Result<SourceStream, SourceError>;
}
