//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了目标键值存储的客户端接口及其实现。

pub mod memory;
pub mod redis_store;

use crate::error::StoreError;
use crate::loader::Batch;
use async_trait::async_trait;
use std::sync::Arc;

pub use self::memory::InMemoryStore;
pub use self::redis_store::RedisStore;

/// 键值存储客户端
///
/// 加载器只依赖这两个写操作，连接的建立与释放由调用方负责。
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 写入单个键值对
    async fn write_one(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// 批量写入一组唯一键，传输或服务端错误时返回错误
    async fn batch_write(&self, batch: Batch) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn write_one(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write_one(key, value).await
    }

    async fn batch_write(&self, batch: Batch) -> Result<(), StoreError> {
        (**self).batch_write(batch).await
    }
}
