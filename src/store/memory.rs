//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 内存存储实现，用于测试和 `--dry-run`。

use super::KeyValueStore;
use crate::error::StoreError;
use crate::loader::Batch;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Mutex;

/// 一次刷新调用的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushRecord {
    One { key: String, value: String },
    Batch(Batch),
}

impl FlushRecord {
    /// 本次刷新写入的映射
    pub fn entries(&self) -> Batch {
        match self {
            FlushRecord::One { key, value } => HashMap::from([(key.clone(), value.clone())]),
            FlushRecord::Batch(batch) => batch.clone(),
        }
    }
}

/// 基于 DashMap 的内存键值存储
///
/// 记录每一次写入调用，便于断言刷新次数和批次内容。
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: DashMap<String, String>,
    flushes: Mutex<Vec<FlushRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.data.get(key).map(|v| v.value().clone())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 当前存储内容的快照
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.data
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    /// 按调用顺序返回所有刷新记录
    pub fn flushes(&self) -> Vec<FlushRecord> {
        self.flushes
            .lock()
            .map(|f| f.to_vec())
            .unwrap_or_default()
    }

    fn record(&self, record: FlushRecord) -> Result<(), StoreError> {
        self.flushes
            .lock()
            .map_err(|_| StoreError::Rejected("flush log poisoned".to_string()))?
            .push(record);
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn write_one(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.data.insert(key.to_string(), value.to_string());
        self.record(FlushRecord::One {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    async fn batch_write(&self, batch: Batch) -> Result<(), StoreError> {
        for (key, value) in &batch {
            self.data.insert(key.clone(), value.clone());
        }
        self.record(FlushRecord::Batch(batch))
    }
}
