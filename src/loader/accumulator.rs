//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了批次累加器，在刷新前缓冲键值对。

use std::collections::HashMap;

/// 一个批次：键唯一，重复键后写覆盖先写
pub type Batch = HashMap<String, String>;

/// 批次累加器
///
/// `size` 统计自上次 `drain` 以来加入的键值对数量（按行计数），
/// 因此同一批次内的重复键仍然各计一次，而映射中只保留最后一个值。
#[derive(Debug, Default)]
pub struct BatchAccumulator {
    batch: Batch,
    pairs: usize,
}

impl BatchAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预分配容量的累加器
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            batch: HashMap::with_capacity(capacity),
            pairs: 0,
        }
    }

    /// 加入一个键值对，已存在的键被静默覆盖
    pub fn add(&mut self, key: String, value: String) {
        self.batch.insert(key, value);
        self.pairs += 1;
    }

    /// 当前批次的键值对数量
    pub fn size(&self) -> usize {
        self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }

    /// 取出当前批次并重置为空
    pub fn drain(&mut self) -> Batch {
        self.pairs = 0;
        let capacity = self.batch.capacity();
        std::mem::replace(&mut self.batch, HashMap::with_capacity(capacity))
    }
}
