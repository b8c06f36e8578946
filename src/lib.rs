//! blob2redis - 将对象存储中的键值文件复制到Redis缓存
//!
//! 源文件每次变更时，逐行读取并解析 `key,value` 记录，
//! 按批次写入目标缓存，并统计写入的键数量。

#![doc(html_root_url = "https://docs.rs/blob2redis/0.1.0")]

pub use tokio;

pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod loader;
pub mod source;
pub mod store;
pub mod telemetry;
pub mod utils;

// Re-export commonly used items
pub use config::Settings;
pub use handler::UpdateCacheHandler;
pub use loader::{BatchAccumulator, CacheBatchLoader, LoadResult};
pub use store::KeyValueStore;

/// blob2redis 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
