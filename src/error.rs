//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了加载流程各环节的错误类型。

use std::path::PathBuf;
use thiserror::Error;

/// 存储客户端错误
///
/// 由 `KeyValueStore` 的写入操作抛出，加载器原样向上传播
#[derive(Error, Debug)]
pub enum StoreError {
    /// Redis错误
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// 超时错误
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// 存储端拒绝写入
    #[error("Store rejected write: {0}")]
    Rejected(String),
}

/// 加载器错误
///
/// 行级解析问题不会出现在这里，它们在加载器内部被吸收
#[derive(Error, Debug)]
pub enum LoaderError {
    /// 批量写入失败，已刷新的批次保留在存储中
    #[error("Store write failed: {0}")]
    Store(#[from] StoreError),

    /// 源数据流读取失败
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 缺少必需的配置项
    #[error("Missing configuration value: {0}")]
    Missing(String),

    /// 配置项取值无效
    #[error("Invalid configuration value for '{key}': {reason}")]
    Invalid { key: String, reason: String },

    /// 配置文件读取失败
    #[error("Failed to read configuration file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件解析失败
    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// 源对象错误
#[derive(Error, Debug)]
pub enum SourceError {
    /// 源对象不存在
    #[error("Source object not found: {0}")]
    NotFound(PathBuf),

    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 顶层错误类型
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, Error>;
