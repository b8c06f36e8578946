//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了配置查询接口和运行设置的解析逻辑。
//!
//! 配置以只读键查询的形式提供（环境变量、TOML 文件或内存映射），
//! 在调用时解析为显式参数传入加载器，核心不读取任何全局状态。

use crate::error::ConfigError;
use crate::loader::DEFAULT_BATCH_SIZE;
use secrecy::SecretString;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 源对象路径
pub const SOURCE_BLOB_KEY: &str = "SourceBlob";
/// 目标Redis连接字符串
pub const TARGET_CONNECTION_KEY: &str = "TargetRedisCacheConnection";
/// 批次大小
pub const BATCH_SIZE_KEY: &str = "BatchSize";
/// 轮询间隔（毫秒）
pub const POLL_INTERVAL_KEY: &str = "PollIntervalMs";
/// 启动时是否立即加载一次
pub const TRIGGER_ON_START_KEY: &str = "TriggerOnStart";
/// 是否强制使用 TLS 连接
pub const ENABLE_TLS_KEY: &str = "EnableTls";
/// 连接超时（毫秒）
pub const CONNECTION_TIMEOUT_KEY: &str = "ConnectionTimeoutMs";
/// 命令超时（毫秒）
pub const COMMAND_TIMEOUT_KEY: &str = "CommandTimeoutMs";

/// 只读配置查询
pub trait ConfigLookup: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

impl ConfigLookup for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// 从进程环境变量读取配置
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvLookup;

impl ConfigLookup for EnvLookup {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// 从扁平 TOML 表读取配置
///
/// 字符串原样返回，其余标量（整数、布尔）转换为文本形式。
#[derive(Debug, Default, Clone)]
pub struct TomlLookup {
    table: toml::Table,
}

impl TomlLookup {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            table: content.parse::<toml::Table>()?,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }
}

impl ConfigLookup for TomlLookup {
    fn get(&self, key: &str) -> Option<String> {
        match self.table.get(key)? {
            toml::Value::String(s) => Some(s.clone()),
            toml::Value::Integer(i) => Some(i.to_string()),
            toml::Value::Float(f) => Some(f.to_string()),
            toml::Value::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// 分层配置：按顺序查询，第一个命中者生效
#[derive(Default)]
pub struct LayeredLookup {
    layers: Vec<Box<dyn ConfigLookup>>,
}

impl LayeredLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, layer: impl ConfigLookup + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }
}

impl ConfigLookup for LayeredLookup {
    fn get(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }
}

/// 解析批次大小
///
/// 缺失、无法解析或非正数时回退到默认值 1000，而不是报错。
pub fn resolve_batch_size(raw: Option<&str>) -> NonZeroUsize {
    raw.and_then(|s| s.trim().parse::<NonZeroUsize>().ok())
        .unwrap_or(DEFAULT_BATCH_SIZE)
}

/// 源对象配置
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// 源对象路径
    pub path: PathBuf,
    /// 变更检测轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 启动时是否立即加载一次
    pub trigger_on_start: bool,
}

/// 目标Redis配置
#[derive(Debug, Clone)]
pub struct TargetConfig {
    /// 连接字符串
    pub connection_string: SecretString,
    /// 连接超时时间（毫秒）
    pub connection_timeout_ms: u64,
    /// 命令执行超时时间（毫秒）
    pub command_timeout_ms: u64,
    /// 是否启用 TLS
    pub enable_tls: bool,
}

impl TargetConfig {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: SecretString::new(connection_string.into().into_boxed_str()),
            connection_timeout_ms: 5000,
            command_timeout_ms: 3000,
            enable_tls: false,
        }
    }

    /// 从配置查询构建目标配置，`TargetRedisCacheConnection` 为必需项
    pub fn from_lookup(lookup: &dyn ConfigLookup) -> Result<Self, ConfigError> {
        let mut target = Self::new(required(lookup, TARGET_CONNECTION_KEY)?);
        target.connection_timeout_ms =
            optional(lookup, CONNECTION_TIMEOUT_KEY)?.unwrap_or(target.connection_timeout_ms);
        target.command_timeout_ms =
            optional(lookup, COMMAND_TIMEOUT_KEY)?.unwrap_or(target.command_timeout_ms);
        target.enable_tls = optional(lookup, ENABLE_TLS_KEY)?.unwrap_or(false);
        Ok(target)
    }
}

/// 运行设置
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: SourceConfig,
    pub target: TargetConfig,
    pub batch_size: NonZeroUsize,
}

impl Settings {
    /// 从配置查询构建设置
    ///
    /// `SourceBlob` 与 `TargetRedisCacheConnection` 为必需项；
    /// `BatchSize` 不合法时回退默认值，其他数值项不合法时报错。
    pub fn from_lookup(lookup: &dyn ConfigLookup) -> Result<Self, ConfigError> {
        let settings = Self {
            source: SourceConfig {
                path: PathBuf::from(required(lookup, SOURCE_BLOB_KEY)?),
                poll_interval_ms: optional(lookup, POLL_INTERVAL_KEY)?.unwrap_or(5000),
                trigger_on_start: optional(lookup, TRIGGER_ON_START_KEY)?.unwrap_or(true),
            },
            target: TargetConfig::from_lookup(lookup)?,
            batch_size: resolve_batch_size(lookup.get(BATCH_SIZE_KEY).as_deref()),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// 验证设置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.poll_interval_ms == 0 {
            return Err(invalid(POLL_INTERVAL_KEY, "must be greater than zero"));
        }
        if self.target.connection_timeout_ms == 0 {
            return Err(invalid(CONNECTION_TIMEOUT_KEY, "must be greater than zero"));
        }
        if self.target.command_timeout_ms == 0 {
            return Err(invalid(COMMAND_TIMEOUT_KEY, "must be greater than zero"));
        }
        Ok(())
    }
}

fn required(lookup: &dyn ConfigLookup, key: &str) -> Result<String, ConfigError> {
    lookup
        .get(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing(key.to_string()))
}

fn optional<T>(lookup: &dyn ConfigLookup, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup
        .get(key)
        .map(|raw| raw.trim().parse::<T>().map_err(|e| invalid(key, &e.to_string())))
        .transpose()
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
