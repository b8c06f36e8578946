//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了基于Redis的目标存储客户端。

use super::KeyValueStore;
use crate::config::TargetConfig;
use crate::error::StoreError;
use crate::loader::Batch;
use crate::utils::redaction::redact_connection_string;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use secrecy::ExposeSecret;
use std::future::Future;
use tokio::time::{timeout, Duration};
use tracing::{debug, instrument};

/// Redis存储客户端
///
/// 持有一个 `ConnectionManager`，断线重连由 redis 客户端负责。
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
    command_timeout: Duration,
    target: String,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RedisStore({})", self.target)
    }
}

impl RedisStore {
    /// 按目标配置建立连接
    ///
    /// # 参数
    ///
    /// * `config` - 目标Redis配置
    ///
    /// # 返回值
    ///
    /// 返回已连接的存储客户端，连接超时返回 `StoreError::Timeout`
    #[instrument(skip(config), level = "info", name = "connect_redis_store")]
    pub async fn connect(config: &TargetConfig) -> Result<Self, StoreError> {
        let raw = config.connection_string.expose_secret();
        let connection_string = if config.enable_tls && raw.starts_with("redis://") {
            raw.replacen("redis://", "rediss://", 1)
        } else {
            raw.to_string()
        };
        let target = redact_connection_string(&connection_string);

        let client = Client::open(connection_string.as_str())?;
        let manager = timeout(
            Duration::from_millis(config.connection_timeout_ms),
            client.get_connection_manager(),
        )
        .await
        .map_err(|_| {
            StoreError::Timeout(format!(
                "Connection timed out after {}ms. Target: {}",
                config.connection_timeout_ms, target
            ))
        })??;

        debug!("Connected to {}", target);
        Ok(Self {
            manager,
            command_timeout: Duration::from_millis(config.command_timeout_ms),
            target,
        })
    }

    /// 脱敏后的目标地址
    pub fn target(&self) -> &str {
        &self.target
    }

    /// 检查连接是否正常
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        self.bounded("PING", async move {
            redis::cmd("PING").query_async::<String>(&mut conn).await
        })
        .await
        .map(|_| ())
    }

    async fn bounded<T, F>(&self, op: &str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match timeout(self.command_timeout, fut).await {
            Ok(res) => Ok(res?),
            Err(_) => Err(StoreError::Timeout(format!(
                "{} timed out after {}ms",
                op,
                self.command_timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    #[instrument(skip(self, value), level = "debug")]
    async fn write_one(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        self.bounded("SET", async move { conn.set::<_, _, ()>(key, value).await })
            .await
    }

    #[instrument(skip(self, batch), level = "debug", fields(key_count = batch.len()))]
    async fn batch_write(&self, batch: Batch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }

        // MULTI/EXEC: 批次内的键要么全部写入，要么全部不写入
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in &batch {
            pipe.set(key, value).ignore();
        }

        let mut conn = self.manager.clone();
        self.bounded("MULTI/EXEC", async move {
            pipe.query_async::<()>(&mut conn).await
        })
        .await
    }
}
