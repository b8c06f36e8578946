//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了源对象变更监视器：定期轮询对象指纹，变更时调用处理器。

use super::{Fingerprint, SourceObject};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 变更处理器
#[async_trait]
pub trait ChangeHandler: Send + Sync {
    /// 源对象发生变更时调用，调用期间监视器不会再次轮询
    async fn on_change(&self, source: &dyn SourceObject);
}

/// 监视状态
///
/// 记录上一次看到的指纹，判断新的观测是否构成一次变更。
#[derive(Debug, Clone)]
pub struct WatchState {
    last_seen: Option<Fingerprint>,
    initialized: bool,
    trigger_on_start: bool,
}

impl WatchState {
    pub fn new(trigger_on_start: bool) -> Self {
        Self {
            last_seen: None,
            initialized: false,
            trigger_on_start,
        }
    }

    /// 记录一次观测，返回是否应当触发加载
    ///
    /// 首次观测仅在 `trigger_on_start` 时触发；对象消失后再次出现视为变更。
    pub fn observe(&mut self, current: Option<Fingerprint>) -> bool {
        let first = !self.initialized;
        self.initialized = true;

        let changed = current.is_some() && current != self.last_seen;
        self.last_seen = current;

        changed && (!first || self.trigger_on_start)
    }
}

/// 源对象变更监视器
pub struct ChangeWatcher {
    source: Arc<dyn SourceObject>,
    poll_interval: Duration,
    trigger_on_start: bool,
}

impl ChangeWatcher {
    pub fn new(source: Arc<dyn SourceObject>, poll_interval: Duration) -> Self {
        Self {
            source,
            poll_interval,
            trigger_on_start: true,
        }
    }

    pub fn trigger_on_start(mut self, enabled: bool) -> Self {
        self.trigger_on_start = enabled;
        self
    }

    /// 运行监视循环，直到 `shutdown` 被取消
    ///
    /// 取消只在两次调用之间生效，正在进行的加载会运行至结束。
    pub async fn run(&self, handler: &dyn ChangeHandler, shutdown: CancellationToken) {
        let mut state = WatchState::new(self.trigger_on_start);
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            source = self.source.name(),
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Watching source object for changes"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(source = self.source.name(), "Watcher stopped");
                    break;
                }
                _ = interval.tick() => {}
            }

            let current = match self.source.fingerprint().await {
                Ok(current) => current,
                Err(e) => {
                    warn!(source = self.source.name(), "Failed to stat source object: {}", e);
                    continue;
                }
            };

            if current.is_none() {
                debug!(source = self.source.name(), "Source object not present");
            }

            if state.observe(current) {
                self.source_changed(handler, current).await;
            }
        }
    }

    async fn source_changed(&self, handler: &dyn ChangeHandler, current: Option<Fingerprint>) {
        if let Some(modified) = current.and_then(|fp| fp.modified_at()) {
            debug!(source = self.source.name(), %modified, "Source object changed");
        }
        handler.on_change(self.source.as_ref()).await;
    }
}
