//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 源对象变更监视集成测试

use async_trait::async_trait;
use blob2redis::source::{ChangeHandler, ChangeWatcher, FileSource, SourceObject};
use blob2redis::store::InMemoryStore;
use blob2redis::UpdateCacheHandler;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[path = "../common/mod.rs"]
mod common;

use common::{setup_logging, write_source};

const POLL: Duration = Duration::from_millis(20);

#[derive(Default)]
struct CountingHandler {
    calls: AtomicUsize,
}

#[async_trait]
impl ChangeHandler for CountingHandler {
    async fn on_change(&self, _source: &dyn SourceObject) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..250 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// 启动时加载一次，内容不变时不重复加载，变更后重新加载
#[tokio::test]
async fn test_watcher_triggers_on_start_and_change() {
    setup_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "keys.csv", "a,1\n");

    let handler = Arc::new(CountingHandler::default());
    let watcher = ChangeWatcher::new(Arc::new(FileSource::new(&path)), POLL);
    let shutdown = CancellationToken::new();

    let task = {
        let handler = handler.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move { watcher.run(&*handler, shutdown).await })
    };

    assert!(wait_until(|| handler.calls.load(Ordering::SeqCst) == 1).await);
    tokio::time::sleep(POLL * 5).await;
    assert_eq!(handler.calls.load(Ordering::SeqCst), 1);

    // 改变长度，保证指纹不同
    write_source(&dir, "keys.csv", "a,1\nb,2\n");
    assert!(wait_until(|| handler.calls.load(Ordering::SeqCst) == 2).await);

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("watcher did not stop")
        .unwrap();
}

/// 关闭启动加载时，首次观测只作为基线
#[tokio::test]
async fn test_watcher_baseline_without_trigger_on_start() {
    setup_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "keys.csv", "a,1\n");

    let handler = Arc::new(CountingHandler::default());
    let watcher =
        ChangeWatcher::new(Arc::new(FileSource::new(&path)), POLL).trigger_on_start(false);
    let shutdown = CancellationToken::new();

    let task = {
        let handler = handler.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move { watcher.run(&*handler, shutdown).await })
    };

    tokio::time::sleep(POLL * 5).await;
    assert_eq!(handler.calls.load(Ordering::SeqCst), 0);

    write_source(&dir, "keys.csv", "a,1\nb,2\nc,3\n");
    assert!(wait_until(|| handler.calls.load(Ordering::SeqCst) == 1).await);

    shutdown.cancel();
    task.await.unwrap();
}

/// 对象创建后被加载到存储中
#[tokio::test]
async fn test_watcher_loads_created_object() {
    setup_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("late.csv");

    let store = Arc::new(InMemoryStore::new());
    let handler = Arc::new(UpdateCacheHandler::new(
        store.clone(),
        NonZeroUsize::new(2).unwrap(),
    ));
    let watcher = ChangeWatcher::new(Arc::new(FileSource::new(&path)), POLL);
    let shutdown = CancellationToken::new();

    let task = {
        let handler = handler.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move { watcher.run(&*handler, shutdown).await })
    };

    tokio::time::sleep(POLL * 3).await;
    assert!(store.is_empty());

    write_source(&dir, "late.csv", "x,1\ny,2\nz,3\n");
    assert!(wait_until(|| store.len() == 3).await);
    assert_eq!(store.get("y").as_deref(), Some("2"));

    shutdown.cancel();
    task.await.unwrap();
}
