//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块是缓存更新服务的入口点。

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    blob2redis::telemetry::init_tracing("blob2redis");
    blob2redis::cli::run().await
}
