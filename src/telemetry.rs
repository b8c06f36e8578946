//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了日志和链路追踪的初始化。

use opentelemetry::global;
use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::trace::TracerProvider as SdkTracerProvider;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// 默认日志级别，`RUST_LOG` 未设置时生效
pub const DEFAULT_LOG_FILTER: &str = "info";

/// 初始化 tracing
///
/// 此函数应该在进程启动时调用一次：安装控制台日志层（受 `RUST_LOG` 控制）
/// 和 OpenTelemetry 层。未配置导出器时 tracer provider 不导出任何数据。
///
/// # 参数
///
/// * `service_name` - 服务名称
pub fn init_tracing(service_name: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let provider = SdkTracerProvider::builder().build();
    global::set_tracer_provider(provider.clone());
    let tracer = provider.tracer(service_name.to_string());

    let subscriber = Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_opentelemetry::layer().with_tracer(tracer));

    // 已有全局 subscriber（例如测试中）时保持原样
    let _ = tracing::subscriber::set_global_default(subscriber);
}
