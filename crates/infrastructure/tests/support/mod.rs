//! 流程测试公共支撑

use std::sync::Arc;

use application::{SessionService, SystemClock};
use infrastructure::{AppConfig, LocalBackend};

/// 初始化测试日志输出（RUST_LOG 控制，重复调用安全）
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// 默认配置的全内存后端
pub fn backend() -> LocalBackend {
    init_tracing();
    LocalBackend::in_memory(Arc::new(SystemClock))
}

pub fn config() -> AppConfig {
    AppConfig::default()
}

/// 默认配置下的会话服务
pub fn session_service(backend: &LocalBackend) -> SessionService {
    backend
        .session_service(&config())
        .expect("session service from default config")
}
