//! 基础设施层实现。
//!
//! 提供托管后端的本地替身适配器（实时键值存储、认证网关、公告文档
//! 集合、本地档案缓存）和配置加载，实现应用层定义的端口。

pub mod auth;
pub mod builder;
pub mod config;
pub mod notices;
pub mod profile_cache;
pub mod realtime;

pub use auth::MemoryAuthGateway;
pub use builder::LocalBackend;
pub use config::{AdminConfig, AppConfig, CacheConfig, ChatConfig};
pub use notices::MemoryNoticeStore;
pub use profile_cache::{JsonFileProfileCache, MemoryProfileCache};
pub use realtime::{MemoryRealtimeDb, RealtimeMessageStore, RealtimePresenceStore};
