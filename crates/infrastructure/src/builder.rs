//! 本地后端装配
//!
//! 把内存适配器装配成一组端口对象，供嵌入方和流程测试使用。
//! 真实部署中这些端口由托管后端的 SDK 适配层提供。

use std::sync::Arc;

use application::{
    AuthGateway, Clock, MessageStore, NoticeStore, PresenceStore, ProfileCache, SessionService,
    SessionServiceDependencies,
};

use crate::auth::MemoryAuthGateway;
use crate::config::AppConfig;
use crate::notices::MemoryNoticeStore;
use crate::profile_cache::{JsonFileProfileCache, MemoryProfileCache};
use crate::realtime::{MemoryRealtimeDb, RealtimeMessageStore, RealtimePresenceStore};

/// 装配完成的本地后端。
pub struct LocalBackend {
    pub realtime: Arc<MemoryRealtimeDb>,
    pub presence: Arc<RealtimePresenceStore>,
    pub messages: Arc<RealtimeMessageStore>,
    pub notices: Arc<MemoryNoticeStore>,
    pub auth: Arc<MemoryAuthGateway>,
    pub profile_cache: Arc<dyn ProfileCache>,
    clock: Arc<dyn Clock>,
}

impl LocalBackend {
    /// 按配置装配：档案缓存落在配置的文件路径上。
    pub fn connect(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = Arc::new(JsonFileProfileCache::new(config.cache.profile_path.clone()));
        Self::build(cache, clock)
    }

    /// 全内存装配，用于测试。
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::build(Arc::new(MemoryProfileCache::new()), clock)
    }

    fn build(profile_cache: Arc<dyn ProfileCache>, clock: Arc<dyn Clock>) -> Self {
        let realtime = Arc::new(MemoryRealtimeDb::new(clock.clone()));
        Self {
            presence: Arc::new(RealtimePresenceStore::new(realtime.clone())),
            messages: Arc::new(RealtimeMessageStore::new(realtime.clone())),
            notices: Arc::new(MemoryNoticeStore::new(clock.clone())),
            auth: Arc::new(MemoryAuthGateway::new()),
            profile_cache,
            realtime,
            clock,
        }
    }

    pub fn presence_store(&self) -> Arc<dyn PresenceStore> {
        self.presence.clone()
    }

    pub fn message_store(&self) -> Arc<dyn MessageStore> {
        self.messages.clone()
    }

    pub fn notice_store(&self) -> Arc<dyn NoticeStore> {
        self.notices.clone()
    }

    pub fn auth_gateway(&self) -> Arc<dyn AuthGateway> {
        self.auth.clone()
    }

    /// 按配置的管理员邮箱构建会话服务。
    pub fn session_service(&self, config: &AppConfig) -> anyhow::Result<SessionService> {
        Ok(SessionService::new(SessionServiceDependencies {
            auth: self.auth_gateway(),
            presence_store: self.presence_store(),
            profile_cache: self.profile_cache.clone(),
            clock: self.clock.clone(),
            admin_email: config.admin_email()?,
        }))
    }

    /// 模拟客户端非正常断开，触发已注册的断开钩子。
    pub fn simulate_disconnect(&self) {
        self.realtime.simulate_disconnect();
    }
}
