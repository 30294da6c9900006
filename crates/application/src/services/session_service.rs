//! 会话生命周期服务
//!
//! 登录流程：游客（匿名认证加自选用户名）、邮箱密码登录（显示名称取
//! 邮箱本地部分）、注册（自选用户名）、联合登录（提供方给出的名称，
//! 缺失时退化为 "Google User"）。
//!
//! 每次登录成功都会写入本地档案缓存、写入在线状态记录并注册断开钩子，
//! 然后构造显式的 `SessionContext` 交给调用方。认证失败以类型化错误
//! 上抛（内联展示，非致命）；在线状态和缓存的写入失败只记日志。

use std::sync::Arc;

use tracing::{info, warn};

use domain::{
    AccountKind, AdminCapability, DisplayName, PresenceRecord, UserEmail, UserProfile,
};

use crate::clock::Clock;
use crate::error::ApplicationResult;
use crate::repository::{AuthAccount, AuthGateway, FederatedProvider, PresenceStore, ProfileCache};
use crate::session::SessionContext;
use crate::subscription::SnapshotStream;

/// 会话服务的外部依赖。
pub struct SessionServiceDependencies {
    pub auth: Arc<dyn AuthGateway>,
    pub presence_store: Arc<dyn PresenceStore>,
    pub profile_cache: Arc<dyn ProfileCache>,
    pub clock: Arc<dyn Clock>,
    /// 配置的管理员邮箱地址，用于签发管理员能力令牌。
    pub admin_email: UserEmail,
}

/// 会话生命周期服务。
pub struct SessionService {
    auth: Arc<dyn AuthGateway>,
    presence_store: Arc<dyn PresenceStore>,
    profile_cache: Arc<dyn ProfileCache>,
    clock: Arc<dyn Clock>,
    admin_email: UserEmail,
}

impl SessionService {
    pub fn new(deps: SessionServiceDependencies) -> Self {
        Self {
            auth: deps.auth,
            presence_store: deps.presence_store,
            profile_cache: deps.profile_cache,
            clock: deps.clock,
            admin_email: deps.admin_email,
        }
    }

    /// 以游客身份加入：匿名登录，档案为一次性。
    pub async fn join_as_guest(&self, username: &str) -> ApplicationResult<SessionContext> {
        let name = DisplayName::parse(username)?;
        let account = self.auth.sign_in_anonymously().await?;
        let profile = UserProfile::guest(account.uid, name);
        Ok(self.establish(profile).await)
    }

    /// 邮箱密码登录。显示名称取邮箱的本地部分。
    pub async fn sign_in(&self, email: &str, password: &str) -> ApplicationResult<SessionContext> {
        let email = UserEmail::parse(email)?;
        let account = self.auth.sign_in(&email, password).await?;
        let email = account.email.unwrap_or(email);
        let profile = UserProfile::registered_from_email(account.uid, email);
        Ok(self.establish(profile).await)
    }

    /// 注册新账户，使用自选的用户名。
    pub async fn create_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ApplicationResult<SessionContext> {
        let name = DisplayName::parse(username)?;
        let email = UserEmail::parse(email)?;
        let account = self.auth.sign_up(&email, password).await?;
        let email = account.email.unwrap_or(email);
        let profile = UserProfile::registered(account.uid, name, email);
        Ok(self.establish(profile).await)
    }

    /// 联合登录。显示名称取提供方给出的名称。
    pub async fn sign_in_with_provider(
        &self,
        provider: FederatedProvider,
    ) -> ApplicationResult<SessionContext> {
        let account = self.auth.sign_in_federated(provider).await?;
        let name = account.display_name.clone().unwrap_or_else(|| {
            DisplayName::parse("Google User").unwrap_or_else(|_| DisplayName::unknown())
        });
        let profile = UserProfile {
            id: account.uid,
            name,
            email: account.email,
            kind: AccountKind::Registered,
        };
        Ok(self.establish(profile).await)
    }

    /// 在会话观察者首次触发之前，从本地缓存恢复上次已知的档案。
    pub async fn restore(&self) -> ApplicationResult<Option<SessionContext>> {
        let profile = self.profile_cache.load().await?;
        Ok(profile.map(|profile| self.context(profile)))
    }

    /// 登出：尽力写入离线状态、退出认证会话、清除本地缓存。
    /// 各步骤的失败只记日志，不会让登出失败。会话上下文在此销毁。
    pub async fn sign_out(&self, session: SessionContext) -> ApplicationResult<()> {
        let profile = session.profile;
        let record = PresenceRecord::offline(
            profile.name.clone(),
            profile.is_guest(),
            self.clock.now(),
        );
        if let Err(err) = self.presence_store.set(&profile.id, &record).await {
            warn!(user_id = %profile.id, error = %err, "登出时写入离线状态失败");
        }
        if let Err(err) = self.auth.sign_out().await {
            warn!(user_id = %profile.id, error = %err, "退出认证会话失败");
        }
        if let Err(err) = self.profile_cache.clear().await {
            warn!(error = %err, "清除本地档案缓存失败");
        }
        info!(user_id = %profile.id, "会话已结束");
        Ok(())
    }

    /// 删除当前账户：移除在线状态记录、删除认证账户、清除本地缓存。
    pub async fn delete_account(&self, session: SessionContext) -> ApplicationResult<()> {
        let profile = session.profile;
        self.presence_store.remove(&profile.id).await?;
        self.auth.delete_account().await?;
        self.profile_cache.clear().await?;
        info!(user_id = %profile.id, "账户已删除");
        Ok(())
    }

    /// 认证状态观察者。
    pub fn observe(&self) -> SnapshotStream<Option<AuthAccount>> {
        self.auth.observe()
    }

    fn context(&self, profile: UserProfile) -> SessionContext {
        let admin = AdminCapability::issue(&profile, &self.admin_email);
        SessionContext::new(profile, admin)
    }

    /// 登录成功后的固定动作：缓存档案、上线、注册断开钩子。
    async fn establish(&self, profile: UserProfile) -> SessionContext {
        if let Err(err) = self.profile_cache.store(&profile).await {
            warn!(user_id = %profile.id, error = %err, "写入本地档案缓存失败");
        }

        let online = PresenceRecord::online(
            profile.name.clone(),
            profile.is_guest(),
            self.clock.now(),
        );
        if let Err(err) = self.presence_store.set(&profile.id, &online).await {
            warn!(user_id = %profile.id, error = %err, "写入在线状态失败");
        }

        // 断开钩子的 lastSeen 留空，由托管后端在触发时填入服务器时间。
        let on_disconnect = PresenceRecord {
            name: profile.name.clone(),
            is_guest: profile.is_guest(),
            online: false,
            last_seen: None,
        };
        if let Err(err) = self
            .presence_store
            .set_on_disconnect(&profile.id, &on_disconnect)
            .await
        {
            warn!(user_id = %profile.id, error = %err, "注册断开钩子失败");
        }

        let context = self.context(profile);
        info!(
            user_id = %context.profile.id,
            admin = context.is_admin(),
            "会话已建立"
        );
        context
    }
}
