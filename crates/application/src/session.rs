//! 显式传递的会话上下文
//!
//! 登录成功时创建，登出时销毁。取代环境全局的"当前用户"状态：
//! 所有需要会话的服务都以参数方式接收该上下文。

use domain::{AdminCapability, UserProfile};

/// 一次已认证会话的上下文。
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub profile: UserProfile,
    /// 管理员能力令牌；仅当档案邮箱与配置的管理员地址一致时存在。
    pub admin: Option<AdminCapability>,
}

impl SessionContext {
    pub fn new(profile: UserProfile, admin: Option<AdminCapability>) -> Self {
        Self { profile, admin }
    }

    pub fn is_admin(&self) -> bool {
        self.admin.is_some()
    }
}
