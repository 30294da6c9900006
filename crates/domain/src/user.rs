use serde::{Deserialize, Serialize};

use crate::value_objects::{DisplayName, UserEmail, UserId};

/// 账户类型：匿名游客或注册用户。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    Guest,
    Registered,
}

/// 已登录用户的本地档案。
///
/// 游客档案与一次性认证会话一一对应；注册用户档案跨会话存在。
/// 登录成功时创建，登出时销毁（并清除本地缓存）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: DisplayName,
    pub email: Option<UserEmail>,
    pub kind: AccountKind,
}

impl UserProfile {
    pub fn guest(id: UserId, name: DisplayName) -> Self {
        Self {
            id,
            name,
            email: None,
            kind: AccountKind::Guest,
        }
    }

    pub fn registered(id: UserId, name: DisplayName, email: UserEmail) -> Self {
        Self {
            id,
            name,
            email: Some(email),
            kind: AccountKind::Registered,
        }
    }

    /// 没有显式用户名时，以邮箱本地部分作为显示名称构建注册档案。
    pub fn registered_from_email(id: UserId, email: UserEmail) -> Self {
        let name = DisplayName::parse(email.local_part())
            .unwrap_or_else(|_| DisplayName::unknown());
        Self::registered(id, name, email)
    }

    pub fn is_guest(&self) -> bool {
        self.kind == AccountKind::Guest
    }
}

/// 管理员能力令牌。
///
/// 仅当档案邮箱与配置的管理员地址一致时签发，审核操作以持有该令牌为前提。
/// 注意：这只是客户端的 UI 提示，真正的强制执行在托管后端的访问规则里，
/// 本层无法替代。
#[derive(Debug, Clone, Copy)]
pub struct AdminCapability(());

impl AdminCapability {
    /// 对比档案邮箱与管理员地址，匹配时签发令牌。
    pub fn issue(profile: &UserProfile, admin_email: &UserEmail) -> Option<Self> {
        match &profile.email {
            Some(email) if email == admin_email => Some(Self(())),
            _ => None,
        }
    }
}
