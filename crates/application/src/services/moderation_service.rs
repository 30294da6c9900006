//! 管理员审核操作
//!
//! 所有操作都要求调用方持有 `AdminCapability` 令牌，没有令牌的代码
//! 无法构造调用。令牌只是客户端闸门，真正的强制执行在托管后端的
//! 访问规则里。批量删除还额外要求一个显式的交互确认步骤。
//!
//! 操作对调用方是"发出即忘"的：失败通过返回值和日志报告给操作员，
//! 绝不终止会话。

use std::sync::Arc;

use tracing::{error, warn};

use domain::{AdminCapability, ChatScope, MessageId, UserId};

use crate::error::ApplicationResult;
use crate::repository::{MessageStore, PresenceStore};

/// 破坏性批量操作的交互确认凭证。
///
/// 由确认对话框的"确定"分支构造；没有确认凭证无法调用批量删除。
#[derive(Debug, Clone, Copy)]
pub struct Confirmation(());

impl Confirmation {
    /// 操作员已在交互确认步骤中确认。
    pub fn confirmed() -> Self {
        Self(())
    }
}

/// 审核操作服务。
pub struct ModerationService {
    presence_store: Arc<dyn PresenceStore>,
    message_store: Arc<dyn MessageStore>,
}

impl ModerationService {
    pub fn new(
        presence_store: Arc<dyn PresenceStore>,
        message_store: Arc<dyn MessageStore>,
    ) -> Self {
        Self {
            presence_store,
            message_store,
        }
    }

    /// 删除一个用户的在线状态记录。删除不存在的标识是空操作。
    pub async fn remove_user(
        &self,
        _admin: &AdminCapability,
        user_id: &UserId,
    ) -> ApplicationResult<()> {
        if let Err(err) = self.presence_store.remove(user_id).await {
            error!(user_id = %user_id, error = %err, "删除用户在线状态失败");
            return Err(err.into());
        }
        Ok(())
    }

    /// 删除一个作用域内的一条消息。删除不存在的标识是空操作。
    pub async fn remove_message(
        &self,
        _admin: &AdminCapability,
        scope: &ChatScope,
        message_id: &MessageId,
    ) -> ApplicationResult<()> {
        if let Err(err) = self.message_store.remove(scope, message_id).await {
            error!(scope = %scope, id = %message_id, error = %err, "删除消息失败");
            return Err(err.into());
        }
        Ok(())
    }

    /// 删除一个作用域内的全部消息。不可逆，需要交互确认。
    pub async fn clear_messages(
        &self,
        _admin: &AdminCapability,
        scope: &ChatScope,
        _confirmation: Confirmation,
    ) -> ApplicationResult<()> {
        warn!(scope = %scope, "管理员清空作用域内全部消息");
        if let Err(err) = self.message_store.clear(scope).await {
            error!(scope = %scope, error = %err, "清空消息失败");
            return Err(err.into());
        }
        Ok(())
    }

    /// 删除整张在线状态表。不可逆，需要交互确认。
    pub async fn remove_all_users(
        &self,
        _admin: &AdminCapability,
        _confirmation: Confirmation,
    ) -> ApplicationResult<()> {
        warn!("管理员清空整张在线状态表");
        if let Err(err) = self.presence_store.clear().await {
            error!(error = %err, "清空在线状态表失败");
            return Err(err.into());
        }
        Ok(())
    }
}
