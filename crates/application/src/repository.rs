//! 托管后端适配器接口定义
//!
//! 整个外部边界就是托管后端 SDK 的客户端表面：认证、实时键值存储
//! （在线状态与消息）、文档存储（公告）和单键本地档案缓存。
//! 遵循内层定义接口、外层实现接口的原则。

use async_trait::async_trait;
use thiserror::Error;

use domain::{
    ChatScope, DisplayName, MessageId, MessageRecord, Notice, NoticeDraft, NoticeId,
    PresenceRecord, RawSnapshot, UserEmail, UserId, UserProfile,
};

use crate::subscription::SnapshotStream;

/// 存储操作错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// 托管后端的安全规则拒绝了写入
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// 与托管后端暂时失联
    #[error("backend offline")]
    Offline,
    /// 值无法编码或解码
    #[error("serialization error: {0}")]
    Serialization(String),
    /// 其他后端错误
    #[error("backend error: {0}")]
    Backend(String),
}

/// 认证操作错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already in use")]
    EmailAlreadyInUse,
    #[error("weak password")]
    WeakPassword,
    /// 联合登录弹窗被用户关闭
    #[error("sign-in popup closed")]
    PopupClosed,
    #[error("no active session")]
    NotSignedIn,
    #[error("auth backend error: {0}")]
    Backend(String),
}

/// 认证服务返回的账户信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthAccount {
    pub uid: UserId,
    pub email: Option<UserEmail>,
    pub display_name: Option<DisplayName>,
    pub is_anonymous: bool,
}

/// 联合登录提供方。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FederatedProvider {
    Google,
}

/// 在线状态表（`presence/{userId}`）。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PresenceStore: Send + Sync {
    /// 写入（或覆盖）一个用户的在线状态记录。
    async fn set(&self, user_id: &UserId, record: &PresenceRecord) -> Result<(), StoreError>;

    /// 注册非正常断开时由托管后端写入的记录（断开钩子）。
    async fn set_on_disconnect(
        &self,
        user_id: &UserId,
        record: &PresenceRecord,
    ) -> Result<(), StoreError>;

    /// 删除一个用户的记录；删除不存在的标识是空操作。
    async fn remove(&self, user_id: &UserId) -> Result<(), StoreError>;

    /// 删除整张在线状态表。
    async fn clear(&self) -> Result<(), StoreError>;

    /// 订阅整表快照推送。
    fn subscribe(&self) -> SnapshotStream<RawSnapshot>;
}

/// 消息存储（`messages/global`、`messages/direct/{conversationId}`）。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// 追加一条持久化消息；存储分配标识和数值时间戳。
    async fn push(
        &self,
        scope: &ChatScope,
        record: &MessageRecord,
    ) -> Result<MessageId, StoreError>;

    /// 删除作用域内的一条消息；删除不存在的标识是空操作。
    async fn remove(&self, scope: &ChatScope, id: &MessageId) -> Result<(), StoreError>;

    /// 删除作用域内的全部消息。
    async fn clear(&self, scope: &ChatScope) -> Result<(), StoreError>;

    /// 订阅一个作用域的整表快照推送。每个作用域一个监听，
    /// 切换作用域时丢弃旧句柄、签发新句柄。
    fn subscribe(&self, scope: &ChatScope) -> SnapshotStream<RawSnapshot>;
}

/// 公告文档集合（`notices/{noticeId}`）。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoticeStore: Send + Sync {
    /// 创建公告；存储分配标识和创建时间。
    async fn create(&self, draft: NoticeDraft) -> Result<Notice, StoreError>;

    /// 编辑公告；创建时间保持不变。
    async fn update(&self, id: &NoticeId, draft: NoticeDraft) -> Result<Notice, StoreError>;

    /// 删除公告；删除不存在的标识是空操作。
    async fn delete(&self, id: &NoticeId) -> Result<(), StoreError>;

    /// 标记公告为已读。
    async fn mark_read(&self, id: &NoticeId) -> Result<(), StoreError>;

    /// 读取全部公告。
    async fn fetch_all(&self) -> Result<Vec<Notice>, StoreError>;

    /// 订阅公告集合的推送。
    fn subscribe(&self) -> SnapshotStream<Vec<Notice>>;
}

/// 认证服务。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn sign_in(&self, email: &UserEmail, password: &str) -> Result<AuthAccount, AuthError>;

    async fn sign_up(&self, email: &UserEmail, password: &str) -> Result<AuthAccount, AuthError>;

    /// 匿名登录（游客账户）。
    async fn sign_in_anonymously(&self) -> Result<AuthAccount, AuthError>;

    async fn sign_in_federated(
        &self,
        provider: FederatedProvider,
    ) -> Result<AuthAccount, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// 删除当前账户。
    async fn delete_account(&self) -> Result<(), AuthError>;

    /// 当前会话观察者：每次登录状态变化推送一次。
    fn observe(&self) -> SnapshotStream<Option<AuthAccount>>;
}

/// 本地设备存储中的单键档案缓存。
///
/// 启动时在会话观察者首次触发之前读取，用于恢复显示状态；
/// 登出时清除。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCache: Send + Sync {
    async fn load(&self) -> Result<Option<UserProfile>, StoreError>;

    async fn store(&self, profile: &UserProfile) -> Result<(), StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}
