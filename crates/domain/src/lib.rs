//! 聊天与公告板系统核心领域模型
//!
//! 包含用户档案、在线状态、消息、会话标识、公告等核心类型，
//! 以及快照解码和作用域匹配的纯业务逻辑。不做任何 I/O。

pub mod conversation;
pub mod errors;
pub mod message;
pub mod notice;
pub mod presence;
pub mod snapshot;
pub mod user;
pub mod value_objects;

// 重新导出常用类型
pub use conversation::{ChatScope, ConversationId};
pub use errors::{DomainError, DomainResult};
pub use message::{ChatKind, ChatMessage, MessageRecord, MessageSnapshot};
pub use notice::{Notice, NoticeCategory, NoticeDraft, NoticePriority};
pub use presence::{PresenceRecord, PresenceSnapshot};
pub use snapshot::RawSnapshot;
pub use user::{AccountKind, AdminCapability, UserProfile};
pub use value_objects::{
    timestamp_from_millis, timestamp_to_millis, DisplayName, MessageId, NoticeId, Timestamp,
    UserEmail, UserId,
};
