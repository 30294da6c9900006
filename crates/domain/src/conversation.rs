//! 双人会话标识与消息作用域
//!
//! 会话标识由两个参与者标识按字典序排序后用下划线连接而成，
//! 与参数顺序无关。作用域决定消息在托管存储中的路径。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::UserId;

/// 全局房间在线上记录中使用的作用域标记。
pub const GLOBAL_DISCRIMINATOR: &str = "global";

/// 私聊记录中使用的作用域标记。
pub const DIRECT_DISCRIMINATOR: &str = "direct";

/// 双人会话的确定性标识。
///
/// 对任意参与者对 `(a, b)` 满足 `between(a, b) == between(b, a)`。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(String);

impl ConversationId {
    /// 由两个不同的参与者标识派生会话标识。
    pub fn between(a: &UserId, b: &UserId) -> Result<Self, DomainError> {
        if a == b {
            return Err(DomainError::conversation_error(
                "participants must be distinct",
            ));
        }
        let (first, second) = if a.as_str() <= b.as_str() {
            (a, b)
        } else {
            (b, a)
        };
        Ok(Self(format!("{}_{}", first.as_str(), second.as_str())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 消息线程的寻址作用域：全局房间或一个双人会话。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChatScope {
    Global,
    Direct(ConversationId),
}

impl ChatScope {
    /// 以本地用户和对方用户派生私聊作用域。
    pub fn direct(local: &UserId, other: &UserId) -> Result<Self, DomainError> {
        Ok(Self::Direct(ConversationId::between(local, other)?))
    }

    /// 该作用域在托管存储中的消息路径。
    pub fn storage_path(&self) -> String {
        match self {
            ChatScope::Global => "messages/global".to_owned(),
            ChatScope::Direct(id) => format!("messages/direct/{}", id),
        }
    }

    /// 写入消息记录时使用的 `chatType` 标记。
    pub fn discriminator(&self) -> &'static str {
        match self {
            ChatScope::Global => GLOBAL_DISCRIMINATOR,
            ChatScope::Direct(_) => DIRECT_DISCRIMINATOR,
        }
    }

    /// 写入消息记录时使用的 `chatId` 值。
    pub fn chat_id(&self) -> &str {
        match self {
            ChatScope::Global => GLOBAL_DISCRIMINATOR,
            ChatScope::Direct(id) => id.as_str(),
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, ChatScope::Direct(_))
    }
}

impl fmt::Display for ChatScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.chat_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(value: &str) -> UserId {
        UserId::parse(value).expect("valid user id")
    }

    #[test]
    fn conversation_id_is_order_independent() {
        let a = uid("alice");
        let b = uid("bob");
        let ab = ConversationId::between(&a, &b).expect("derive");
        let ba = ConversationId::between(&b, &a).expect("derive");
        assert_eq!(ab, ba);
        assert_eq!(ab.as_str(), "alice_bob");
    }

    #[test]
    fn conversation_id_rejects_same_participant() {
        let a = uid("alice");
        assert!(ConversationId::between(&a, &a).is_err());
    }

    #[test]
    fn scope_storage_paths() {
        let scope = ChatScope::direct(&uid("u2"), &uid("u1")).expect("derive");
        assert_eq!(scope.storage_path(), "messages/direct/u1_u2");
        assert_eq!(ChatScope::Global.storage_path(), "messages/global");
        assert_eq!(ChatScope::Global.chat_id(), "global");
    }
}
