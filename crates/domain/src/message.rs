//! 消息记录、快照解码与作用域匹配
//!
//! 消息一经写入即不可变（只能删除）。发送方在发送时把显示名称
//! 反范式化进记录里，之后不再重新解析。旧版记录可能缺少 `chatId`，
//! 匹配时回退到 `chatType` 标记或收发双方配对。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conversation::{ChatScope, ConversationId, DIRECT_DISCRIMINATOR, GLOBAL_DISCRIMINATOR};
use crate::snapshot::RawSnapshot;
use crate::user::UserProfile;
use crate::value_objects::{
    timestamp_from_millis, timestamp_to_millis, DisplayName, MessageId, Timestamp, UserId,
};

/// 消息的作用域标记（线上 `chatType` 字段）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Global,
    Direct,
}

impl ChatKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            GLOBAL_DISCRIMINATOR => Some(Self::Global),
            DIRECT_DISCRIMINATOR => Some(Self::Direct),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Global => GLOBAL_DISCRIMINATOR,
            Self::Direct => DIRECT_DISCRIMINATOR,
        }
    }
}

/// 线上字段形态，所有字段可缺省以兼容旧记录。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MessageWire {
    sender_id: Option<String>,
    sender_name: Option<String>,
    text: Option<String>,
    timestamp: Option<i64>,
    chat_type: Option<String>,
    receiver_id: Option<String>,
    chat_id: Option<String>,
    client_key: Option<String>,
}

/// 待写入托管存储的出站消息记录。
///
/// 持久化标识和数值时间戳由存储在写入时分配；`client_key` 是客户端
/// 生成的关联键，用来在快照回送时替换对应的乐观回显。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub sender_id: UserId,
    pub sender_name: DisplayName,
    pub text: String,
    pub chat_type: ChatKind,
    pub receiver_id: Option<UserId>,
    pub chat_id: String,
    pub client_key: String,
}

impl MessageRecord {
    pub fn outgoing(
        sender: &UserProfile,
        text: impl Into<String>,
        scope: &ChatScope,
        receiver_id: Option<UserId>,
        client_key: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender.id.clone(),
            sender_name: sender.name.clone(),
            text: text.into(),
            chat_type: match scope {
                ChatScope::Global => ChatKind::Global,
                ChatScope::Direct(_) => ChatKind::Direct,
            },
            receiver_id,
            chat_id: scope.chat_id().to_owned(),
            client_key: client_key.into(),
        }
    }

    /// 编码为托管存储的线上形态。时间戳留给存储在写入时填入。
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "senderId": self.sender_id.as_str(),
            "senderName": self.sender_name.as_str(),
            "text": self.text,
            "chatType": self.chat_type.as_str(),
            "receiverId": self.receiver_id.as_ref().map(|id| id.as_str().to_owned()),
            "chatId": self.chat_id,
            "clientKey": self.client_key,
        })
    }
}

/// 解码后的单条消息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender_id: Option<UserId>,
    pub sender_name: DisplayName,
    pub text: String,
    pub timestamp: Option<Timestamp>,
    pub chat_type: Option<ChatKind>,
    pub receiver_id: Option<UserId>,
    pub chat_id: Option<String>,
    pub client_key: Option<String>,
    /// 乐观回显标记：仅对尚未确认的本地回显为真。
    pub pending: bool,
}

impl ChatMessage {
    /// 由出站记录构造乐观回显，时间戳取客户端时钟。
    pub fn optimistic_echo(id: MessageId, record: &MessageRecord, at: Timestamp) -> Self {
        Self {
            id,
            sender_id: Some(record.sender_id.clone()),
            sender_name: record.sender_name.clone(),
            text: record.text.clone(),
            timestamp: Some(at),
            chat_type: Some(record.chat_type),
            receiver_id: record.receiver_id.clone(),
            chat_id: Some(record.chat_id.clone()),
            client_key: Some(record.client_key.clone()),
            pending: true,
        }
    }

    /// 从原始快照值解码，总是成功：损坏的记录退化为占位内容。
    pub fn decode_value(id: MessageId, value: &Value) -> Self {
        let wire: MessageWire = serde_json::from_value(value.clone()).unwrap_or_default();
        let sender_name = wire
            .sender_name
            .and_then(|raw| DisplayName::parse(raw).ok())
            .unwrap_or_else(DisplayName::unknown);
        Self {
            id,
            sender_id: wire.sender_id.and_then(|raw| UserId::parse(raw).ok()),
            sender_name,
            text: wire.text.unwrap_or_default(),
            timestamp: wire.timestamp.and_then(timestamp_from_millis),
            chat_type: wire.chat_type.as_deref().and_then(ChatKind::parse),
            receiver_id: wire.receiver_id.and_then(|raw| UserId::parse(raw).ok()),
            chat_id: wire.chat_id,
            client_key: wire.client_key,
            pending: false,
        }
    }

    /// 消息是否属于请求的作用域。
    ///
    /// 显式 `chatId` 优先；旧版记录按 `chatType` 标记（全局）或收发双方
    /// 配对（私聊，要求本地用户是其中一方）回退匹配。
    pub fn in_scope(&self, scope: &ChatScope, local: &UserId) -> bool {
        match scope {
            ChatScope::Global => {
                self.chat_type == Some(ChatKind::Global)
                    || self.chat_id.as_deref() == Some(GLOBAL_DISCRIMINATOR)
            }
            ChatScope::Direct(conversation) => {
                if let Some(chat_id) = &self.chat_id {
                    return chat_id == conversation.as_str();
                }
                if self.chat_type != Some(ChatKind::Direct) {
                    return false;
                }
                match (&self.sender_id, &self.receiver_id) {
                    (Some(sender), Some(receiver)) => {
                        (sender == local || receiver == local)
                            && ConversationId::between(sender, receiver)
                                .map(|derived| &derived == conversation)
                                .unwrap_or(false)
                    }
                    _ => false,
                }
            }
        }
    }

    /// 线上毫秒时间戳，用于排序（缺失按 0 处理，与参考行为一致）。
    pub fn sort_key(&self) -> i64 {
        self.timestamp.map(timestamp_to_millis).unwrap_or(0)
    }
}

/// 整表消息快照，保持投递顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSnapshot {
    entries: Vec<ChatMessage>,
}

impl MessageSnapshot {
    /// 解码一次原始投递。
    pub fn decode(raw: &RawSnapshot) -> Self {
        let entries = raw
            .iter()
            .filter_map(|(key, value)| {
                let id = MessageId::parse(key.clone()).ok()?;
                Some(ChatMessage::decode_value(id, value))
            })
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter()
    }

    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 快照中出现的所有关联键，用于乐观回显的对账。
    pub fn client_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter_map(|message| message.client_key.as_deref())
    }
}
