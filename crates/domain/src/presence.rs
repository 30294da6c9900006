//! 在线状态记录与快照解码
//!
//! 每个连接过的用户标识对应一条在线状态记录，由拥有方客户端在连接时写入，
//! 非正常断开时由托管后端的断开钩子置为离线。只有管理员删除才会销毁记录。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::snapshot::RawSnapshot;
use crate::value_objects::{
    timestamp_from_millis, timestamp_to_millis, DisplayName, Timestamp, UserId,
};

/// 线上字段形态，所有字段都有缺省值以兼容残缺记录。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PresenceWire {
    name: Option<String>,
    is_guest: bool,
    online: bool,
    last_seen: Option<i64>,
}

/// 单个用户的在线状态记录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRecord {
    pub name: DisplayName,
    pub is_guest: bool,
    pub online: bool,
    pub last_seen: Option<Timestamp>,
}

impl PresenceRecord {
    pub fn online(name: DisplayName, is_guest: bool, last_seen: Timestamp) -> Self {
        Self {
            name,
            is_guest,
            online: true,
            last_seen: Some(last_seen),
        }
    }

    pub fn offline(name: DisplayName, is_guest: bool, last_seen: Timestamp) -> Self {
        Self {
            name,
            is_guest,
            online: false,
            last_seen: Some(last_seen),
        }
    }

    /// 从原始快照值解码，总是成功：缺失的名称退化为占位名称，
    /// 缺失的布尔字段按离线处理。
    pub fn decode_value(value: &Value) -> Self {
        let wire: PresenceWire =
            serde_json::from_value(value.clone()).unwrap_or_default();
        let name = wire
            .name
            .and_then(|raw| DisplayName::parse(raw).ok())
            .unwrap_or_else(DisplayName::unknown);
        Self {
            name,
            is_guest: wire.is_guest,
            online: wire.online,
            last_seen: wire.last_seen.and_then(timestamp_from_millis),
        }
    }

    /// 编码为托管存储的线上形态。
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "name": self.name.as_str(),
            "isGuest": self.is_guest,
            "online": self.online,
            "lastSeen": self.last_seen.map(timestamp_to_millis),
        })
    }
}

/// 整表在线状态快照，保持投递顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceSnapshot {
    entries: Vec<(UserId, PresenceRecord)>,
}

impl PresenceSnapshot {
    /// 解码一次原始投递。单条记录损坏只影响该条目，不影响整个快照。
    pub fn decode(raw: &RawSnapshot) -> Self {
        let entries = raw
            .iter()
            .filter_map(|(key, value)| {
                let id = UserId::parse(key.clone()).ok()?;
                Some((id, PresenceRecord::decode_value(value)))
            })
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(UserId, PresenceRecord)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
