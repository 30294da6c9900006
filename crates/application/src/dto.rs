//! 面向渲染层的视图模型
//!
//! 投影服务把快照转换成这里的展示结构；渲染本身不在本层范围内。

use serde::Serialize;

use domain::{MessageId, Timestamp, UserId};

/// 用户列表中的一个条目。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserEntry {
    pub id: UserId,
    pub name: String,
    pub online: bool,
    pub is_guest: bool,
}

/// 在线/离线两个有序列表，均不含本地用户。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    pub online: Vec<UserEntry>,
    pub offline: Vec<UserEntry>,
}

/// 展示就绪的单条消息。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub id: MessageId,
    pub sender_id: Option<UserId>,
    pub sender_name: String,
    pub text: String,
    /// 人类可读的时间标签（`HH:MM`），时间戳缺失时为空。
    pub time_label: String,
    /// 尚未得到持久化确认的乐观回显。
    pub pending: bool,
}

/// 从时间戳派生展示用时间标签。
pub fn time_label(timestamp: Option<Timestamp>) -> String {
    timestamp
        .map(|ts| ts.format("%H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::timestamp_from_millis;

    #[test]
    fn time_label_formats_hour_minute() {
        // 2023-11-14 22:13:20 UTC
        let ts = timestamp_from_millis(1_700_000_000_000);
        assert_eq!(time_label(ts), "22:13");
        assert_eq!(time_label(None), "");
    }
}
