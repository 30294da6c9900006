//! 在线状态投影服务
//!
//! 把整表在线状态快照投影成在线/离线两个有序用户列表。
//! 投影是纯函数，每次快照投递整体替换结果。

use std::sync::Arc;

use tracing::debug;

use domain::{PresenceSnapshot, RawSnapshot, UserId};

use crate::dto::{Roster, UserEntry};
use crate::repository::PresenceStore;
use crate::subscription::SnapshotStream;

/// 把一次在线状态快照投影成用户列表。
///
/// 两个列表都排除本地用户；`exclude_guests` 置位时（私聊场景）
/// 同时排除游客账户。列表顺序保持快照的迭代顺序，不做额外排序。
pub fn project_roster(
    snapshot: &PresenceSnapshot,
    local: &UserId,
    exclude_guests: bool,
) -> Roster {
    let mut roster = Roster::default();
    for (id, record) in snapshot.iter() {
        if id == local {
            continue;
        }
        if exclude_guests && record.is_guest {
            continue;
        }
        let entry = UserEntry {
            id: id.clone(),
            name: record.name.as_str().to_owned(),
            online: record.online,
            is_guest: record.is_guest,
        };
        if record.online {
            roster.online.push(entry);
        } else {
            roster.offline.push(entry);
        }
    }
    roster
}

/// 持有在线状态订阅并维护当前投影的服务。
pub struct RosterService {
    local: UserId,
    exclude_guests: bool,
    stream: SnapshotStream<RawSnapshot>,
    roster: Roster,
}

impl RosterService {
    /// 订阅在线状态表并以当前快照初始化投影。
    pub fn subscribe(
        store: &Arc<dyn PresenceStore>,
        local: UserId,
        exclude_guests: bool,
    ) -> Self {
        let stream = store.subscribe();
        let snapshot = PresenceSnapshot::decode(&stream.current());
        let roster = project_roster(&snapshot, &local, exclude_guests);
        Self {
            local,
            exclude_guests,
            stream,
            roster,
        }
    }

    /// 当前投影。
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// 等待下一次投递并重新投影；订阅关闭时返回 `false`。
    pub async fn next_delivery(&mut self) -> bool {
        let Some(raw) = self.stream.next().await else {
            return false;
        };
        let snapshot = PresenceSnapshot::decode(&raw);
        self.roster = project_roster(&snapshot, &self.local, self.exclude_guests);
        debug!(
            online = self.roster.online.len(),
            offline = self.roster.offline.len(),
            "在线状态投影已更新"
        );
        true
    }

    /// 释放订阅。
    pub fn detach(self) {
        self.stream.detach();
    }
}
