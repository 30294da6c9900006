//! 内存实现的实时键值存储
//!
//! 本地替身，模拟托管后端实时存储的客户端可见行为：按路径组织的
//! JSON 值、保持插入顺序的条目、每次变化推送整表快照、写入时分配
//! 的递增标识和服务器时间戳，以及非正常断开时触发的断开钩子。
//!
//! 不同路径的订阅各自独立，推送之间没有跨路径的顺序保证。
//! 内部临界区都很短且不含挂起点，用同步互斥锁保护。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info};

use application::{Clock, MessageStore, PresenceStore, SnapshotStream, StoreError};
use domain::{
    timestamp_to_millis, ChatScope, MessageId, MessageRecord, PresenceRecord, RawSnapshot, UserId,
};

/// 在线状态表的存储路径。
const PRESENCE_PATH: &str = "presence";

/// 单个路径下的条目表和它的推送通道。
struct Node {
    entries: Vec<(String, Value)>,
    sender: watch::Sender<RawSnapshot>,
}

impl Node {
    fn new() -> Self {
        let (sender, _) = watch::channel(Vec::new());
        Self {
            entries: Vec::new(),
            sender,
        }
    }

    fn publish(&self) {
        self.sender.send_replace(self.entries.clone());
    }
}

/// 注册的断开钩子：断开时写入 `(路径, 键, 值)`。
struct DisconnectHook {
    path: String,
    key: String,
    value: Value,
}

/// 内存实时数据库。
pub struct MemoryRealtimeDb {
    nodes: Mutex<HashMap<String, Node>>,
    hooks: Mutex<Vec<DisconnectHook>>,
    clock: Arc<dyn Clock>,
    seq: AtomicU64,
}

impl MemoryRealtimeDb {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            nodes: Mutex::new(HashMap::new()),
            hooks: Mutex::new(Vec::new()),
            clock,
            seq: AtomicU64::new(0),
        }
    }

    fn nodes(&self) -> MutexGuard<'_, HashMap<String, Node>> {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn hooks(&self) -> MutexGuard<'_, Vec<DisconnectHook>> {
        self.hooks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 写入时分配的存储标识，按分配顺序字典序递增。
    fn next_key(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("k{seq:012}")
    }

    fn server_millis(&self) -> i64 {
        timestamp_to_millis(self.clock.now())
    }

    /// 在指定键写入（或覆盖）一个值。覆盖保持条目原有位置。
    fn set(&self, path: &str, key: &str, value: Value) {
        let mut nodes = self.nodes();
        let node = nodes.entry(path.to_owned()).or_insert_with(Node::new);
        match node.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => node.entries.push((key.to_owned(), value)),
        }
        node.publish();
    }

    /// 追加一个值，存储分配键。
    fn push(&self, path: &str, value: Value) -> String {
        let key = self.next_key();
        let mut nodes = self.nodes();
        let node = nodes.entry(path.to_owned()).or_insert_with(Node::new);
        node.entries.push((key.clone(), value));
        node.publish();
        key
    }

    /// 删除一个键；不存在时是空操作。
    fn remove(&self, path: &str, key: &str) {
        let mut nodes = self.nodes();
        if let Some(node) = nodes.get_mut(path) {
            node.entries.retain(|(k, _)| k != key);
            node.publish();
        }
    }

    /// 清空一个路径下的全部条目。
    fn clear(&self, path: &str) {
        let mut nodes = self.nodes();
        if let Some(node) = nodes.get_mut(path) {
            node.entries.clear();
            node.publish();
        }
    }

    /// 订阅一个路径的整表快照推送。
    fn subscribe(&self, path: &str) -> SnapshotStream<RawSnapshot> {
        let mut nodes = self.nodes();
        let node = nodes.entry(path.to_owned()).or_insert_with(Node::new);
        // 新订阅者的初始值就是当前整表状态
        node.publish();
        SnapshotStream::new(node.sender.subscribe())
    }

    /// 注册断开钩子。同一 `(路径, 键)` 的旧钩子被替换。
    fn register_hook(&self, path: &str, key: &str, value: Value) {
        let mut hooks = self.hooks();
        hooks.retain(|hook| !(hook.path == path && hook.key == key));
        hooks.push(DisconnectHook {
            path: path.to_owned(),
            key: key.to_owned(),
            value,
        });
    }

    /// 模拟非正常断开：触发所有已注册的断开钩子。
    ///
    /// 钩子值里为 null 的 `lastSeen` 在触发时填入服务器时间，
    /// 与托管后端的服务器时间戳语义一致。
    pub fn simulate_disconnect(&self) {
        let hooks: Vec<DisconnectHook> = self.hooks().drain(..).collect();
        let now = self.server_millis();
        for hook in hooks {
            let mut value = hook.value;
            if let Some(last_seen) = value.get_mut("lastSeen") {
                if last_seen.is_null() {
                    *last_seen = Value::from(now);
                }
            }
            info!(path = %hook.path, key = %hook.key, "触发断开钩子");
            self.set(&hook.path, &hook.key, value);
        }
    }
}

/// 在线状态表适配器（`presence/{userId}`）。
pub struct RealtimePresenceStore {
    db: Arc<MemoryRealtimeDb>,
}

impl RealtimePresenceStore {
    pub fn new(db: Arc<MemoryRealtimeDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PresenceStore for RealtimePresenceStore {
    async fn set(&self, user_id: &UserId, record: &PresenceRecord) -> Result<(), StoreError> {
        self.db.set(PRESENCE_PATH, user_id.as_str(), record.to_value());
        debug!(user_id = %user_id, online = record.online, "在线状态已写入");
        Ok(())
    }

    async fn set_on_disconnect(
        &self,
        user_id: &UserId,
        record: &PresenceRecord,
    ) -> Result<(), StoreError> {
        self.db
            .register_hook(PRESENCE_PATH, user_id.as_str(), record.to_value());
        Ok(())
    }

    async fn remove(&self, user_id: &UserId) -> Result<(), StoreError> {
        self.db.remove(PRESENCE_PATH, user_id.as_str());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.db.clear(PRESENCE_PATH);
        Ok(())
    }

    fn subscribe(&self) -> SnapshotStream<RawSnapshot> {
        self.db.subscribe(PRESENCE_PATH)
    }
}

/// 消息存储适配器（`messages/global`、`messages/direct/{conversationId}`）。
pub struct RealtimeMessageStore {
    db: Arc<MemoryRealtimeDb>,
}

impl RealtimeMessageStore {
    pub fn new(db: Arc<MemoryRealtimeDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageStore for RealtimeMessageStore {
    async fn push(
        &self,
        scope: &ChatScope,
        record: &MessageRecord,
    ) -> Result<MessageId, StoreError> {
        let mut value = record.to_value();
        if let Value::Object(fields) = &mut value {
            // 持久化写入时分配的服务器数值时间戳
            fields.insert("timestamp".to_owned(), Value::from(self.db.server_millis()));
        }
        let key = self.db.push(&scope.storage_path(), value);
        MessageId::parse(key).map_err(|err| StoreError::Backend(err.to_string()))
    }

    async fn remove(&self, scope: &ChatScope, id: &MessageId) -> Result<(), StoreError> {
        self.db.remove(&scope.storage_path(), id.as_str());
        Ok(())
    }

    async fn clear(&self, scope: &ChatScope) -> Result<(), StoreError> {
        self.db.clear(&scope.storage_path());
        Ok(())
    }

    fn subscribe(&self, scope: &ChatScope) -> SnapshotStream<RawSnapshot> {
        self.db.subscribe(&scope.storage_path())
    }
}
