//! 消息时间线投影与乐观发送管线
//!
//! 时间线投影是快照加作用域的纯函数：按时间戳稳定升序排序后过滤到
//! 请求的作用域。切换作用域会丢弃旧监听并签发新监听，但任何已持有的
//! 快照都足以重新推导投影。
//!
//! 发送管线先同步插入乐观回显（客户端标识和客户端时间戳），再异步
//! 提交持久化写入。回显通过关联键对账：快照回送中出现相同 `clientKey`
//! 的持久化副本时，对应回显被移除，不会出现重复消息。

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use domain::{
    ChatMessage, ChatScope, MessageId, MessageRecord, MessageSnapshot, RawSnapshot, UserId,
};

use crate::clock::Clock;
use crate::dto::{time_label, MessageView};
use crate::error::{ApplicationError, ApplicationResult};
use crate::repository::MessageStore;
use crate::session::SessionContext;
use crate::subscription::SnapshotStream;

/// 把一组消息投影成展示就绪的时间线。
///
/// 先按线上时间戳稳定升序排序（缺失按 0 处理，相同时间戳保持原有
/// 顺序），再过滤到请求的作用域。`local` 只用于旧版记录的收发配对回退。
pub fn project_timeline(
    messages: &[ChatMessage],
    scope: &ChatScope,
    local: &UserId,
) -> Vec<MessageView> {
    let mut ordered: Vec<&ChatMessage> = messages.iter().collect();
    ordered.sort_by_key(|message| message.sort_key());
    ordered
        .into_iter()
        .filter(|message| message.in_scope(scope, local))
        .map(|message| MessageView {
            id: message.id.clone(),
            sender_id: message.sender_id.clone(),
            sender_name: message.sender_name.as_str().to_owned(),
            text: message.text.clone(),
            time_label: time_label(message.timestamp),
            pending: message.pending,
        })
        .collect()
}

/// 聊天服务的外部依赖。
pub struct ChatServiceDependencies {
    pub message_store: Arc<dyn MessageStore>,
    pub clock: Arc<dyn Clock>,
}

/// 单个会话的聊天服务：持有当前作用域的监听、快照和乐观回显缓冲。
pub struct ChatService {
    message_store: Arc<dyn MessageStore>,
    clock: Arc<dyn Clock>,
    session: SessionContext,
    scope: ChatScope,
    receiver: Option<UserId>,
    stream: SnapshotStream<RawSnapshot>,
    snapshot: MessageSnapshot,
    pending: Vec<ChatMessage>,
}

impl ChatService {
    /// 打开聊天服务，初始作用域为全局房间。
    pub fn open(deps: ChatServiceDependencies, session: SessionContext) -> Self {
        let stream = deps.message_store.subscribe(&ChatScope::Global);
        let snapshot = MessageSnapshot::decode(&stream.current());
        Self {
            message_store: deps.message_store,
            clock: deps.clock,
            session,
            scope: ChatScope::Global,
            receiver: None,
            stream,
            snapshot,
            pending: Vec::new(),
        }
    }

    pub fn scope(&self) -> &ChatScope {
        &self.scope
    }

    /// 切换到全局房间。
    pub fn open_global(&mut self) {
        self.switch(ChatScope::Global, None);
    }

    /// 切换到与 `other` 的私聊。游客账户无论在线状态如何都会被拒绝。
    pub fn open_direct(&mut self, other: &UserId) -> ApplicationResult<()> {
        if self.session.profile.is_guest() {
            return Err(ApplicationError::authorization(
                "guest accounts cannot open direct conversations",
            ));
        }
        let scope = ChatScope::direct(&self.session.profile.id, other)?;
        self.switch(scope, Some(other.clone()));
        Ok(())
    }

    /// 取消旧监听、签发新监听，整体替换快照。作用域切换后旧回显作废。
    fn switch(&mut self, scope: ChatScope, receiver: Option<UserId>) {
        let stream = self.message_store.subscribe(&scope);
        self.snapshot = MessageSnapshot::decode(&stream.current());
        self.stream = stream;
        self.scope = scope;
        self.receiver = receiver;
        self.pending.clear();
        info!(scope = %self.scope, "聊天作用域已切换");
    }

    /// 发送一条消息。
    ///
    /// 去除首尾空白后为空的输入被静默丢弃（不是错误）。否则先把乐观
    /// 回显加入本地时间线，再提交持久化写入；写入失败时回显保留在
    /// 原处（可见但未持久化），错误上抛给调用方展示。
    pub async fn send(&mut self, text: &str) -> ApplicationResult<Option<MessageId>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if self.scope.is_direct() && self.session.profile.is_guest() {
            return Err(ApplicationError::authorization(
                "guest accounts cannot send direct messages",
            ));
        }

        let record = MessageRecord::outgoing(
            &self.session.profile,
            trimmed,
            &self.scope,
            self.receiver.clone(),
            Uuid::new_v4().to_string(),
        );
        let echo_id = MessageId::parse(Uuid::new_v4().to_string())?;
        self.pending
            .push(ChatMessage::optimistic_echo(echo_id, &record, self.clock.now()));

        match self.message_store.push(&self.scope, &record).await {
            Ok(durable_id) => {
                debug!(scope = %self.scope, id = %durable_id, "消息已提交持久化");
                Ok(Some(durable_id))
            }
            Err(err) => {
                error!(scope = %self.scope, error = %err, "消息持久化失败");
                Err(err.into())
            }
        }
    }

    /// 等待下一次快照投递，整体替换快照并对账乐观回显；
    /// 订阅关闭时返回 `false`。
    pub async fn next_delivery(&mut self) -> bool {
        let Some(raw) = self.stream.next().await else {
            return false;
        };
        self.snapshot = MessageSnapshot::decode(&raw);
        let confirmed: HashSet<String> = self
            .snapshot
            .client_keys()
            .map(str::to_owned)
            .collect();
        self.pending.retain(|echo| {
            echo.client_key
                .as_deref()
                .map(|key| !confirmed.contains(key))
                .unwrap_or(true)
        });
        debug!(
            scope = %self.scope,
            durable = self.snapshot.len(),
            pending = self.pending.len(),
            "消息快照已更新"
        );
        true
    }

    /// 当前作用域的展示时间线：持久化快照与未确认回显的合并投影。
    pub fn timeline(&self) -> Vec<MessageView> {
        let mut merged: Vec<ChatMessage> = self.snapshot.iter().cloned().collect();
        merged.extend(self.pending.iter().cloned());
        project_timeline(&merged, &self.scope, &self.session.profile.id)
    }

    /// 释放当前监听。
    pub fn detach(self) {
        self.stream.detach();
    }
}
