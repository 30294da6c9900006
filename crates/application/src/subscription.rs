//! 长生命周期的推送订阅
//!
//! 托管后端在每次变化时推送全量状态。订阅基于 `tokio::sync::watch`：
//! 消费者总是能读到最新一次投递，中间状态可以被合并跳过。
//! 不同表的订阅相互独立，投递顺序之间没有任何保证。
//!
//! 订阅随句柄释放：丢弃（或显式 `detach`）即取消监听。切换会话作用域
//! 时必须丢弃旧订阅再签发新订阅，泄漏的监听会导致过期或重复的更新。

use tokio::sync::watch;

/// 一个表（或会话观察者）的推送订阅句柄。
#[derive(Debug)]
pub struct SnapshotStream<T> {
    receiver: watch::Receiver<T>,
}

impl<T: Clone> SnapshotStream<T> {
    pub fn new(receiver: watch::Receiver<T>) -> Self {
        Self { receiver }
    }

    /// 最近一次投递的快照（权威全量状态）。
    pub fn current(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// 等待下一次投递；发布方关闭时返回 `None`。
    pub async fn next(&mut self) -> Option<T> {
        match self.receiver.changed().await {
            Ok(()) => Some(self.receiver.borrow_and_update().clone()),
            Err(_) => None,
        }
    }

    /// 显式释放订阅。与直接丢弃等价，提供命名出口使取消动作可见。
    pub fn detach(self) {}
}
