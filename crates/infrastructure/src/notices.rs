//! 内存实现的公告文档集合
//!
//! 本地替身，模拟托管文档存储中 `notices/{noticeId}` 集合的行为：
//! 存储分配文档标识和创建时间，每次变化推送完整集合。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use application::{Clock, NoticeStore, SnapshotStream, StoreError};
use domain::{Notice, NoticeDraft, NoticeId};

/// 内存公告存储。
pub struct MemoryNoticeStore {
    notices: Mutex<Vec<Notice>>,
    sender: watch::Sender<Vec<Notice>>,
    clock: Arc<dyn Clock>,
    seq: AtomicU64,
}

impl MemoryNoticeStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let (sender, _) = watch::channel(Vec::new());
        Self {
            notices: Mutex::new(Vec::new()),
            sender,
            clock,
            seq: AtomicU64::new(0),
        }
    }

    fn notices(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, notices: &[Notice]) {
        self.sender.send_replace(notices.to_vec());
    }

    fn next_id(&self) -> Result<NoticeId, StoreError> {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        NoticeId::parse(format!("notice_{seq:06}"))
            .map_err(|err| StoreError::Backend(err.to_string()))
    }
}

#[async_trait]
impl NoticeStore for MemoryNoticeStore {
    async fn create(&self, draft: NoticeDraft) -> Result<Notice, StoreError> {
        let notice = Notice::new(self.next_id()?, draft, self.clock.now());
        let mut notices = self.notices();
        notices.push(notice.clone());
        self.publish(&notices);
        info!(id = %notice.id, "公告文档已创建");
        Ok(notice)
    }

    async fn update(&self, id: &NoticeId, draft: NoticeDraft) -> Result<Notice, StoreError> {
        let mut notices = self.notices();
        let notice = notices
            .iter_mut()
            .find(|notice| &notice.id == id)
            .ok_or_else(|| StoreError::Backend(format!("notice not found: {id}")))?;
        notice.apply(draft);
        let updated = notice.clone();
        self.publish(&notices);
        Ok(updated)
    }

    async fn delete(&self, id: &NoticeId) -> Result<(), StoreError> {
        let mut notices = self.notices();
        notices.retain(|notice| &notice.id != id);
        self.publish(&notices);
        Ok(())
    }

    async fn mark_read(&self, id: &NoticeId) -> Result<(), StoreError> {
        let mut notices = self.notices();
        if let Some(notice) = notices.iter_mut().find(|notice| &notice.id == id) {
            notice.mark_read();
            self.publish(&notices);
        }
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Notice>, StoreError> {
        Ok(self.notices().clone())
    }

    fn subscribe(&self) -> SnapshotStream<Vec<Notice>> {
        let notices = self.notices();
        self.publish(&notices);
        SnapshotStream::new(self.sender.subscribe())
    }
}
