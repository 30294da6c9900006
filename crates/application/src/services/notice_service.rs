//! 公告板用例服务
//!
//! 写侧（创建、编辑、删除）仅限持有管理员能力的客户端；读侧对任何
//! 已认证客户端开放。搜索与过滤在客户端对已持有的公告列表进行，
//! 是纯函数。

use std::sync::Arc;

use tracing::{error, info};

use domain::{AdminCapability, Notice, NoticeCategory, NoticeDraft, NoticeId, NoticePriority};

use crate::error::ApplicationResult;
use crate::repository::NoticeStore;
use crate::subscription::SnapshotStream;

/// 公告列表的查询条件。
#[derive(Debug, Clone, Default)]
pub struct NoticeQuery {
    /// 大小写不敏感的文本搜索，匹配标题、正文或作者。
    pub text: Option<String>,
    pub category: Option<NoticeCategory>,
    pub priority: Option<NoticePriority>,
}

/// 按查询条件过滤公告并按创建时间倒序排列（最新在前）。
pub fn filter_notices(notices: &[Notice], query: &NoticeQuery) -> Vec<Notice> {
    let needle = query.text.as_deref().map(str::to_lowercase);
    let mut matched: Vec<Notice> = notices
        .iter()
        .filter(|notice| {
            if let Some(category) = query.category {
                if notice.category != category {
                    return false;
                }
            }
            if let Some(priority) = query.priority {
                if notice.priority != priority {
                    return false;
                }
            }
            match &needle {
                Some(needle) => {
                    notice.title.to_lowercase().contains(needle)
                        || notice.content.to_lowercase().contains(needle)
                        || notice.author.to_lowercase().contains(needle)
                }
                None => true,
            }
        })
        .cloned()
        .collect();
    matched.sort_by(|a, b| b.date.cmp(&a.date));
    matched
}

/// 公告板服务。
pub struct NoticeService {
    store: Arc<dyn NoticeStore>,
}

impl NoticeService {
    pub fn new(store: Arc<dyn NoticeStore>) -> Self {
        Self { store }
    }

    /// 发布新公告。输入先经领域层校验，创建时间由存储分配。
    pub async fn create(
        &self,
        _admin: &AdminCapability,
        draft: NoticeDraft,
    ) -> ApplicationResult<Notice> {
        let draft = draft.validated()?;
        let notice = self.store.create(draft).await?;
        info!(id = %notice.id, "公告已发布");
        Ok(notice)
    }

    /// 编辑公告。创建时间保持不变。
    pub async fn update(
        &self,
        _admin: &AdminCapability,
        id: &NoticeId,
        draft: NoticeDraft,
    ) -> ApplicationResult<Notice> {
        let draft = draft.validated()?;
        let notice = self.store.update(id, draft).await?;
        info!(id = %notice.id, "公告已更新");
        Ok(notice)
    }

    /// 删除公告。删除不存在的标识是空操作。
    pub async fn delete(
        &self,
        _admin: &AdminCapability,
        id: &NoticeId,
    ) -> ApplicationResult<()> {
        if let Err(err) = self.store.delete(id).await {
            error!(id = %id, error = %err, "删除公告失败");
            return Err(err.into());
        }
        Ok(())
    }

    /// 标记公告为已读。任何已认证客户端都可调用。
    pub async fn mark_read(&self, id: &NoticeId) -> ApplicationResult<()> {
        self.store.mark_read(id).await?;
        Ok(())
    }

    /// 读取并过滤公告列表。
    pub async fn fetch_filtered(&self, query: &NoticeQuery) -> ApplicationResult<Vec<Notice>> {
        let notices = self.store.fetch_all().await?;
        Ok(filter_notices(&notices, query))
    }

    /// 订阅公告集合的推送。
    pub fn subscribe(&self) -> SnapshotStream<Vec<Notice>> {
        self.store.subscribe()
    }
}
