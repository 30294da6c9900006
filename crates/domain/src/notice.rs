//! 公告板领域实体
//!
//! 公告只能由持有管理员能力的客户端创建、编辑和删除，任何已认证客户端
//! 可读。创建时间在创建后不可变，编辑也不会改变它。

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{NoticeId, Timestamp};

/// 公告类别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeCategory {
    Announcement,
    Update,
    Maintenance,
    #[default]
    General,
}

/// 公告优先级。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticePriority {
    Low,
    #[default]
    Normal,
    High,
}

/// 经过验证的公告输入。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NoticeDraft {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    pub category: NoticeCategory,
    pub priority: NoticePriority,
    /// 自由文本的作者署名。
    #[validate(length(min = 1))]
    pub author: String,
}

impl NoticeDraft {
    /// 校验输入字段，返回领域层错误。
    pub fn validated(self) -> DomainResult<Self> {
        self.validate()
            .map_err(|err| DomainError::validation_error(err.to_string()))?;
        Ok(self)
    }
}

/// 单条公告文档。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: NoticeId,
    pub title: String,
    pub content: String,
    pub category: NoticeCategory,
    pub priority: NoticePriority,
    pub author: String,
    /// 创建时间，编辑时保持不变。
    pub date: Timestamp,
    pub read: bool,
}

impl Notice {
    pub fn new(id: NoticeId, draft: NoticeDraft, date: Timestamp) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            category: draft.category,
            priority: draft.priority,
            author: draft.author,
            date,
            read: false,
        }
    }

    /// 应用编辑：内容字段被替换，创建时间与已读标记保持不变。
    pub fn apply(&mut self, draft: NoticeDraft) {
        self.title = draft.title;
        self.content = draft.content;
        self.category = draft.category;
        self.priority = draft.priority;
        self.author = draft.author;
    }

    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::timestamp_from_millis;

    fn draft(title: &str) -> NoticeDraft {
        NoticeDraft {
            title: title.to_owned(),
            content: "content".to_owned(),
            category: NoticeCategory::Announcement,
            priority: NoticePriority::High,
            author: "ops".to_owned(),
        }
    }

    #[test]
    fn draft_validation_rejects_empty_title() {
        assert!(draft("").validated().is_err());
        assert!(draft("maintenance window").validated().is_ok());
    }

    #[test]
    fn apply_preserves_creation_date() {
        let created = timestamp_from_millis(1_700_000_000_000).expect("millis");
        let mut notice = Notice::new(
            NoticeId::parse("n1").expect("id"),
            draft("first"),
            created,
        );
        notice.mark_read();
        notice.apply(NoticeDraft {
            category: NoticeCategory::Maintenance,
            ..draft("second")
        });
        assert_eq!(notice.title, "second");
        assert_eq!(notice.category, NoticeCategory::Maintenance);
        assert_eq!(notice.date, created);
        assert!(notice.read);
    }
}
