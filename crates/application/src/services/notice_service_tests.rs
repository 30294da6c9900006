//! 公告板用例单元测试

#[cfg(test)]
mod notice_service_tests {
    use std::sync::Arc;

    use domain::{
        timestamp_from_millis, AdminCapability, Notice, NoticeCategory, NoticeDraft, NoticeId,
        NoticePriority, UserEmail, UserId, UserProfile,
    };

    use crate::error::ApplicationError;
    use crate::repository::MockNoticeStore;
    use crate::services::notice_service::{filter_notices, NoticeQuery, NoticeService};

    fn admin() -> AdminCapability {
        let email = UserEmail::parse("admin@notice.com").expect("email");
        let profile = UserProfile::registered_from_email(
            UserId::parse("admin-uid").expect("id"),
            email.clone(),
        );
        AdminCapability::issue(&profile, &email).expect("admin capability")
    }

    fn draft(title: &str) -> NoticeDraft {
        NoticeDraft {
            title: title.to_owned(),
            content: "content".to_owned(),
            category: NoticeCategory::General,
            priority: NoticePriority::Normal,
            author: "ops".to_owned(),
        }
    }

    fn notice(id: &str, title: &str, category: NoticeCategory, millis: i64) -> Notice {
        Notice::new(
            NoticeId::parse(id).expect("id"),
            NoticeDraft {
                category,
                ..draft(title)
            },
            timestamp_from_millis(millis).expect("millis"),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft_before_store() {
        // 没有设置任何期望：草稿校验失败时不应触达存储
        let service = NoticeService::new(Arc::new(MockNoticeStore::new()));

        let result = service.create(&admin(), draft("")).await;
        assert!(matches!(result, Err(ApplicationError::Domain(_))));
    }

    #[tokio::test]
    async fn test_create_returns_stored_notice() {
        let mut store = MockNoticeStore::new();
        store.expect_create().returning(|draft| {
            Ok(Notice::new(
                NoticeId::parse("n1").expect("id"),
                draft,
                timestamp_from_millis(1_000).expect("millis"),
            ))
        });
        let service = NoticeService::new(Arc::new(store));

        let created = service
            .create(&admin(), draft("maintenance window"))
            .await
            .expect("create");
        assert_eq!(created.title, "maintenance window");
        assert!(!created.read);
    }

    #[test]
    fn test_filter_matches_text_case_insensitively() {
        let notices = vec![
            notice("n1", "Database Maintenance", NoticeCategory::Maintenance, 1_000),
            notice("n2", "Release notes", NoticeCategory::Update, 2_000),
        ];

        let query = NoticeQuery {
            text: Some("MAINTENANCE".to_owned()),
            ..NoticeQuery::default()
        };
        let matched = filter_notices(&notices, &query);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id.as_str(), "n1");
    }

    #[test]
    fn test_filter_by_category_and_priority() {
        let notices = vec![
            notice("n1", "a", NoticeCategory::Maintenance, 1_000),
            notice("n2", "b", NoticeCategory::Update, 2_000),
        ];

        let by_category = filter_notices(
            &notices,
            &NoticeQuery {
                category: Some(NoticeCategory::Update),
                ..NoticeQuery::default()
            },
        );
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].id.as_str(), "n2");

        let by_priority = filter_notices(
            &notices,
            &NoticeQuery {
                priority: Some(NoticePriority::High),
                ..NoticeQuery::default()
            },
        );
        assert!(by_priority.is_empty());
    }

    #[test]
    fn test_filter_orders_newest_first() {
        let notices = vec![
            notice("old", "old", NoticeCategory::General, 1_000),
            notice("new", "new", NoticeCategory::General, 3_000),
            notice("mid", "mid", NoticeCategory::General, 2_000),
        ];

        let ordered = filter_notices(&notices, &NoticeQuery::default());
        let ids: Vec<&str> = ordered.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_mark_read_delegates_to_store() {
        let mut store = MockNoticeStore::new();
        store
            .expect_mark_read()
            .withf(|id| id.as_str() == "n1")
            .returning(|_| Ok(()));
        let service = NoticeService::new(Arc::new(store));

        service
            .mark_read(&NoticeId::parse("n1").expect("id"))
            .await
            .expect("mark read");
    }
}
