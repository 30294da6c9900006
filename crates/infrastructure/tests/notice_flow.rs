//! 公告板端到端流程测试
//!
//! 覆盖：管理员发布/编辑/删除、编辑保留创建时间、搜索过滤、
//! 已读标记和集合推送。

mod support;

use application::{NoticeQuery, NoticeService};
use domain::{NoticeCategory, NoticeDraft, NoticePriority};

use support::{backend, session_service};

fn draft(title: &str, category: NoticeCategory, priority: NoticePriority) -> NoticeDraft {
    NoticeDraft {
        title: title.to_owned(),
        content: format!("{title} content"),
        category,
        priority,
        author: "ops".to_owned(),
    }
}

#[tokio::test]
async fn admin_publishes_edits_and_deletes_notices() {
    let backend = backend();
    let sessions = session_service(&backend);

    let admin = sessions
        .create_account("admin", "admin@notice.com", "secret1")
        .await
        .expect("create admin account");
    let capability = admin.admin.expect("admin capability");

    let service = NoticeService::new(backend.notice_store());

    let created = service
        .create(
            &capability,
            draft(
                "Scheduled maintenance",
                NoticeCategory::Maintenance,
                NoticePriority::High,
            ),
        )
        .await
        .expect("create notice");
    assert!(!created.read);

    // 编辑替换内容字段，创建时间保持不变
    let updated = service
        .update(
            &capability,
            &created.id,
            draft(
                "Maintenance rescheduled",
                NoticeCategory::Maintenance,
                NoticePriority::Normal,
            ),
        )
        .await
        .expect("update notice");
    assert_eq!(updated.title, "Maintenance rescheduled");
    assert_eq!(updated.date, created.date);

    service
        .delete(&capability, &created.id)
        .await
        .expect("delete notice");
    // 删除是幂等的
    service
        .delete(&capability, &created.id)
        .await
        .expect("repeat delete is a no-op");

    let remaining = service
        .fetch_filtered(&NoticeQuery::default())
        .await
        .expect("fetch");
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn search_and_filters_scope_the_listing() {
    let backend = backend();
    let sessions = session_service(&backend);

    let admin = sessions
        .create_account("admin", "admin@notice.com", "secret1")
        .await
        .expect("create admin account");
    let capability = admin.admin.expect("admin capability");
    let service = NoticeService::new(backend.notice_store());

    service
        .create(
            &capability,
            draft("Database upgrade", NoticeCategory::Maintenance, NoticePriority::High),
        )
        .await
        .expect("create");
    service
        .create(
            &capability,
            draft("Release 2.4", NoticeCategory::Update, NoticePriority::Normal),
        )
        .await
        .expect("create");
    service
        .create(
            &capability,
            draft("Office closed", NoticeCategory::Announcement, NoticePriority::Low),
        )
        .await
        .expect("create");

    let by_text = service
        .fetch_filtered(&NoticeQuery {
            text: Some("database".to_owned()),
            ..NoticeQuery::default()
        })
        .await
        .expect("fetch");
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].title, "Database upgrade");

    let by_category = service
        .fetch_filtered(&NoticeQuery {
            category: Some(NoticeCategory::Update),
            ..NoticeQuery::default()
        })
        .await
        .expect("fetch");
    assert_eq!(by_category.len(), 1);

    let by_priority = service
        .fetch_filtered(&NoticeQuery {
            priority: Some(NoticePriority::High),
            ..NoticeQuery::default()
        })
        .await
        .expect("fetch");
    assert_eq!(by_priority.len(), 1);
    assert_eq!(by_priority[0].title, "Database upgrade");
}

#[tokio::test]
async fn readers_receive_collection_pushes_and_mark_read() {
    let backend = backend();
    let sessions = session_service(&backend);

    let admin = sessions
        .create_account("admin", "admin@notice.com", "secret1")
        .await
        .expect("create admin account");
    let capability = admin.admin.expect("admin capability");
    let service = NoticeService::new(backend.notice_store());

    let mut stream = service.subscribe();
    assert!(stream.current().is_empty());

    let created = service
        .create(
            &capability,
            draft("Release 2.4", NoticeCategory::Update, NoticePriority::Normal),
        )
        .await
        .expect("create");

    let delivered = stream.next().await.expect("collection push");
    assert_eq!(delivered.len(), 1);
    assert!(!delivered[0].read);

    service.mark_read(&created.id).await.expect("mark read");
    let delivered = stream.next().await.expect("collection push");
    assert!(delivered[0].read);
}
