//! 管理员审核端到端流程测试
//!
//! 覆盖：管理员邮箱签发能力令牌、清空全局消息后投影为空、
//! 删除单条消息、删除不存在的用户是空操作且不影响其他记录、
//! 清空在线状态表。

mod support;

use application::{
    ChatService, ChatServiceDependencies, Confirmation, ModerationService, RosterService,
    SystemClock,
};
use domain::{ChatScope, UserId};
use std::sync::Arc;

use support::{backend, session_service};

#[tokio::test]
async fn admin_clears_global_chat() {
    let backend = backend();
    let sessions = session_service(&backend);

    let admin = sessions
        .create_account("admin", "admin@notice.com", "secret1")
        .await
        .expect("create admin account");
    assert!(admin.is_admin());

    let alice = sessions
        .create_account("alice", "alice@example.com", "secret1")
        .await
        .expect("create account");
    assert!(!alice.is_admin());

    let mut chat = ChatService::open(
        ChatServiceDependencies {
            message_store: backend.message_store(),
            clock: Arc::new(SystemClock),
        },
        alice,
    );
    chat.send("one").await.expect("send");
    chat.send("two").await.expect("send");
    assert!(chat.next_delivery().await);
    assert_eq!(chat.timeline().len(), 2);

    let moderation = ModerationService::new(backend.presence_store(), backend.message_store());
    let capability = admin.admin.expect("admin capability");
    moderation
        .clear_messages(&capability, &ChatScope::Global, Confirmation::confirmed())
        .await
        .expect("clear messages");

    // 清空后的快照投影为空序列
    assert!(chat.next_delivery().await);
    assert!(chat.timeline().is_empty());
}

#[tokio::test]
async fn admin_removes_single_message() {
    let backend = backend();
    let sessions = session_service(&backend);

    let admin = sessions
        .create_account("admin", "admin@notice.com", "secret1")
        .await
        .expect("create admin account");
    let alice = sessions
        .create_account("alice", "alice@example.com", "secret1")
        .await
        .expect("create account");

    let mut chat = ChatService::open(
        ChatServiceDependencies {
            message_store: backend.message_store(),
            clock: Arc::new(SystemClock),
        },
        alice,
    );
    let keep = chat.send("keep").await.expect("send").expect("durable id");
    let drop_id = chat.send("drop").await.expect("send").expect("durable id");
    assert_ne!(keep, drop_id);

    let moderation = ModerationService::new(backend.presence_store(), backend.message_store());
    let capability = admin.admin.expect("admin capability");
    moderation
        .remove_message(&capability, &ChatScope::Global, &drop_id)
        .await
        .expect("remove message");

    assert!(chat.next_delivery().await);
    let texts: Vec<String> = chat.timeline().into_iter().map(|m| m.text).collect();
    assert_eq!(texts, vec!["keep"]);
}

#[tokio::test]
async fn removing_absent_user_is_a_no_op() {
    let backend = backend();
    let sessions = session_service(&backend);

    let admin = sessions
        .create_account("admin", "admin@notice.com", "secret1")
        .await
        .expect("create admin account");
    let alice = sessions
        .create_account("alice", "alice@example.com", "secret1")
        .await
        .expect("create account");

    let moderation = ModerationService::new(backend.presence_store(), backend.message_store());
    let capability = admin.admin.expect("admin capability");

    moderation
        .remove_user(&capability, &UserId::parse("no-such-user").expect("id"))
        .await
        .expect("absent id is a no-op");

    // 其他记录原样保留
    let roster = RosterService::subscribe(
        &backend.presence_store(),
        admin.profile.id.clone(),
        false,
    );
    assert!(roster
        .roster()
        .online
        .iter()
        .any(|entry| entry.id == alice.profile.id));
}

#[tokio::test]
async fn admin_clears_presence_table() {
    let backend = backend();
    let sessions = session_service(&backend);

    let admin = sessions
        .create_account("admin", "admin@notice.com", "secret1")
        .await
        .expect("create admin account");
    sessions
        .create_account("alice", "alice@example.com", "secret1")
        .await
        .expect("create account");

    let moderation = ModerationService::new(backend.presence_store(), backend.message_store());
    let capability = admin.admin.expect("admin capability");

    let mut roster = RosterService::subscribe(
        &backend.presence_store(),
        admin.profile.id.clone(),
        false,
    );
    assert!(!roster.roster().online.is_empty());

    moderation
        .remove_all_users(&capability, Confirmation::confirmed())
        .await
        .expect("remove all users");

    assert!(roster.next_delivery().await);
    assert!(roster.roster().online.is_empty());
    assert!(roster.roster().offline.is_empty());
}
