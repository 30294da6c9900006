//! 管理员审核操作单元测试

#[cfg(test)]
mod moderation_service_tests {
    use std::sync::Arc;

    use domain::{AdminCapability, ChatScope, MessageId, UserEmail, UserId, UserProfile};

    use crate::error::ApplicationError;
    use crate::repository::{MockMessageStore, MockPresenceStore, StoreError};
    use crate::services::moderation_service::{Confirmation, ModerationService};

    fn admin() -> AdminCapability {
        let email = UserEmail::parse("admin@notice.com").expect("email");
        let profile = UserProfile::registered_from_email(
            UserId::parse("admin-uid").expect("id"),
            email.clone(),
        );
        AdminCapability::issue(&profile, &email).expect("admin capability")
    }

    fn service(
        presence: MockPresenceStore,
        messages: MockMessageStore,
    ) -> ModerationService {
        ModerationService::new(Arc::new(presence), Arc::new(messages))
    }

    #[tokio::test]
    async fn test_remove_user_delegates_to_store() {
        let mut presence = MockPresenceStore::new();
        presence
            .expect_remove()
            .withf(|id| id.as_str() == "u1")
            .returning(|_| Ok(()));
        let service = service(presence, MockMessageStore::new());

        let result = service
            .remove_user(&admin(), &UserId::parse("u1").expect("id"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_remove_message_targets_requested_scope() {
        let mut messages = MockMessageStore::new();
        messages
            .expect_remove()
            .withf(|scope, id| scope == &ChatScope::Global && id.as_str() == "m1")
            .returning(|_, _| Ok(()));
        let service = service(MockPresenceStore::new(), messages);

        let result = service
            .remove_message(
                &admin(),
                &ChatScope::Global,
                &MessageId::parse("m1").expect("id"),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_clear_messages_requires_confirmation_token() {
        let mut messages = MockMessageStore::new();
        messages
            .expect_clear()
            .withf(|scope| scope == &ChatScope::Global)
            .returning(|_| Ok(()));
        let service = service(MockPresenceStore::new(), messages);

        let result = service
            .clear_messages(&admin(), &ChatScope::Global, Confirmation::confirmed())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_remove_all_users_clears_presence_table() {
        let mut presence = MockPresenceStore::new();
        presence.expect_clear().returning(|| Ok(()));
        let service = service(presence, MockMessageStore::new());

        let result = service
            .remove_all_users(&admin(), Confirmation::confirmed())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_failures_are_reported_not_fatal() {
        let mut presence = MockPresenceStore::new();
        presence
            .expect_remove()
            .returning(|_| Err(StoreError::PermissionDenied("denied".to_owned())));
        let service = service(presence, MockMessageStore::new());

        let result = service
            .remove_user(&admin(), &UserId::parse("u1").expect("id"))
            .await;
        assert!(matches!(result, Err(ApplicationError::Store(_))));
    }
}
