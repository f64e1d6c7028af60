use std::sync::Arc;

use uuid::Uuid;

use kuching::application::services::{ChatHistoryService, NewChatMessage};
use kuching::domain::UserId;

use crate::helpers::InMemoryRecordStore;

fn message(role: &str, content: &str) -> NewChatMessage {
    NewChatMessage {
        role: role.to_string(),
        content: content.to_string(),
        audio_file_id: None,
    }
}

#[tokio::test]
async fn given_many_conversations_when_listed_then_two_store_reads_suffice() {
    let store = Arc::new(InMemoryRecordStore::default());
    let service = ChatHistoryService::new(store.clone());
    let user_id = UserId::from_uuid(Uuid::new_v4());

    for i in 0..4 {
        let messages = (0..=i)
            .map(|j| message("user", &format!("message {}", j)))
            .collect();
        service
            .save(user_id, &format!("conversation {}", i), messages)
            .await
            .unwrap();
    }

    let reads_before = store.read_count();
    let listed = service.list(user_id, 50).await.unwrap();

    // One read for the conversations, one for all their messages.
    assert_eq!(store.read_count() - reads_before, 2);

    assert_eq!(listed.len(), 4);
    for (conversation, count) in &listed {
        let index: usize = conversation
            .title
            .trim_start_matches("conversation ")
            .parse()
            .unwrap();
        assert_eq!(*count, index + 1);
    }
}

#[tokio::test]
async fn given_no_conversations_when_listed_then_empty_without_message_read() {
    let store = Arc::new(InMemoryRecordStore::default());
    let service = ChatHistoryService::new(store.clone());

    let listed = service
        .list(UserId::from_uuid(Uuid::new_v4()), 50)
        .await
        .unwrap();

    assert!(listed.is_empty());
    // The empty id set short-circuits the message fetch.
    assert_eq!(store.read_count(), 1);
}

#[tokio::test]
async fn given_two_users_when_listed_then_counts_stay_per_owner() {
    let store = Arc::new(InMemoryRecordStore::default());
    let service = ChatHistoryService::new(store.clone());
    let owner = UserId::from_uuid(Uuid::new_v4());
    let other = UserId::from_uuid(Uuid::new_v4());

    service
        .save(owner, "mine", vec![message("user", "hello")])
        .await
        .unwrap();
    service
        .save(
            other,
            "theirs",
            vec![message("user", "a"), message("assistant", "b")],
        )
        .await
        .unwrap();

    let listed = service.list(owner, 50).await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].0.title, "mine");
    assert_eq!(listed[0].1, 1);
}
