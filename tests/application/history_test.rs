use kuching::application::ports::PromptRole;
use kuching::application::services::normalize_history;
use kuching::domain::ConversationTurn;

#[test]
fn given_valid_turns_when_normalized_then_order_and_count_preserved() {
    let turns = vec![
        ConversationTurn::new("user", "first"),
        ConversationTurn::new("assistant", "second"),
        ConversationTurn::new("user", "third"),
    ];

    let messages = normalize_history(&turns);

    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].role, PromptRole::User);
    assert_eq!(messages[0].content, "first");
    assert_eq!(messages[1].role, PromptRole::Assistant);
    assert_eq!(messages[1].content, "second");
    assert_eq!(messages[2].role, PromptRole::User);
    assert_eq!(messages[2].content, "third");
}

#[test]
fn given_bogus_role_when_normalized_then_only_that_turn_is_dropped() {
    let turns = vec![
        ConversationTurn::new("user", "Hi"),
        ConversationTurn::new("bogus", "x"),
        ConversationTurn::new("assistant", "Hello"),
    ];

    let messages = normalize_history(&turns);

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, PromptRole::User);
    assert_eq!(messages[0].content, "Hi");
    assert_eq!(messages[1].role, PromptRole::Assistant);
    assert_eq!(messages[1].content, "Hello");
}

#[test]
fn given_empty_history_when_normalized_then_empty_list() {
    assert!(normalize_history(&[]).is_empty());
}

#[test]
fn given_system_role_when_normalized_then_it_is_not_forwarded() {
    let turns = vec![ConversationTurn::new("system", "you are helpful")];
    assert!(normalize_history(&turns).is_empty());
}
