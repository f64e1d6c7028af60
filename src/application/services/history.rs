use crate::application::ports::PromptMessage;
use crate::domain::ConversationTurn;

/// Converts caller-supplied history into the backend message format.
///
/// "user" and "assistant" turns map one to one, order preserved. A turn
/// with any other role is dropped with a warning rather than failing the
/// request. Empty history is valid and yields an empty list.
pub fn normalize_history(turns: &[ConversationTurn]) -> Vec<PromptMessage> {
    turns
        .iter()
        .filter_map(|turn| match turn.role.as_str() {
            "user" => Some(PromptMessage::user(turn.content.clone())),
            "assistant" => Some(PromptMessage::assistant(turn.content.clone())),
            other => {
                tracing::warn!(role = %other, "dropping history turn with unknown role");
                None
            }
        })
        .collect()
}
