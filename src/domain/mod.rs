mod backend_choice;
mod call_record;
mod conversation;
mod conversation_turn;
mod embedding;
mod message;
mod user_id;

pub use backend_choice::BackendChoice;
pub use call_record::{CallId, CallRecord};
pub use conversation::{Conversation, ConversationId};
pub use conversation_turn::ConversationTurn;
pub use embedding::Embedding;
pub use message::{ChatMessage, MessageId};
pub use user_id::UserId;
