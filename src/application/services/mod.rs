mod call_library_service;
mod chat_history_service;
mod context_assembler;
mod history;
mod query_service;
mod summary_service;

pub use call_library_service::{CallLibraryService, LibraryError, SummaryPatch};
pub use chat_history_service::{ChatHistoryService, HistoryError, NewChatMessage};
pub use context_assembler::{ContextLimits, assemble};
pub use history::normalize_history;
pub use query_service::{
    AnswerRoute, QueryError, QueryResult, QueryService, SourceDocument, route_for,
};
pub use summary_service::{CallSummary, SummaryError, SummaryService};
