use std::sync::Arc;

use crate::application::services::{
    CallLibraryService, ChatHistoryService, QueryService, SummaryService,
};
use crate::presentation::config::Settings;

/// Shared handler state: `Arc`-ed services constructed once at startup and
/// passed in explicitly. No process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub query_service: Arc<QueryService>,
    pub summary_service: Arc<SummaryService>,
    pub call_library: Arc<CallLibraryService>,
    pub chat_history: Arc<ChatHistoryService>,
    pub settings: Settings,
}
