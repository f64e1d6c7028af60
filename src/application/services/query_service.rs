use std::sync::Arc;

use crate::application::ports::{
    ChatBackendError, ChatBackendFactory, Embedder, EmbedderError, PromptMessage, RecordStore,
    RecordStoreError, ScoredDocument, VectorIndex, VectorIndexError,
};
use crate::application::services::context_assembler::{self, ContextLimits};
use crate::application::services::history::normalize_history;
use crate::domain::{BackendChoice, CallId, CallRecord, ConversationTurn, UserId};

const CALL_RECORDS_TABLE: &str = "call_records";

const DIRECT_SYSTEM_PROMPT: &str = "You are an AI assistant specialized in analyzing call summaries and transcripts.
Your role is to help users understand their call data by answering questions based on the provided context.

Instructions:
- Provide clear, concise answers based on the context provided
- When multiple calls are available, pay attention to which call the user is asking about
- If a specific call is marked as \"CURRENTLY SELECTED CALL\", prioritize information from that call
- If the user's question is ambiguous about which call they're referring to, politely ask for clarification
- Reference specific calls by their filename or timestamp when relevant
- When listing information from multiple calls, clearly indicate which call each piece of information comes from
- If the context doesn't contain relevant information, politely say so
- Never say you cannot process files or attachments - all voice recordings are automatically transcribed for you
- Focus on answering the user's actual question based on the call data context provided";

const RETRIEVAL_SYSTEM_PROMPT: &str = "You are an AI assistant answering questions about recorded calls.
Answer using only the reference documents below. If they do not contain the answer, say so.";

/// Which answer path a request takes. Decided once, from the assembled
/// context alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerRoute {
    Direct,
    Retrieval,
}

/// Non-empty context means the user has grounding data of their own.
pub fn route_for(context: &str) -> AnswerRoute {
    if context.is_empty() {
        AnswerRoute::Retrieval
    } else {
        AnswerRoute::Direct
    }
}

/// One cited source in a query answer.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub content: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct QueryResult {
    pub answer: String,
    pub sources: Vec<SourceDocument>,
    pub backend_used: BackendChoice,
}

impl QueryResult {
    /// The single place the response shape is produced. The direct path
    /// inlines context into the prompt rather than citing documents, so
    /// its sources are forced empty here instead of trusting each path.
    fn normalized(
        route: AnswerRoute,
        answer: String,
        sources: Vec<ScoredDocument>,
        backend_used: BackendChoice,
    ) -> Self {
        let sources = match route {
            AnswerRoute::Direct => Vec::new(),
            AnswerRoute::Retrieval => sources
                .into_iter()
                .map(|doc| SourceDocument {
                    content: doc.content,
                    metadata: doc.metadata,
                })
                .collect(),
        };
        Self {
            answer,
            sources,
            backend_used,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("record fetch failed: {0}")]
    RecordFetch(#[from] RecordStoreError),
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("similarity search failed: {0}")]
    Search(#[from] VectorIndexError),
    #[error("generation failed: {0}")]
    Generation(#[from] ChatBackendError),
}

/// The query-answering orchestration engine.
///
/// Per request: one record-store read, context assembly, one route
/// decision, at most one embedding call and one index search (retrieval
/// path only), and exactly one generation call. No upstream call is
/// retried; the first failure ends the request.
pub struct QueryService {
    record_store: Arc<dyn RecordStore>,
    embedder: Arc<dyn Embedder>,
    vector_index: Arc<dyn VectorIndex>,
    backend_factory: Arc<dyn ChatBackendFactory>,
    limits: ContextLimits,
    top_k: usize,
}

impl QueryService {
    pub fn new(
        record_store: Arc<dyn RecordStore>,
        embedder: Arc<dyn Embedder>,
        vector_index: Arc<dyn VectorIndex>,
        backend_factory: Arc<dyn ChatBackendFactory>,
        limits: ContextLimits,
        top_k: usize,
    ) -> Self {
        Self {
            record_store,
            embedder,
            vector_index,
            backend_factory,
            limits,
            top_k,
        }
    }

    #[tracing::instrument(skip(self, question, history), fields(user_id = %user_id.as_uuid()))]
    pub async fn answer(
        &self,
        user_id: UserId,
        question: &str,
        history: &[ConversationTurn],
        model_choice: Option<&str>,
        selected_call_id: Option<CallId>,
    ) -> Result<QueryResult, QueryError> {
        let backend_choice = resolve_backend_choice(model_choice);
        let records = self.fetch_call_records(user_id).await?;
        let context = context_assembler::assemble(&records, selected_call_id, &self.limits);
        let route = route_for(&context);

        tracing::info!(
            records = records.len(),
            route = ?route,
            backend = %backend_choice,
            "answering query"
        );

        let backend = self.backend_factory.create(backend_choice);
        let normalized_history = normalize_history(history);

        let (answer, sources) = match route {
            AnswerRoute::Direct => {
                let system = format!("{}\n\n{}", DIRECT_SYSTEM_PROMPT, context);
                let messages = build_messages(system, normalized_history, question);
                let answer = backend.generate(&messages).await?;
                (answer, Vec::new())
            }
            AnswerRoute::Retrieval => {
                let query_embedding = self.embedder.embed(question).await?;
                let documents = self.vector_index.search(&query_embedding, self.top_k).await?;
                let system = retrieval_system_prompt(&documents);
                let messages = build_messages(system, normalized_history, question);
                let answer = backend.generate(&messages).await?;
                (answer, documents)
            }
        };

        Ok(QueryResult::normalized(route, answer, sources, backend_choice))
    }

    /// Always filtered by the owner id; that filter is the tenant
    /// isolation boundary.
    async fn fetch_call_records(&self, user_id: UserId) -> Result<Vec<CallRecord>, QueryError> {
        let rows = self
            .record_store
            .fetch(
                CALL_RECORDS_TABLE,
                &[("user_id", user_id.as_uuid().to_string())],
                Some("created_at.desc"),
                None,
            )
            .await?;

        // A row that does not deserialize is skipped, not fatal: one bad
        // record must not take down every query the user makes.
        let records = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<CallRecord>(row) {
                Ok(record) => Some(record),
                Err(error) => {
                    tracing::warn!(%error, "skipping malformed call record row");
                    None
                }
            })
            .collect();

        Ok(records)
    }
}

fn resolve_backend_choice(raw: Option<&str>) -> BackendChoice {
    match raw {
        None => BackendChoice::default(),
        Some(value) => BackendChoice::try_parse(value).unwrap_or_else(|| {
            tracing::warn!(model_choice = %value, "unknown model choice, using default backend");
            BackendChoice::default()
        }),
    }
}

fn build_messages(
    system: String,
    history: Vec<PromptMessage>,
    question: &str,
) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(PromptMessage::system(system));
    messages.extend(history);
    messages.push(PromptMessage::user(question));
    messages
}

fn retrieval_system_prompt(documents: &[ScoredDocument]) -> String {
    let mut prompt = String::from(RETRIEVAL_SYSTEM_PROMPT);
    prompt.push_str("\n\nReference documents:");
    for (rank, doc) in documents.iter().enumerate() {
        prompt.push_str(&format!("\n\n[{}] {}", rank + 1, doc.content));
    }
    prompt
}
