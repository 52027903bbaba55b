//! Agent orchestration core
//!
//! This module implements the per-turn state machine:
//! - Restores checkpointed history for the session
//! - Routes the utterance to exactly one handler (chat, search, document)
//! - Appends the reply and checkpoints the new messages
//! - Records conversion artifacts in the session store
//!
//! Handler-level failures (missing files, empty documents) become
//! user-visible replies and the turn completes normally. Provider and
//! search faults propagate out of the turn before anything is
//! checkpointed; the interactive loop reports them and keeps running.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::agent::{router, Intent, TurnState};
use crate::config::Config;
use crate::convert;
use crate::error::Result;
use crate::prompts;
use crate::providers::{Message, Provider};
use crate::search::{self, SearchProvider};
use crate::storage::SqliteStore;

/// Result of one completed turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The agent's reply for this turn
    pub reply: String,
    /// The intent the turn was routed to
    pub intent: Intent,
    /// CSV artifact written this turn, if the document handler produced one
    pub artifact: Option<PathBuf>,
}

/// The conversational agent
///
/// Holds the generative provider, the search backend, and the session store
/// as explicit collaborators so each handler can be exercised with
/// substitutes in tests.
///
/// # Examples
///
/// ```ignore
/// use fiscus::agent::Agent;
/// use fiscus::config::Config;
/// use fiscus::providers::create_provider;
/// use fiscus::search::TavilyClient;
/// use fiscus::storage::SqliteStore;
///
/// # async fn example() -> fiscus::error::Result<()> {
/// let config = Config::default();
/// let provider = create_provider(&config)?;
/// let search = TavilyClient::new(&config.search, 30)?;
/// let store = SqliteStore::new()?;
///
/// let agent = Agent::new_boxed(provider, Box::new(search), store, config);
/// let outcome = agent.process_turn("session-1", "explain recursion").await?;
/// println!("{}", outcome.reply);
/// # Ok(())
/// # }
/// ```
pub struct Agent {
    provider: Arc<dyn Provider>,
    search: Arc<dyn SearchProvider>,
    store: SqliteStore,
    config: Config,
}

impl Agent {
    /// Creates a new agent instance
    ///
    /// # Arguments
    ///
    /// * `provider` - Generative provider used for classification and replies
    /// * `search` - Web search backend
    /// * `store` - Session and history store
    /// * `config` - Application configuration
    pub fn new(
        provider: impl Provider + 'static,
        search: impl SearchProvider + 'static,
        store: SqliteStore,
        config: Config,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            search: Arc::new(search),
            store,
            config,
        }
    }

    /// Creates a new agent instance from boxed collaborators
    ///
    /// Useful when the provider type is chosen at runtime by the factory.
    pub fn new_boxed(
        provider: Box<dyn Provider>,
        search: Box<dyn SearchProvider>,
        store: SqliteStore,
        config: Config,
    ) -> Self {
        Self {
            provider: Arc::from(provider),
            search: Arc::from(search),
            store,
            config,
        }
    }

    /// Returns a reference to the session store
    ///
    /// The interactive loop uses this for history and session listings.
    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// Process one conversational turn
    ///
    /// Restores the session's history, classifies the utterance, dispatches
    /// to the matching handler, and checkpoints the new user and assistant
    /// messages.
    ///
    /// # Arguments
    ///
    /// * `session_id` - Session identifier for checkpointing
    /// * `input` - The user's utterance
    ///
    /// # Errors
    ///
    /// Returns error when a provider, search, or storage call fails. In
    /// that case nothing from this turn is checkpointed.
    pub async fn process_turn(&self, session_id: &str, input: &str) -> Result<TurnOutcome> {
        let mut state = self.begin_turn(session_id, input)?;

        let intent = router::classify(self.provider.as_ref(), input).await?;
        state.intent = Some(intent);

        self.finish_turn(session_id, state).await
    }

    /// Process a turn that the convert command routed directly to the
    /// document handler
    ///
    /// The classifier is bypassed entirely; the turn is a document turn no
    /// matter what the utterance looks like.
    ///
    /// # Arguments
    ///
    /// * `session_id` - Session identifier for checkpointing
    /// * `input` - The raw command text, stored as the user message
    /// * `source` - Path extracted from the convert command
    pub async fn process_document_turn(
        &self,
        session_id: &str,
        input: &str,
        source: &Path,
    ) -> Result<TurnOutcome> {
        let mut state = self.begin_turn(session_id, input)?;
        state.intent = Some(Intent::Document);
        state.source_path = Some(source.to_path_buf());

        self.finish_turn(session_id, state).await
    }

    fn begin_turn(&self, session_id: &str, input: &str) -> Result<TurnState> {
        let history = self.store.load_history(session_id)?;
        debug!(
            session = session_id,
            history_len = history.len(),
            "Restored checkpoint"
        );

        let mut state = TurnState::with_history(history);
        state.messages.push(Message::user(input));
        Ok(state)
    }

    async fn finish_turn(&self, session_id: &str, mut state: TurnState) -> Result<TurnOutcome> {
        let intent = state.intent.unwrap_or(Intent::Chat);

        let reply = match intent {
            Intent::Chat => self.handle_chat(&state).await?,
            Intent::Search => self.handle_search(&state).await?,
            Intent::Document => self.handle_document(&mut state).await?,
        };
        state.messages.push(Message::assistant(reply.clone()));

        // Checkpoint exactly this turn's two new messages.
        let new_messages = &state.messages[state.messages.len() - 2..];
        self.store.append_history(session_id, new_messages)?;
        self.store.create_or_touch(session_id, new_messages.len())?;

        if let Some(artifact) = &state.artifact_path {
            if let Some(source) = &state.source_path {
                self.store.record_conversion(
                    session_id,
                    &source.to_string_lossy(),
                    &artifact.to_string_lossy(),
                )?;
            }
        }

        info!(session = session_id, intent = %intent, "Turn complete");

        Ok(TurnOutcome {
            reply,
            intent,
            artifact: state.artifact_path,
        })
    }

    /// General conversation: system instructions plus full history
    async fn handle_chat(&self, state: &TurnState) -> Result<String> {
        let mut messages = Vec::with_capacity(state.messages.len() + 1);
        messages.push(Message::system(prompts::CHAT_SYSTEM_PROMPT));
        messages.extend_from_slice(&state.messages);

        let response = self.provider.complete(&messages).await?;
        Ok(response.text().to_string())
    }

    /// Web research: search, then summarize the results with citations
    async fn handle_search(&self, state: &TurnState) -> Result<String> {
        let query = state.latest_user_text().unwrap_or_default();

        let results = self
            .search
            .search(query, self.config.search.max_results)
            .await?;
        let formatted = search::format_results(&results);
        debug!(count = results.len(), "Search results fetched");

        let messages = vec![
            Message::system(prompts::SEARCH_SUMMARY_SYSTEM_PROMPT),
            Message::user(prompts::build_search_summary_prompt(query, &formatted)),
        ];
        let response = self.provider.complete(&messages).await?;
        Ok(response.text().to_string())
    }

    /// Document conversion: run the pipeline and relay its summary
    ///
    /// Missing paths, unreadable files, and extraction failures become
    /// replies rather than errors; only the relay call itself can fault.
    async fn handle_document(&self, state: &mut TurnState) -> Result<String> {
        let source = match &state.source_path {
            Some(path) => path.clone(),
            None => {
                return Ok(
                    "I'd love to convert a document for you! Please provide the path to your file.\n\
                     Example: `convert /path/to/tax_document.pdf`"
                        .to_string(),
                )
            }
        };

        if !source.is_file() {
            return Ok(format!(
                "File not found: `{}`\nPlease check the path and try again.",
                source.display()
            ));
        }

        let output_dir = Path::new(&self.config.agent.output_dir);
        match convert::convert_document(&source, output_dir) {
            Ok(conversion) => {
                let messages = vec![
                    Message::system(prompts::RELAY_SYSTEM_PROMPT),
                    Message::user(conversion.summary),
                ];
                let response = self.provider.complete(&messages).await?;

                state.artifact_path = Some(conversion.csv_path);
                Ok(response.text().to_string())
            }
            Err(e) => Ok(format!("Error processing document: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FiscusError;
    use crate::providers::CompletionResponse;
    use crate::search::SearchResult;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::{tempdir, TempDir};

    /// Mock provider replaying scripted responses in order
    struct MockProvider {
        responses: Vec<Message>,
        call_count: Arc<Mutex<usize>>,
        requests: Arc<Mutex<Vec<Vec<Message>>>>,
    }

    impl MockProvider {
        fn new(responses: Vec<Message>) -> Self {
            Self {
                responses,
                call_count: Arc::new(Mutex::new(0)),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }

        fn handles(&self) -> (Arc<Mutex<usize>>, Arc<Mutex<Vec<Vec<Message>>>>) {
            (Arc::clone(&self.call_count), Arc::clone(&self.requests))
        }
    }

    #[async_trait]
    impl Provider for MockProvider {
        async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse> {
            self.requests.lock().unwrap().push(messages.to_vec());

            let mut count = self.call_count.lock().unwrap();
            let index = *count;
            *count += 1;

            if index < self.responses.len() {
                Ok(CompletionResponse::new(self.responses[index].clone()))
            } else {
                Ok(CompletionResponse::new(Message::assistant("Done")))
            }
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl Provider for FailingProvider {
        async fn complete(&self, _messages: &[Message]) -> Result<CompletionResponse> {
            Err(FiscusError::Provider("connection refused".to_string()).into())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Mock search backend returning fixed results
    struct MockSearch {
        results: Vec<SearchResult>,
        queries: Arc<Mutex<Vec<String>>>,
    }

    impl MockSearch {
        fn new(results: Vec<SearchResult>) -> Self {
            Self {
                results,
                queries: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn empty() -> Self {
            Self::new(Vec::new())
        }
    }

    #[async_trait]
    impl SearchProvider for MockSearch {
        async fn search(&self, query: &str, _max_results: usize) -> Result<Vec<SearchResult>> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.results.clone())
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    struct FailingSearch;

    #[async_trait]
    impl SearchProvider for FailingSearch {
        async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<SearchResult>> {
            Err(FiscusError::Search("search API unreachable".to_string()).into())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn test_agent(
        provider: impl Provider + 'static,
        search: impl SearchProvider + 'static,
    ) -> (Agent, TempDir) {
        let dir = tempdir().expect("failed to create tempdir");
        let store =
            SqliteStore::new_with_path(dir.path().join("fiscus.db")).expect("failed to open store");

        let mut config = Config::default();
        config.agent.output_dir = dir.path().join("output").to_string_lossy().into_owned();

        (Agent::new(provider, search, store, config), dir)
    }

    #[tokio::test]
    async fn test_chat_turn_replies_and_checkpoints() {
        let provider = MockProvider::new(vec![
            Message::assistant("chat"),
            Message::assistant("Recursion is a function calling itself."),
        ]);
        let (count, _) = provider.handles();
        let (agent, _dir) = test_agent(provider, MockSearch::empty());

        let outcome = agent
            .process_turn("s1", "explain recursion")
            .await
            .unwrap();

        assert_eq!(outcome.intent, Intent::Chat);
        assert_eq!(outcome.reply, "Recursion is a function calling itself.");
        assert!(outcome.artifact.is_none());
        assert_eq!(*count.lock().unwrap(), 2);

        let history = agent.store().load_history("s1").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], Message::user("explain recursion"));
        assert!(history[1].is_assistant());

        let sessions = agent.store().list_recent_sessions(10).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].message_count, 2);
    }

    #[tokio::test]
    async fn test_chat_handler_sends_system_prompt_and_full_history() {
        let provider = MockProvider::new(vec![
            Message::assistant("chat"),
            Message::assistant("first"),
            Message::assistant("chat"),
            Message::assistant("second"),
        ]);
        let (_, requests) = provider.handles();
        let (agent, _dir) = test_agent(provider, MockSearch::empty());

        agent.process_turn("s1", "question one").await.unwrap();
        agent.process_turn("s1", "question two").await.unwrap();

        let requests = requests.lock().unwrap();
        // Calls: classify, chat, classify, chat.
        assert_eq!(requests.len(), 4);

        let second_chat = &requests[3];
        assert_eq!(second_chat.len(), 4);
        assert_eq!(second_chat[0].role, "system");
        assert!(second_chat[0].content.contains("helpful AI assistant"));
        assert_eq!(second_chat[1], Message::user("question one"));
        assert_eq!(second_chat[2], Message::assistant("first"));
        assert_eq!(second_chat[3], Message::user("question two"));
    }

    #[tokio::test]
    async fn test_message_count_accumulates_across_turns() {
        let provider = MockProvider::new(vec![
            Message::assistant("chat"),
            Message::assistant("a"),
            Message::assistant("chat"),
            Message::assistant("b"),
        ]);
        let (agent, _dir) = test_agent(provider, MockSearch::empty());

        agent.process_turn("s1", "one").await.unwrap();
        agent.process_turn("s1", "two").await.unwrap();

        let sessions = agent.store().list_recent_sessions(10).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].message_count, 4);
    }

    #[tokio::test]
    async fn test_unknown_label_falls_back_to_chat() {
        let provider = MockProvider::new(vec![
            Message::assistant("definitely a document request"),
            Message::assistant("Fallback reply"),
        ]);
        let (agent, _dir) = test_agent(provider, MockSearch::empty());

        let outcome = agent.process_turn("s1", "process invoice.pdf").await.unwrap();

        assert_eq!(outcome.intent, Intent::Chat);
        assert_eq!(outcome.reply, "Fallback reply");
    }

    #[tokio::test]
    async fn test_search_turn_queries_backend_and_summarizes() {
        let provider = MockProvider::new(vec![
            Message::assistant("search"),
            Message::assistant("BTC is around $60k [1]."),
        ]);
        let (_, requests) = provider.handles();
        let search = MockSearch::new(vec![SearchResult {
            title: "Market Watch".to_string(),
            url: "https://example.com/btc".to_string(),
            content: "Bitcoin trades near $60,000".to_string(),
        }]);
        let queries = Arc::clone(&search.queries);
        let (agent, _dir) = test_agent(provider, search);

        let outcome = agent
            .process_turn("s1", "latest bitcoin price")
            .await
            .unwrap();

        assert_eq!(outcome.intent, Intent::Search);
        assert_eq!(outcome.reply, "BTC is around $60k [1].");
        assert_eq!(*queries.lock().unwrap(), vec!["latest bitcoin price"]);

        let requests = requests.lock().unwrap();
        let summary_request = &requests[1];
        assert_eq!(summary_request[0].role, "system");
        assert!(summary_request[0].content.contains("research assistant"));
        assert!(summary_request[1]
            .content
            .contains("User question: latest bitcoin price"));
        assert!(summary_request[1].content.contains("[1] Market Watch"));
    }

    #[tokio::test]
    async fn test_search_turn_with_no_results_still_summarizes() {
        let provider = MockProvider::new(vec![
            Message::assistant("search"),
            Message::assistant("I could not find anything current."),
        ]);
        let (_, requests) = provider.handles();
        let (agent, _dir) = test_agent(provider, MockSearch::empty());

        let outcome = agent.process_turn("s1", "obscure topic").await.unwrap();

        assert_eq!(outcome.intent, Intent::Search);
        let requests = requests.lock().unwrap();
        assert!(requests[1][1].content.contains("No results found."));
    }

    #[tokio::test]
    async fn test_document_intent_without_path_asks_for_one() {
        let provider = MockProvider::new(vec![Message::assistant("document")]);
        let (count, _) = provider.handles();
        let (agent, _dir) = test_agent(provider, MockSearch::empty());

        let outcome = agent
            .process_turn("s1", "can you convert my tax form")
            .await
            .unwrap();

        assert_eq!(outcome.intent, Intent::Document);
        assert!(outcome.reply.contains("provide the path"));
        assert!(outcome.artifact.is_none());
        // Only the classification call; no relay happens.
        assert_eq!(*count.lock().unwrap(), 1);

        // The clarifying reply is still a normal turn.
        let history = agent.store().load_history("s1").unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_convert_command_bypasses_classifier() {
        let provider = MockProvider::new(vec![]);
        let (count, _) = provider.handles();
        let (agent, _dir) = test_agent(provider, MockSearch::empty());

        let outcome = agent
            .process_document_turn(
                "s1",
                "convert /nonexistent/report.pdf",
                Path::new("/nonexistent/report.pdf"),
            )
            .await
            .unwrap();

        assert_eq!(outcome.intent, Intent::Document);
        assert!(outcome.reply.contains("File not found"));
        assert!(outcome.reply.contains("/nonexistent/report.pdf"));
        // No classification, no relay.
        assert_eq!(*count.lock().unwrap(), 0);
        assert!(agent.store().list_conversions(Some("s1")).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_document_turn_converts_and_records() {
        let provider = MockProvider::new(vec![Message::assistant(
            "All done! Your CSV is ready with 2 extracted fields.",
        )]);
        let (_, requests) = provider.handles();
        let (agent, dir) = test_agent(provider, MockSearch::empty());

        let source = dir.path().join("w2.txt");
        std::fs::write(&source, "Wages: $55,000.00, Filing Status: Single").unwrap();

        let outcome = agent
            .process_document_turn("s1", &format!("convert {}", source.display()), &source)
            .await
            .unwrap();

        assert_eq!(outcome.intent, Intent::Document);
        assert_eq!(
            outcome.reply,
            "All done! Your CSV is ready with 2 extracted fields."
        );

        let artifact = outcome.artifact.expect("artifact path missing");
        assert!(artifact.exists());
        assert_eq!(artifact.file_name().unwrap(), "w2_tax_return.csv");

        // The relay call carries the extraction summary.
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0][0].content.contains("friendly way"));
        assert!(requests[0][1].content.contains("Fields extracted (2):"));

        let conversions = agent.store().list_conversions(Some("s1")).unwrap();
        assert_eq!(conversions.len(), 1);
        assert!(conversions[0].csv_file.ends_with("w2_tax_return.csv"));
    }

    #[tokio::test]
    async fn test_document_turn_with_empty_file_reports_extraction_error() {
        let provider = MockProvider::new(vec![]);
        let (count, _) = provider.handles();
        let (agent, dir) = test_agent(provider, MockSearch::empty());

        let source = dir.path().join("blank.txt");
        std::fs::write(&source, "   \n").unwrap();

        let outcome = agent
            .process_document_turn("s1", &format!("convert {}", source.display()), &source)
            .await
            .unwrap();

        assert!(outcome.reply.contains("Error processing document"));
        assert!(outcome.reply.contains("No text could be extracted"));
        assert!(outcome.artifact.is_none());
        assert_eq!(*count.lock().unwrap(), 0);
        assert!(agent.store().list_conversions(Some("s1")).unwrap().is_empty());

        // The error reply still completes the turn.
        let history = agent.store().load_history("s1").unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_provider_fault_propagates_and_checkpoints_nothing() {
        let (agent, _dir) = test_agent(FailingProvider, MockSearch::empty());

        let result = agent.process_turn("s1", "hello").await;
        assert!(result.is_err());

        assert!(agent.store().load_history("s1").unwrap().is_empty());
        assert!(agent.store().list_recent_sessions(10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_fault_propagates_and_checkpoints_nothing() {
        let provider = MockProvider::new(vec![Message::assistant("search")]);
        let (agent, _dir) = test_agent(provider, FailingSearch);

        let result = agent.process_turn("s1", "what's the weather right now").await;
        assert!(result.is_err());

        assert!(agent.store().load_history("s1").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let provider = MockProvider::new(vec![
            Message::assistant("chat"),
            Message::assistant("reply for s1"),
            Message::assistant("chat"),
            Message::assistant("reply for s2"),
        ]);
        let (agent, _dir) = test_agent(provider, MockSearch::empty());

        agent.process_turn("s1", "first session").await.unwrap();
        agent.process_turn("s2", "second session").await.unwrap();

        let h1 = agent.store().load_history("s1").unwrap();
        let h2 = agent.store().load_history("s2").unwrap();
        assert_eq!(h1.len(), 2);
        assert_eq!(h2.len(), 2);
        assert_eq!(h1[0].content, "first session");
        assert_eq!(h2[0].content, "second session");
    }
}
