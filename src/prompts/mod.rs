//! Prompt text for the agent's model calls
//!
//! Three call sites use the generative model: intent classification, general
//! chat, and the summarize/relay steps of the search and document handlers.
//! All of their fixed instruction text lives here.

/// Instructions for the intent classifier
///
/// The model must answer with a single label token. Anything else is
/// normalized away or falls back to chat in the router.
pub const ROUTER_INSTRUCTIONS: &str = r#"Classify the user's intent into exactly one word, with no explanation and no punctuation.

Rules:
- Reply 'document' if they want to convert, process, or extract data from a document file.
- Reply 'search' if they want current/real-time info, news, prices, or ask you to search the web.
- Reply 'chat' for everything else (general questions, coding help, advice, math, etc.).

Examples:
  'convert my tax pdf' -> document
  'what is the weather today' -> search
  'explain recursion' -> chat
  'latest bitcoin price' -> search
  'process invoice.pdf' -> document"#;

/// System prompt for the general conversation handler
pub const CHAT_SYSTEM_PROMPT: &str = r#"You are a helpful AI assistant with three capabilities:
1. General conversation and question answering.
2. Web search: you can look up current information online.
3. Document conversion: you can extract tax return data from tax documents into CSV files.

Be concise, accurate, and friendly."#;

/// System prompt for summarizing web search results
pub const SEARCH_SUMMARY_SYSTEM_PROMPT: &str = "You are a research assistant. \
The user asked a question and you ran a web search. \
Summarise the search results below into a clear, concise answer. \
Cite sources with [1], [2], etc. where relevant.";

/// System prompt for relaying a conversion summary to the user
pub const RELAY_SYSTEM_PROMPT: &str = "You are a helpful assistant. Relay the \
following document conversion result to the user in a clear, friendly way.";

/// Build the user message for the search summarization call
///
/// # Arguments
///
/// * `query` - The user's original question
/// * `results` - Formatted search results, already numbered for citation
pub fn build_search_summary_prompt(query: &str, results: &str) -> String {
    format!("User question: {}\n\nSearch results:\n{}", query, results)
}
