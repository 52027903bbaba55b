//! Base provider trait and common types for Fiscus
//!
//! This module defines the Provider trait that all AI providers must implement,
//! along with the message and response types shared by the chat, search
//! summarization, and conversion relay paths.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message structure for conversation
///
/// Represents a single message exchanged with the AI provider. Messages
/// are tagged as user-originated, agent-originated, or system instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user, assistant, system)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Arguments
    ///
    /// * `content` - The message content
    ///
    /// # Examples
    ///
    /// ```
    /// use fiscus::providers::Message;
    ///
    /// let msg = Message::user("Hello, assistant!");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    ///
    /// # Arguments
    ///
    /// * `content` - The message content
    ///
    /// # Examples
    ///
    /// ```
    /// use fiscus::providers::Message;
    ///
    /// let msg = Message::assistant("Hello, user!");
    /// assert_eq!(msg.role, "assistant");
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new system message
    ///
    /// # Arguments
    ///
    /// * `content` - The message content
    ///
    /// # Examples
    ///
    /// ```
    /// use fiscus::providers::Message;
    ///
    /// let msg = Message::system("You are a helpful assistant");
    /// assert_eq!(msg.role, "system");
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Whether this message is user-originated
    pub fn is_user(&self) -> bool {
        self.role == "user"
    }

    /// Whether this message is agent-originated
    pub fn is_assistant(&self) -> bool {
        self.role == "assistant"
    }
}

/// Completion response from a provider
///
/// Wraps the reply message returned by the generative capability.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The response message from the AI
    pub message: Message,
}

impl CompletionResponse {
    /// Create a new CompletionResponse
    ///
    /// # Arguments
    ///
    /// * `message` - The response message
    ///
    /// # Examples
    ///
    /// ```
    /// use fiscus::providers::{CompletionResponse, Message};
    ///
    /// let response = CompletionResponse::new(Message::assistant("Hello!"));
    /// assert_eq!(response.message.role, "assistant");
    /// ```
    pub fn new(message: Message) -> Self {
        Self { message }
    }

    /// The reply text
    pub fn text(&self) -> &str {
        &self.message.content
    }
}

/// Provider trait for AI providers
///
/// All AI providers (Ollama, OpenAI-compatible) must implement this trait.
/// One implementation serves both the classification and generation paths:
/// the router sends a classification instruction plus the latest utterance,
/// the handlers send system instructions plus history or a constructed prompt.
///
/// # Examples
///
/// ```no_run
/// use fiscus::providers::{Provider, Message, CompletionResponse};
/// use fiscus::error::Result;
/// use async_trait::async_trait;
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl Provider for MyProvider {
///     async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse> {
///         Ok(CompletionResponse::new(Message::assistant("Response")))
///     }
///
///     fn name(&self) -> &str {
///         "my-provider"
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Completes a conversation with the given messages
    ///
    /// # Arguments
    ///
    /// * `messages` - Ordered message list (system instructions first)
    ///
    /// # Returns
    ///
    /// Returns the assistant's reply message
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or the response is invalid
    async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse>;

    /// Short identifier for this provider, used in logs
    fn name(&self) -> &str;
}

impl std::fmt::Debug for dyn Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider").field("name", &self.name()).finish()
    }
}
