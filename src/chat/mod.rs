//! Chat turns enriched with live SEO data.
//!
//! [`ChatAssistant`] classifies the user's message, runs at most one
//! analysis, appends its result to the prompt and hands the prompt to a
//! [`TextGenerator`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::errors::{DataForSeoError, DataForSeoResult};
use crate::insights::{detect_query_type, extract_entities, LiveData, QueryType, SeoInsights};

/// Who wrote a history message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The end user.
    User,
    /// The assistant. Any role other than `user` is read as this.
    #[serde(other)]
    Model,
}

/// One message of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author.
    pub role: ChatRole,
    /// Text.
    pub content: String,
}

impl ChatMessage {
    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// An assistant message.
    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            content: content.into(),
        }
    }
}

/// Incoming chat turn.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    /// The new user message.
    #[serde(default)]
    pub message: String,
    /// Prior turns, oldest first.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

impl ChatRequest {
    /// A request without history.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            history: Vec::new(),
        }
    }

    /// Sets the history.
    #[must_use]
    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }
}

/// Reply to a chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    /// Generated text, or an apology when generation failed.
    pub message: String,
    /// Whether generation succeeded.
    pub success: bool,
    /// Live data used to enrich the prompt.
    #[serde(rename = "dataForSEO", skip_serializing_if = "Option::is_none")]
    pub live_data: Option<LiveData>,
}

/// Produces the assistant's answer. The model behind it is opaque.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a reply to `prompt` given the prior `history`.
    async fn generate(&self, history: &[ChatMessage], prompt: &str) -> DataForSeoResult<String>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for std::sync::Arc<T> {
    async fn generate(&self, history: &[ChatMessage], prompt: &str) -> DataForSeoResult<String> {
        (**self).generate(history, prompt).await
    }
}

/// Handles chat turns.
pub struct ChatAssistant<G> {
    insights: SeoInsights,
    generator: G,
}

impl<G: TextGenerator> ChatAssistant<G> {
    /// Creates an assistant.
    pub fn new(insights: SeoInsights, generator: G) -> Self {
        Self {
            insights,
            generator,
        }
    }

    /// Answers one turn.
    ///
    /// # Errors
    ///
    /// Returns [`DataForSeoError::Validation`] when the message is blank.
    /// Lookup and generation failures never surface as errors.
    pub async fn respond(&self, request: ChatRequest) -> DataForSeoResult<ChatReply> {
        let locale = self.insights.locale();
        if request.message.trim().is_empty() {
            return Err(DataForSeoError::validation(locale.message_required()));
        }

        let live_data = self.enrichment(&request.message).await;

        let prompt = match &live_data {
            Some(data) => {
                let block = serde_json::to_string_pretty(data)?;
                format!("{}\n\n{}\n{}", request.message, locale.live_data_header(), block)
            }
            None => request.message.clone(),
        };

        match self.generator.generate(&request.history, &prompt).await {
            Ok(message) => Ok(ChatReply {
                message,
                success: true,
                live_data,
            }),
            Err(err) => {
                error!(error = %err, "Text generation failed");
                Ok(ChatReply {
                    message: locale.apology().to_string(),
                    success: false,
                    live_data: None,
                })
            }
        }
    }

    async fn enrichment(&self, message: &str) -> Option<LiveData> {
        let query_type = detect_query_type(message);
        if query_type == QueryType::General {
            return None;
        }

        let entities = extract_entities(message);
        if entities.is_empty() {
            return None;
        }

        debug!(query_type = query_type.as_str(), ?entities, "Enriching chat prompt");
        let outcome = self.insights.lookup(query_type, &entities).await?;
        if !outcome.success {
            warn!(
                query_type = query_type.as_str(),
                error = outcome.error.as_deref().unwrap_or_default(),
                "Continuing without live data"
            );
        }
        outcome.data
    }
}
