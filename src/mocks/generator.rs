//! Scripted text generator for chat tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::chat::{ChatMessage, TextGenerator};
use crate::errors::{DataForSeoError, DataForSeoResult};

/// Returns a fixed reply and remembers every prompt it was given.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Generator that always answers `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Generator that always fails.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _history: &[ChatMessage], prompt: &str) -> DataForSeoResult<String> {
        self.prompts.lock().push(prompt.to_string());
        self.reply.clone().ok_or_else(|| DataForSeoError::Generation {
            message: "generator unavailable".to_string(),
        })
    }
}
