//! Session — the conversation/provider adapter.
//!
//! A session owns one [`Conversation`] and a shared handle to the LLM
//! provider. Tools and agents receive `&mut Session`, which is the only
//! serialization boundary needed: message order is load-bearing, and the
//! exclusive borrow guarantees nobody else appends while a turn runs.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::debug;

use crate::error::ProviderError;
use crate::message::{Conversation, Message};
use crate::provider::{
    Provider, ProviderRequest, ProviderResponse, ResponseFormat, ToolChoice, ToolDefinition,
};

/// Model parameters applied to every request a session makes.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl ModelSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: crate::provider::default_temperature(),
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }
}

pub struct Session {
    conversation: Conversation,
    provider: Arc<dyn Provider>,
    settings: ModelSettings,
}

impl Session {
    /// Create a session with an empty conversation.
    pub fn new(provider: Arc<dyn Provider>, settings: ModelSettings) -> Self {
        Self::with_conversation(provider, settings, Conversation::new())
    }

    pub fn with_conversation(
        provider: Arc<dyn Provider>,
        settings: ModelSettings,
        conversation: Conversation,
    ) -> Self {
        Self {
            conversation,
            provider,
            settings,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// Ordered snapshot of the conversation.
    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn len(&self) -> usize {
        self.conversation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversation.is_empty()
    }

    pub fn push(&mut self, message: Message) {
        self.conversation.push(message);
    }

    /// Truncate the conversation to its system prompt (or to nothing).
    pub fn reset(&mut self) {
        self.conversation.reset();
    }

    /// An independent session over a copy of the current conversation.
    ///
    /// The fork shares the provider; nothing pushed to it is visible here.
    pub fn fork(&self) -> Session {
        Session {
            conversation: self.conversation.clone(),
            provider: Arc::clone(&self.provider),
            settings: self.settings.clone(),
        }
    }

    /// Push `message` for the lifetime of the returned guard.
    ///
    /// The guard derefs to the session, so requests made through it see the
    /// scratch message. Dropping the guard truncates the conversation back to
    /// its prior length, on success and error paths alike.
    pub fn scratch(&mut self, message: Message) -> Scratch<'_> {
        let restore_len = self.conversation.len();
        self.conversation.push(message);
        Scratch {
            session: self,
            restore_len,
        }
    }

    /// Ask the provider for the next message.
    ///
    /// Without tool definitions the tool choice is forced to
    /// [`ToolChoice::None`]: asking a model to choose among zero tools is
    /// undefined.
    pub async fn get_response(
        &self,
        tool_choice: ToolChoice,
        tools: Option<&[ToolDefinition]>,
        response_format: Option<ResponseFormat>,
    ) -> Result<ProviderResponse, ProviderError> {
        let tools = tools.map(<[ToolDefinition]>::to_vec).unwrap_or_default();
        let tool_choice = if tools.is_empty() {
            ToolChoice::None
        } else {
            tool_choice
        };

        debug!(
            conversation_id = %self.conversation.id,
            provider = self.provider.name(),
            messages = self.conversation.len(),
            tools = tools.len(),
            tool_choice = tool_choice.as_str(),
            structured = response_format.is_some(),
            "Requesting completion"
        );

        let request = ProviderRequest {
            model: self.settings.model.clone(),
            messages: self.conversation.messages().to_vec(),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            tools,
            tool_choice,
            response_format,
        };

        self.provider.complete(request).await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("conversation", &self.conversation)
            .field("provider", &self.provider.name())
            .field("settings", &self.settings)
            .finish()
    }
}

/// A scratch message pushed onto a session; retracted on drop.
pub struct Scratch<'a> {
    session: &'a mut Session,
    restore_len: usize,
}

impl Deref for Scratch<'_> {
    type Target = Session;

    fn deref(&self) -> &Session {
        self.session
    }
}

impl DerefMut for Scratch<'_> {
    fn deref_mut(&mut self) -> &mut Session {
        self.session
    }
}

impl Drop for Scratch<'_> {
    fn drop(&mut self) {
        self.session.conversation.truncate(self.restore_len);
    }
}
