//! Reasoning tool — asks the model to think about the conversation so far.
//!
//! The instruction is pushed as a scratch system message, so the only trace
//! the reasoning leaves is the observation the agent records afterwards.

use std::sync::Arc;
use async_trait::async_trait;
use marketscout_core::error::Result;
use marketscout_core::message::Message;
use marketscout_core::provider::ToolChoice;
use marketscout_core::session::Session;
use marketscout_core::template::{TemplateStore, names};
use marketscout_core::tool::Tool;

pub struct ReasoningTool {
    templates: Arc<TemplateStore>,
    terminating: bool,
}

impl ReasoningTool {
    pub fn new(templates: Arc<TemplateStore>) -> Self {
        Self {
            templates,
            terminating: false,
        }
    }

    pub fn terminating(mut self, terminating: bool) -> Self {
        self.terminating = terminating;
        self
    }
}

#[async_trait]
impl Tool for ReasoningTool {
    fn name(&self) -> &str {
        "reasoning"
    }

    fn description(&self) -> &str {
        "This tool provides reasoning for the given context."
    }

    fn is_terminating(&self) -> bool {
        self.terminating
    }

    async fn run(&self, session: &mut Session, _arguments: serde_json::Value) -> Result<String> {
        let instruction = self.templates.render(names::REASONING, &[])?;

        let scratch = session.scratch(Message::system(instruction));
        let response = scratch.get_response(ToolChoice::None, None, None).await?;

        Ok(response.into_text())
    }
}
