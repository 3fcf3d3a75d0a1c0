//! Respond tool — produces the final answer to the user.
//!
//! The model picks a response type (a plain answer or a clarifying
//! question); the template of the same name steers the reply.

use std::sync::Arc;
use async_trait::async_trait;
use marketscout_core::error::{Result, ToolError};
use marketscout_core::message::Message;
use marketscout_core::provider::ToolChoice;
use marketscout_core::session::Session;
use marketscout_core::template::{TemplateStore, names};
use marketscout_core::tool::{Tool, parse_arguments};
use serde::Deserialize;

/// Response types offered when none are configured.
pub const DEFAULT_RESPONSE_TYPES: &[&str] = &[names::RESPOND, names::CLARIFICATION];

pub struct RespondTool {
    templates: Arc<TemplateStore>,
    response_types: Vec<String>,
    terminating: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RespondArgs {
    #[serde(default)]
    response_type: Option<String>,
}

impl RespondTool {
    pub fn new(templates: Arc<TemplateStore>) -> Self {
        Self::with_response_types(
            templates,
            DEFAULT_RESPONSE_TYPES.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn with_response_types(templates: Arc<TemplateStore>, response_types: Vec<String>) -> Self {
        Self {
            templates,
            response_types,
            terminating: true,
        }
    }

    pub fn terminating(mut self, terminating: bool) -> Self {
        self.terminating = terminating;
        self
    }

    pub fn response_types(&self) -> &[String] {
        &self.response_types
    }

    fn resolve_response_type(&self, requested: Option<String>) -> Result<String> {
        let response_type = requested
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| names::RESPOND.to_string());

        if !self.response_types.iter().any(|t| *t == response_type) {
            return Err(ToolError::InvalidArguments(format!(
                "respond: unknown response_type '{response_type}' (expected one of: {})",
                self.response_types.join(", ")
            ))
            .into());
        }
        Ok(response_type)
    }
}

#[async_trait]
impl Tool for RespondTool {
    fn name(&self) -> &str {
        "respond"
    }

    fn description(&self) -> &str {
        "This tool provides responses for the given user message."
    }

    fn is_terminating(&self) -> bool {
        self.terminating
    }

    fn parameters_schema(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "type": "object",
            "properties": {
                "response_type": {
                    "type": "string",
                    "description": "The type of response to be generated.",
                    "enum": self.response_types
                }
            },
            "required": ["response_type"]
        }))
    }

    async fn run(&self, session: &mut Session, arguments: serde_json::Value) -> Result<String> {
        let args: RespondArgs = parse_arguments(self.name(), arguments)?;
        let response_type = self.resolve_response_type(args.response_type)?;
        let instruction = self.templates.render(&response_type, &[])?;

        let scratch = session.scratch(Message::system(instruction));
        let response = scratch.get_response(ToolChoice::None, None, None).await?;

        Ok(response.into_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{session_with, template_store};
    use marketscout_core::Error;
    use marketscout_core::testing::{SequentialMockProvider, text_response};

    const TEMPLATES: &[(&str, &str)] = &[
        ("respond", "Answer the user directly."),
        ("clarification", "Ask the user a clarifying question."),
    ];

    #[tokio::test]
    async fn clarification_uses_its_template() {
        let (_dir, templates) = template_store(TEMPLATES);
        let provider = Arc::new(SequentialMockProvider::single_text("Which region?"));
        let mut session = session_with(provider.clone());

        let out = RespondTool::new(templates)
            .run(&mut session, serde_json::json!({"response_type": "clarification"}))
            .await
            .unwrap();

        assert_eq!(out, "Which region?");
        let sent = &provider.requests()[0].messages;
        assert_eq!(
            sent.last().unwrap(),
            &Message::system("Ask the user a clarifying question.")
        );
        assert_eq!(session.len(), 1);
    }

    #[tokio::test]
    async fn missing_or_empty_type_defaults_to_respond() {
        let (_dir, templates) = template_store(TEMPLATES);
        let provider = Arc::new(SequentialMockProvider::new(vec![
            text_response("one"),
            text_response("two"),
        ]));
        let mut session = session_with(provider.clone());
        let tool = RespondTool::new(templates);

        tool.run(&mut session, serde_json::json!({})).await.unwrap();
        tool.run(&mut session, serde_json::json!({"response_type": ""}))
            .await
            .unwrap();

        for request in provider.requests() {
            assert_eq!(
                request.messages.last().unwrap().content,
                "Answer the user directly."
            );
        }
    }

    #[tokio::test]
    async fn unknown_type_is_rejected_before_any_request() {
        let (_dir, templates) = template_store(TEMPLATES);
        let provider = Arc::new(SequentialMockProvider::new(vec![]));
        let mut session = session_with(provider.clone());

        let err = RespondTool::new(templates)
            .run(&mut session, serde_json::json!({"response_type": "poem"}))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Tool(ToolError::InvalidArguments(_))));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn scratch_retracted_when_provider_fails() {
        let (_dir, templates) = template_store(TEMPLATES);
        let mut session = session_with(Arc::new(SequentialMockProvider::new(vec![])));
        let before = session.messages().to_vec();

        let result = RespondTool::new(templates)
            .run(&mut session, serde_json::json!({"response_type": "respond"}))
            .await;

        assert!(matches!(result, Err(Error::Provider(_))));
        assert_eq!(session.messages(), before.as_slice());
    }

    #[test]
    fn schema_lists_configured_response_types() {
        let (_dir, templates) = template_store(&[]);
        let tool = RespondTool::with_response_types(
            templates,
            vec!["respond".into(), "clarification".into(), "summary".into()],
        );
        let def = tool.to_definition();
        assert_eq!(
            def.parameters["properties"]["response_type"]["enum"],
            serde_json::json!(["respond", "clarification", "summary"])
        );
        assert!(tool.is_terminating());
    }
}
