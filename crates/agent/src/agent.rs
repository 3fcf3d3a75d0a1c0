//! The agent turn loop.

use std::sync::Arc;
use async_trait::async_trait;
use marketscout_core::error::{ProviderError, Result, ToolError};
use marketscout_core::message::Message;
use marketscout_core::provider::ToolChoice;
use marketscout_core::session::Session;
use marketscout_core::tool::{Tool, ToolRegistry};
use tracing::{debug, info};

/// Default turn budget for an agent.
pub const DEFAULT_MAX_TURNS: usize = 3;

/// A tool-selecting agent.
///
/// Each turn the model must pick one of the registered tools. A terminating
/// tool's output is the agent's answer; any other tool's output is recorded
/// as an observation and the loop continues. When the turn budget runs out
/// the fallback tool produces the answer.
///
/// An `Agent` is itself a [`Tool`], so it can be registered inside another
/// agent and run as a sub-agent on the same session.
pub struct Agent {
    name: String,
    description: String,
    max_turns: usize,
    tools: ToolRegistry,
    fallback: Arc<dyn Tool>,
    terminating: bool,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        fallback: Arc<dyn Tool>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            max_turns: DEFAULT_MAX_TURNS,
            tools: ToolRegistry::new(),
            fallback,
            terminating: false,
        }
    }

    /// Register a tool the model may select.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.register(tool);
        self
    }

    /// Set the maximum number of non-terminating turns before the fallback runs.
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Mark this agent's answer as final when used as a tool.
    pub fn terminating(mut self, terminating: bool) -> Self {
        self.terminating = terminating;
        self
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn fallback(&self) -> &Arc<dyn Tool> {
        &self.fallback
    }

    /// Run the turn loop against `session` and return the final text.
    ///
    /// Runs at most `max_turns` selected tools plus the fallback. Errors from
    /// the provider or from any tool are returned as-is.
    pub async fn process(&self, session: &mut Session) -> Result<String> {
        let definitions = self.tools.definitions();
        debug!(
            agent = %self.name,
            tools = ?self.tools.names(),
            max_turns = self.max_turns,
            "Starting agent run"
        );

        for turn in 0..self.max_turns {
            let response = session
                .get_response(ToolChoice::Required, Some(&definitions), None)
                .await?;

            let call = response.tool_calls.into_iter().next().ok_or_else(|| {
                ProviderError::InvalidResponse(format!(
                    "{}: model did not select a tool",
                    self.name
                ))
            })?;

            let tool = self
                .tools
                .get(&call.name)
                .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;
            let arguments = call.decode_arguments()?;

            info!(
                agent = %self.name,
                tool = %call.name,
                turn = turn + 1,
                %arguments,
                "Using the {} tool",
                call.name
            );

            let output = tool.run(session, arguments.clone()).await?;
            if tool.is_terminating() {
                return Ok(output);
            }

            session.push(Message::user(observation(&call.name, &arguments, &output)));
        }

        info!(
            agent = %self.name,
            fallback = %self.fallback.name(),
            "Turn budget exhausted, running fallback"
        );
        self.fallback.run(session, serde_json::json!({})).await
    }
}

/// The message recorded after a non-terminating tool runs.
pub fn observation(tool_name: &str, arguments: &serde_json::Value, output: &str) -> String {
    format!("The {tool_name} tool has been used with args {arguments} and it responded with {output}")
}

#[async_trait]
impl Tool for Agent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn is_terminating(&self) -> bool {
        self.terminating
    }

    async fn run(&self, session: &mut Session, _arguments: serde_json::Value) -> Result<String> {
        self.process(session).await
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("max_turns", &self.max_turns)
            .field("tools", &self.tools.names())
            .field("fallback", &self.fallback.name())
            .field("terminating", &self.terminating)
            .finish()
    }
}
