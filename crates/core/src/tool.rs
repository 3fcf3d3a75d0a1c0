//! Tool trait — the abstraction over agent capabilities.
//!
//! Tools are what an agent can choose to do on a turn: reason, answer the
//! user, query the web, write a report, or hand the whole task to a
//! sub-agent. A terminating tool's output ends the agent's turn loop.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use crate::error::{Result, ToolError};
use crate::provider::ToolDefinition;
use crate::session::Session;

/// The core Tool trait.
///
/// Each tool (reasoning, respond, search, extract, report, agents) implements
/// this trait. Tools are registered in a ToolRegistry and made available to
/// an agent's turn loop.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "search", "report").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// Whether this tool's output is the final answer of the calling agent.
    fn is_terminating(&self) -> bool;

    /// JSON Schema describing this tool's parameters.
    ///
    /// `None` means the tool takes no arguments.
    fn parameters_schema(&self) -> Option<serde_json::Value> {
        None
    }

    /// Run the tool against the shared session.
    ///
    /// Any scratch message pushed while running must be gone again when this
    /// returns; see [`Session::scratch`].
    async fn run(&self, session: &mut Session, arguments: serde_json::Value) -> Result<String>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema().unwrap_or_else(empty_parameters),
        }
    }
}

fn empty_parameters() -> serde_json::Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

/// Decode a tool's JSON arguments into its typed argument struct.
pub fn parse_arguments<T: DeserializeOwned>(
    tool_name: &str,
    arguments: serde_json::Value,
) -> std::result::Result<T, ToolError> {
    serde_json::from_value(arguments)
        .map_err(|e| ToolError::InvalidArguments(format!("{tool_name}: {e}")))
}

/// A registry of available tools.
///
/// The agent loop uses this to:
/// 1. Get tool definitions to send to the LLM (in registration order)
/// 2. Look up the tool the LLM selected
///
/// Tools are held as `Arc` so one instance can sit in several registries and
/// double as an agent's fallback.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name,
    /// keeping its original position.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            Some(&pos) => self.tools[pos] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&pos| Arc::clone(&self.tools[pos]))
    }

    /// Get all tool definitions (for sending to the LLM).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// List all registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
