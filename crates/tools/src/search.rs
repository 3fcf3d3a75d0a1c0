//! Web search tool — forwards a query to the search backend.

use std::sync::Arc;
use async_trait::async_trait;
use marketscout_core::error::{Result, ToolError};
use marketscout_core::session::Session;
use marketscout_core::tool::{Tool, parse_arguments};
use serde::Deserialize;

use crate::tavily::SearchBackend;

pub struct SearchTool {
    backend: Arc<dyn SearchBackend>,
    terminating: bool,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
}

impl SearchTool {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            terminating: false,
        }
    }

    pub fn terminating(mut self, terminating: bool) -> Self {
        self.terminating = terminating;
        self
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Execute a search query using Tavily Search"
    }

    fn is_terminating(&self) -> bool {
        self.terminating
    }

    fn parameters_schema(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The query to search for"
                }
            },
            "required": ["query"]
        }))
    }

    async fn run(&self, _session: &mut Session, arguments: serde_json::Value) -> Result<String> {
        let args: SearchArgs = parse_arguments(self.name(), arguments)?;
        if args.query.trim().is_empty() {
            return Err(ToolError::InvalidArguments("search: query must not be empty".into()).into());
        }

        let payload = self
            .backend
            .search(&args.query)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: self.name().to_string(),
                reason: e.to_string(),
            })?;

        Ok(serde_json::to_string(&payload)?)
    }
}
