//! Page extraction tool — fetches the content of one or more URLs.

use std::sync::Arc;
use async_trait::async_trait;
use marketscout_core::error::{Result, ToolError};
use marketscout_core::session::Session;
use marketscout_core::tool::{Tool, parse_arguments};
use serde::Deserialize;

use crate::tavily::SearchBackend;

pub struct ExtractTool {
    backend: Arc<dyn SearchBackend>,
    terminating: bool,
}

#[derive(Debug, Deserialize)]
struct ExtractArgs {
    urls: Urls,
}

/// Models sometimes send a single URL string instead of a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Urls {
    One(String),
    Many(Vec<String>),
}

impl Urls {
    fn into_vec(self) -> Vec<String> {
        let urls = match self {
            Urls::One(url) => vec![url],
            Urls::Many(urls) => urls,
        };
        urls.into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect()
    }
}

impl ExtractTool {
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
impl Tool for ExtractTool {
    fn name(&self) -> &str {
        "extract"
    }

    fn description(&self) -> &str {
        "Extract web page content from one or more specified URLs using Tavily Extract"
    }

    fn is_terminating(&self) -> bool {
        self.terminating
    }

    fn parameters_schema(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "type": "object",
            "properties": {
                "urls": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "The urls to extract from"
                }
            },
            "required": ["urls"]
        }))
    }

    async fn run(&self, _session: &mut Session, arguments: serde_json::Value) -> Result<String> {
        let args: ExtractArgs = parse_arguments(self.name(), arguments)?;
        let urls = args.urls.into_vec();
        if urls.is_empty() {
            return Err(ToolError::InvalidArguments("extract: at least one url is required".into()).into());
        }

        let payload = self
            .backend
            .extract(&urls)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: self.name().to_string(),
                reason: e.to_string(),
            })?;

        Ok(serde_json::to_string(&payload)?)
    }
}
