//! The default two-agent setup.
//!
//! The main agent talks to the user. It can reason, respond, or hand the
//! task to the research agent, which searches, reads pages, reasons, and
//! finally writes a report.

use std::sync::Arc;
use marketscout_config::AgentsConfig;
use marketscout_core::template::{TemplateStore, names};
use marketscout_core::tool::Tool;
use marketscout_tools::{
    ExtractTool, ReasoningTool, ReportTool, RespondTool, SearchBackend, SearchTool,
};

use crate::agent::Agent;

pub const MAIN_AGENT_NAME: &str = "main_agent";
pub const RESEARCH_AGENT_NAME: &str = "research_agent";

/// Build the research agent: search, extract, reasoning, and report, with
/// the report as fallback.
pub fn research_agent(
    templates: Arc<TemplateStore>,
    backend: Arc<dyn SearchBackend>,
    max_turns: usize,
) -> Agent {
    let report: Arc<dyn Tool> = Arc::new(ReportTool::new(Arc::clone(&templates)));

    Agent::new(
        RESEARCH_AGENT_NAME,
        "This agent is designed to autonomously carry out market research.",
        Arc::clone(&report),
    )
    .with_tool(Arc::new(SearchTool::new(Arc::clone(&backend))))
    .with_tool(Arc::new(ExtractTool::new(backend)))
    .with_tool(Arc::new(ReasoningTool::new(templates)))
    .with_tool(report)
    .with_max_turns(max_turns)
    .terminating(true)
}

/// Build the user-facing agent with the research agent as one of its tools.
pub fn main_agent(
    templates: Arc<TemplateStore>,
    backend: Arc<dyn SearchBackend>,
    config: &AgentsConfig,
) -> Agent {
    let research = research_agent(
        Arc::clone(&templates),
        backend,
        config.research_turns as usize,
    );
    let respond: Arc<dyn Tool> = Arc::new(RespondTool::with_response_types(
        Arc::clone(&templates),
        config.response_types.clone(),
    ));

    Agent::new(
        MAIN_AGENT_NAME,
        "This agent is designed to help users with market research.",
        Arc::clone(&respond),
    )
    .with_tool(Arc::new(ReasoningTool::new(templates)))
    .with_tool(respond)
    .with_tool(Arc::new(research))
    .with_max_turns(config.main_turns as usize)
    .terminating(true)
}

/// Every template the agents can load: the built-in set plus one per
/// configured response type, in that order and without duplicates.
pub fn required_templates(config: &AgentsConfig) -> Vec<String> {
    let mut required: Vec<String> = names::ALL.iter().map(|n| n.to_string()).collect();
    for response_type in &config.response_types {
        if !response_type.trim().is_empty() && !required.contains(response_type) {
            required.push(response_type.clone());
        }
    }
    required
}
